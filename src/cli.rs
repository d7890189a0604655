//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Maximum indent width accepted by the CLI.
const MAX_INDENT: usize = 16;

fn parse_indent(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("{s} is not a valid number"))?;
    if (1..=MAX_INDENT).contains(&value) {
        Ok(value)
    } else {
        Err(format!("indent must be between 1 and {MAX_INDENT}"))
    }
}

/// Hierarchical i18n string toolkit: validate strings files, resolve
/// keys, and generate key-constant modules and glyph sets.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the strings resource file.
    #[arg(short, long, value_name = "FILE", default_value = "strings.json")]
    pub strings: PathBuf,

    /// Path to the language registry file; the built-in ja/en pair is
    /// used when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub languages: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `check` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `check` as the default
    /// command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when
    /// needed.
    ///
    /// # Panics
    ///
    /// Panics if argument parsing fails.
    #[must_use]
    pub fn parse_from_with_default<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
            .unwrap_or_else(|e| panic!("CLI parsing failed: {e}"))
            .with_default_command()
    }

    /// Apply the default command if none was specified.
    #[must_use]
    fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Check);
        }
        self
    }
}

/// Arguments accepted by the `keys` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct KeysArgs {
    /// Write the generated module to this path; stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Wrap the generated key module in this outer module.
    #[arg(short, long, value_name = "NAME")]
    pub namespace: Option<String>,

    /// Indent width in spaces.
    #[arg(long, value_name = "N", default_value = "4", value_parser = parse_indent)]
    pub indent: usize,
}

/// Arguments accepted by the `charset` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct CharsetArgs {
    /// Write the charset to this path; stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seed the output with digits and numeric punctuation.
    #[arg(long)]
    pub include_numeric: bool,
}

/// Arguments accepted by the `resolve` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct ResolveArgs {
    /// Dotted key path to resolve.
    pub key: String,

    /// Language code; the registry's fallback language when omitted.
    #[arg(short = 'L', long, value_name = "CODE")]
    pub language: Option<String>,

    /// Substitution entries as name=value pairs.
    #[arg(long = "sub", value_name = "NAME=VALUE")]
    pub substitutions: Vec<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Parse and validate the strings file `default`.
    Check,

    /// Generate the key-constant module.
    Keys(KeysArgs),

    /// Extract the set of characters used across all strings.
    Charset(CharsetArgs),

    /// Resolve a single key and print the localized text.
    Resolve(ResolveArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_command_is_check() {
        let cli = Cli::parse_from_with_default(["kotoba"]);
        assert_eq!(cli.command, Some(Commands::Check));
    }

    #[rstest]
    fn keys_arguments_parse() {
        let cli = Cli::parse_from_with_default([
            "kotoba", "keys", "--output", "keys.rs", "--namespace", "app", "--indent", "2",
        ]);
        let Some(Commands::Keys(args)) = cli.command else {
            panic!("expected keys command");
        };
        assert_eq!(args.output.as_deref(), Some(std::path::Path::new("keys.rs")));
        assert_eq!(args.namespace.as_deref(), Some("app"));
        assert_eq!(args.indent, 2);
    }

    #[rstest]
    fn resolve_collects_repeated_subs() {
        let cli = Cli::parse_from_with_default([
            "kotoba", "resolve", "ui.greeting", "--sub", "a=1", "--sub", "b=2",
        ]);
        let Some(Commands::Resolve(args)) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.substitutions, ["a=1", "b=2"]);
    }
}
