//! CLI execution and command dispatch logic.
//!
//! This module keeps [`main`] minimal by providing a single entry point
//! that loads the registry and strings file, dispatches the selected
//! command, and writes any output atomically: generated text is built in
//! memory, written to a temporary file beside the target, and persisted
//! over it, so a failed run never corrupts a previously-generated file.

use crate::charset::{self, CharsetOptions};
use crate::cli::{CharsetArgs, Cli, Commands, KeysArgs, ResolveArgs};
use crate::keygen::{self, KeygenOptions};
use crate::lang::LanguageRegistry;
use crate::parse;
use crate::resolve::{self, Substitutions};
use crate::tree::ResourceTree;
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Execute the parsed [`Cli`] commands.
///
/// # Errors
///
/// Returns an error if loading, validation, generation, or output
/// writing fails.
pub fn run(cli: &Cli) -> Result<()> {
    let registry = load_registry(cli.languages.as_deref())?;
    let tree = load_tree(&cli.strings, &registry)?;
    match cli.command.clone().unwrap_or(Commands::Check) {
        Commands::Check => {
            info!(
                languages = registry.len(),
                roots = tree.roots().len(),
                hash = tree.source_hash(),
                "strings file is valid"
            );
            println!("ok");
            Ok(())
        }
        Commands::Keys(args) => run_keys(&tree, &args),
        Commands::Charset(args) => run_charset(&tree, &registry, &args),
        Commands::Resolve(args) => run_resolve(&tree, &registry, &args),
    }
}

fn load_registry(path: Option<&Path>) -> Result<LanguageRegistry> {
    match path {
        Some(path) => LanguageRegistry::from_path(path),
        None => {
            debug!("no registry file given, using the built-in ja/en pair");
            Ok(LanguageRegistry::default())
        }
    }
}

fn load_tree(path: &Path, registry: &LanguageRegistry) -> Result<ResourceTree> {
    let tree = parse::from_path(path, registry)
        .with_context(|| format!("loading strings at {}", path.display()))?;
    debug!(hash = tree.source_hash(), "parsed strings file");
    Ok(tree)
}

fn run_keys(tree: &ResourceTree, args: &KeysArgs) -> Result<()> {
    let options = KeygenOptions {
        namespace: args.namespace.clone(),
        indent_width: args.indent,
    };
    let generated = keygen::generate(tree, &options).context("generating key module")?;
    emit_output(args.output.as_deref(), &generated)
}

fn run_charset(tree: &ResourceTree, registry: &LanguageRegistry, args: &CharsetArgs) -> Result<()> {
    let options = CharsetOptions {
        include_numeric_set: args.include_numeric,
    };
    let mut generated = charset::generate(tree, Some(registry), &options);
    generated.push('\n');
    emit_output(args.output.as_deref(), &generated)
}

fn run_resolve(tree: &ResourceTree, registry: &LanguageRegistry, args: &ResolveArgs) -> Result<()> {
    let code = match args.language.as_deref() {
        Some(code) => code,
        None => &registry.fallback().code,
    };
    let subs = parse_substitutions(&args.substitutions)?;
    let text = resolve::resolve(tree, registry, code, &args.key, subs.as_ref())?;
    println!("{text}");
    Ok(())
}

fn parse_substitutions(pairs: &[String]) -> Result<Option<Substitutions>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut subs = Substitutions::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("substitution '{pair}' is not of the form name=value");
        };
        subs = subs.with(name, value);
    }
    Ok(Some(subs))
}

fn emit_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => write_atomic(path, content),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

/// Write `content` to `path` through a temporary file in the same
/// directory, replacing the target only once the write has succeeded.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".kotoba.")
        .suffix(".tmp")
        .tempfile_in(dir)
        .context("create temp file")?;
    tmp.write_all(content.as_bytes()).context("write temp file")?;
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
