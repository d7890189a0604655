pub(crate) const JSON_HINTS: [(&str, &str); 5] = [
    (
        "trailing comma",
        "Remove the comma before the closing bracket; JSON does not allow trailing commas.",
    ),
    (
        "expected `,` or `]`",
        "Check for a missing comma between array elements.",
    ),
    (
        "expected `,` or `}`",
        "Check for a missing comma between object members, or a missing closing quote.",
    ),
    (
        "key must be a string",
        "Object keys must be double-quoted strings; JSON does not allow bare or single-quoted keys.",
    ),
    (
        "expected value",
        "Check for single quotes, comments, or a stray character; JSON allows none of these.",
    ),
];
