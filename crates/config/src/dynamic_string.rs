//! `{{ env.NAME }}` substitution in configuration strings.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex should be valid")
    })
}

/// Replaces every `{{ env.NAME }}` placeholder with the value of the variable.
///
/// Returns the name of the first variable that is not set.
pub(crate) fn expand(input: &str) -> Result<String, String> {
    let mut missing = None;

    let output = placeholder().replace_all(input, |captures: &Captures<'_>| {
        let name = &captures[1];

        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(format!("environment variable not found: `{name}`")),
        None => Ok(output.into_owned()),
    }
}
