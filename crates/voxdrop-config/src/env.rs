use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Destination bucket when configuring from the environment alone
pub(crate) const BUCKET_VAR: &str = "S3_BUCKET";

/// Presigned URL lifetime when configuring from the environment alone
pub(crate) const EXPIRE_SECONDS_VAR: &str = "AUDIO_EXPIRE_SECONDS";

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Expansion runs on the raw text before
/// deserialization, so numeric fields can be templated too
/// (`expire_seconds = {{ env.AUDIO_EXPIRE_SECONDS | default("3600") }}`).
/// Comment lines are copied through untouched.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // Group 1: scoped key (`env.NAME`), group 2: optional default
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut expanded = String::with_capacity(line.len());
        let mut last_end = 0;

        for captures in re().captures_iter(line) {
            let Some(overall) = captures.get(0) else {
                continue;
            };

            expanded.push_str(&line[last_end..overall.start()]);
            expanded.push_str(&resolve_placeholder(&captures)?);
            last_end = overall.end();
        }

        expanded.push_str(&line[last_end..]);
        lines.push(expanded);
    }

    let mut output = lines.join("\n");

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn resolve_placeholder(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let default_value = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), default_value) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

/// Read an environment variable, treating blank values as unset
pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
