//! Secret reference resolver.
//!
//! Credential values in `config.toml` can point at secrets stored elsewhere:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `file::/path/to/secret` reads the first line of the file
//! - anything else is used as-is

use std::path::Path;

/// Resolves a value, looking variables up with `env`.
pub fn resolve_with(value: &str, env: impl Fn(&str) -> Option<String>) -> Result<String, String> {
    if let Some(var) = value.strip_prefix("env::") {
        env(var).ok_or_else(|| format!("environment variable `{}` is not set", var))
    } else if let Some(path) = value.strip_prefix("file::") {
        resolve_file(Path::new(path))
    } else {
        Ok(value.to_string())
    }
}

fn resolve_file(path: &Path) -> Result<String, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read secret file {}: {}", path.display(), e))?;
    content
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| format!("secret file {} is empty", path.display()))
}
