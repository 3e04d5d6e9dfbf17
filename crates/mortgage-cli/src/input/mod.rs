pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve command input: an explicit `--input` file wins, then piped stdin,
/// then whatever the caller builds from flags.
pub fn resolve<T, F>(path: Option<&str>, from_flags: F) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    if let Some(path) = path {
        return file::read_json(path);
    }
    if let Some(data) = stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    from_flags()
}
