pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve command input: `--input` file first, then piped stdin.
/// Returns None when neither is present so the caller falls back to flags.
pub fn from_file_or_stdin<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_input(path).map(Some);
    }
    stdin::read_stdin()
}
