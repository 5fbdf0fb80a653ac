//! JSON / JSONL file access.
//!
//! Inputs are read fully into memory before parsing. Output is written
//! through a buffered writer, one compact JSON object per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SftError};

/// Parse newline-delimited JSON text, one `T` per non-blank line.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`SftError::Json`] with the 1-based line number of the first
/// line that fails to parse.
pub fn parse_jsonl<T: DeserializeOwned>(text: &str, path: &Path) -> Result<Vec<T>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line.trim()).map_err(|source| SftError::Json {
                path: path.to_path_buf(),
                line: Some(idx + 1),
                source,
            })
        })
        .collect()
}

/// Read and parse a JSONL file.
///
/// # Errors
///
/// Returns [`SftError::Io`] if the file cannot be read, or
/// [`SftError::Json`] on the first malformed line.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|e| SftError::io(path, e))?;
    parse_jsonl(&text, path)
}

/// Read and parse a single JSON document.
///
/// # Errors
///
/// Returns [`SftError::Io`] or [`SftError::Json`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| SftError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| SftError::Json {
        path: path.to_path_buf(),
        line: None,
        source,
    })
}

/// Write `records` to `path` as JSONL, truncating any existing file.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns [`SftError::Io`] if the file cannot be created or written.
pub fn write_jsonl<'a, T, I>(path: &Path, records: I) -> Result<usize>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let file = File::create(path).map_err(|e| SftError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0usize;

    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|e| SftError::io(path, e.into()))?;
        writer.write_all(b"\n").map_err(|e| SftError::io(path, e))?;
        written += 1;
    }
    writer.flush().map_err(|e| SftError::io(path, e))?;

    debug!(path = %path.display(), lines = written, "JSONL written");
    Ok(written)
}
