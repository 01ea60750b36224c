use super::entities::Listings;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors crossing the document reader/writer boundary
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read listings from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse listings from '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write listings to '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize listings: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn path_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<stdin>".to_string(),
    }
}

/// Read a listings document from a file, or from standard input when no path
/// is given.
pub fn read_listings(path: Option<&Path>) -> Result<Listings, DocumentError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| DocumentError::Read {
            path: path_label(Some(path)),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| DocumentError::Read {
                    path: path_label(None),
                    source: e,
                })?;
            buf
        }
    };

    serde_json::from_str(&raw).map_err(|e| DocumentError::Parse {
        path: path_label(path),
        source: e,
    })
}

/// Write a listings document to a file, or to standard output when no path is
/// given. Serialization happens before any byte is written, so a failure
/// produces no partial output.
pub fn write_listings(listings: &Listings, path: Option<&Path>) -> Result<(), DocumentError> {
    let serialized = serde_json::to_string_pretty(listings).map_err(DocumentError::Serialize)?;

    match path {
        Some(path) => {
            std::fs::write(path, serialized).map_err(|e| DocumentError::Write {
                path: path.display().to_string(),
                source: e,
            })
        }
        None => {
            let stdout = std::io::stdout();
            write_serialized(&mut stdout.lock(), &serialized).map_err(|e| DocumentError::Write {
                path: path_label(None),
                source: e,
            })
        }
    }
}

/// A failed stream write (a closed pipe included) must surface as an error,
/// not a panic, so the destination is written through `Write` directly.
fn write_serialized(dest: &mut dyn Write, serialized: &str) -> std::io::Result<()> {
    dest.write_all(serialized.as_bytes())?;
    dest.write_all(b"\n")
}
