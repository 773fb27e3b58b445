//! Content file parsing: split, validate, assemble

use std::io;
use std::path::{Path, PathBuf};

use super::error::ContentError;
use super::frontmatter;
use super::post::ContentRecord;

/// Read and parse a single content file
pub async fn parse_file<R: ContentRecord>(path: &Path) -> Result<R, ContentError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(ContentError::Malformed {
                path: path.to_path_buf(),
                reason: "file is not valid UTF-8".to_string(),
            });
        }
        Err(e) => return Err(ContentError::filesystem(path, e)),
    };

    parse_str(&text, path.to_path_buf())
}

/// Parse already-read file contents
pub fn parse_str<R: ContentRecord>(text: &str, path: PathBuf) -> Result<R, ContentError> {
    let (raw, body) = match frontmatter::split(text) {
        Ok(split) => split,
        Err(e) => {
            return Err(ContentError::Malformed {
                path,
                reason: e.to_string(),
            })
        }
    };

    let fm = match R::validate(&raw) {
        Ok(fm) => fm,
        Err(source) => return Err(ContentError::Validation { path, source }),
    };

    Ok(R::assemble(fm, body.to_string(), path))
}
