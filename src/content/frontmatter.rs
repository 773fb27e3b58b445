//! Front-matter splitting
//!
//! A content file opens with a fenced metadata block, followed by the body:
//!
//! ```text
//! ---
//! title: Two Sum
//! slug: two-sum
//! ---
//! Body markdown...
//! ```
//!
//! YAML blocks are fenced by `---` lines. JSON blocks are fenced by `;;;`
//! lines, with or without the surrounding braces.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

const YAML_FENCE: &str = "---";
const JSON_FENCE: &str = ";;;";

/// Untyped front-matter, as written by the author
pub type RawFrontMatter = Mapping;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("no front-matter block at the top of the file")]
    Missing,

    #[error("front-matter block opened with '{0}' is never closed")]
    Unterminated(&'static str),

    #[error("front-matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front-matter is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("front-matter must be a set of key: value pairs")]
    NotAMapping,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn fence(self) -> &'static str {
        match self {
            Format::Yaml => YAML_FENCE,
            Format::Json => JSON_FENCE,
        }
    }
}

/// Split content into its front-matter mapping and body
///
/// Line breaks directly after the closing fence are dropped; the body is
/// otherwise returned untouched.
pub fn split(content: &str) -> Result<(RawFrontMatter, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let (opening, rest) = split_line(content);
    let format = match opening.trim_end() {
        YAML_FENCE => Format::Yaml,
        JSON_FENCE => Format::Json,
        _ => return Err(FrontMatterError::Missing),
    };

    let (header_end, body_start) =
        find_closing(rest, format.fence()).ok_or(FrontMatterError::Unterminated(format.fence()))?;

    let header = &rest[..header_end];
    let body = rest[body_start..].trim_start_matches(['\n', '\r']);

    if header.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }

    let value = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(header)?,
        Format::Json => parse_json(header)?,
    };

    match value {
        Value::Mapping(map) => Ok((map, body)),
        Value::Null => Ok((Mapping::new(), body)),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn parse_json(header: &str) -> Result<Value, serde_json::Error> {
    let trimmed = header.trim();
    if trimmed.starts_with('{') {
        serde_json::from_str(trimmed)
    } else {
        serde_json::from_str(&format!("{{{}}}", trimmed))
    }
}

fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

/// Locate the closing fence line: (end of header, start of body)
fn find_closing(rest: &str, fence: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    while offset < rest.len() {
        let (line, _) = split_line(&rest[offset..]);
        let next = (offset + line.len() + 1).min(rest.len());
        if line.trim_end() == fence {
            return Some((offset, next));
        }
        offset = next;
    }
    None
}
