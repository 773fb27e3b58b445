//! Content errors

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The two content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Blog,
    Problem,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Blog => write!(f, "blog post"),
            ContentKind::Problem => write!(f, "problem"),
        }
    }
}

/// Errors produced while loading or looking up content
#[derive(Debug, Error)]
pub enum ContentError {
    /// Frontmatter parsed but broke one or more schema rules
    #[error("invalid frontmatter in {}: {source}", .path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// No usable frontmatter block
    #[error("malformed content file {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Slug already claimed by an earlier file of the same kind
    #[error("duplicate slug '{slug}' in {}", .path.display())]
    DuplicateSlug { path: PathBuf, slug: String },

    /// Discovery or read failure other than a missing content root
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no {kind} with slug '{slug}'")]
    NotFound { kind: ContentKind, slug: String },

    #[error("{kind} '{slug}' is not published")]
    NotPublished { kind: ContentKind, slug: String },
}

impl ContentError {
    /// True for errors that only concern a single file.
    ///
    /// The collection assembler skips these and keeps going; everything else
    /// aborts the build.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ContentError::Validation { .. }
                | ContentError::Malformed { .. }
                | ContentError::DuplicateSlug { .. }
        )
    }

    /// True when a lookup should be answered with "not found".
    ///
    /// Drafts report the same way so their existence does not leak.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound { .. } | ContentError::NotPublished { .. }
        )
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ContentError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// A schema rule a frontmatter value can break
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    ExpectedString,
    ExpectedList,
    Empty,
    Pattern(&'static str),
    InvalidDate,
    OneOf(&'static [&'static str]),
    MaxChars { max: usize, actual: usize },
    MaxItems { max: usize, actual: usize },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "is required"),
            Rule::ExpectedString => write!(f, "must be a string"),
            Rule::ExpectedList => write!(f, "must be a string or a list of strings"),
            Rule::Empty => write!(f, "must not be empty"),
            Rule::Pattern(pattern) => write!(f, "must match {}", pattern),
            Rule::InvalidDate => write!(f, "must be a calendar date (YYYY-MM-DD)"),
            Rule::OneOf(allowed) => write!(f, "must be one of: {}", allowed.join(", ")),
            Rule::MaxChars { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            Rule::MaxItems { max, actual } => {
                write!(f, "must have at most {} entries (got {})", max, actual)
            }
        }
    }
}

/// One broken rule on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub rule: Rule,
    /// Suggested replacement value, if one can be derived
    pub hint: Option<String>,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule)?;
        if let Some(hint) = &self.hint {
            write!(f, " (try '{}')", hint)?;
        }
        Ok(())
    }
}

/// Every rule a frontmatter header violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Whether any violation concerns `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// The rules broken by `field`, in the order they were checked
    pub fn rules_for(&self, field: &str) -> Vec<&Rule> {
        self.violations
            .iter()
            .filter(|v| v.field == field)
            .map(|v| &v.rule)
            .collect()
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError {
            violations: vec![
                FieldViolation {
                    field: "title".to_string(),
                    rule: Rule::Required,
                    hint: None,
                },
                FieldViolation {
                    field: "slug".to_string(),
                    rule: Rule::Pattern("^[a-z0-9-]+$"),
                    hint: Some("two-sum".to_string()),
                },
            ],
        };

        let message = err.to_string();
        assert_eq!(
            message,
            "title is required; slug must match ^[a-z0-9-]+$ (try 'two-sum')"
        );
        assert!(err.has_field("slug"));
        assert!(!err.has_field("excerpt"));
    }

    #[test]
    fn test_not_published_reads_as_not_found() {
        let hidden = ContentError::NotPublished {
            kind: ContentKind::Blog,
            slug: "draft-post".to_string(),
        };
        let missing = ContentError::NotFound {
            kind: ContentKind::Blog,
            slug: "missing-slug".to_string(),
        };
        assert!(hidden.is_not_found());
        assert!(missing.is_not_found());
        assert!(!hidden.is_per_file());
        assert_eq!(missing.to_string(), "no blog post with slug 'missing-slug'");
    }

    #[test]
    fn test_filesystem_error_is_fatal() {
        let err = ContentError::filesystem(
            "/content/blog",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_per_file());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("/content/blog"));
    }
}
