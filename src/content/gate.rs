//! Publication gate: which records the public may see

use super::error::ContentError;
use super::post::{BlogPost, ContentRecord, ProblemPost};

/// Records that can be hidden from public listings
pub trait Publishable: ContentRecord {
    fn is_published(&self) -> bool;
}

impl Publishable for BlogPost {
    fn is_published(&self) -> bool {
        !self.is_draft()
    }
}

/// Problem writeups have no draft state
impl Publishable for ProblemPost {
    fn is_published(&self) -> bool {
        true
    }
}

/// Keep only published records, preserving order
pub fn published<R: Publishable>(records: Vec<R>) -> Vec<R> {
    records.into_iter().filter(|r| r.is_published()).collect()
}

/// Pass a record through only if it is published
pub fn require_published<R: Publishable>(record: R) -> Result<R, ContentError> {
    if record.is_published() {
        Ok(record)
    } else {
        Err(ContentError::NotPublished {
            kind: R::KIND,
            slug: record.slug().to_string(),
        })
    }
}
