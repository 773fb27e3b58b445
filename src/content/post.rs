//! Blog post and problem writeup models

use chrono::NaiveDate;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::{ContentKind, ValidationError};
use super::schema::{
    self, BlogFrontmatter, Difficulty, ProblemFrontmatter, Source, Status,
};

/// Behaviour shared by every kind of content record
pub trait ContentRecord: Clone + Send + Sync + 'static {
    /// Validated front-matter for this kind
    type Frontmatter;

    const KIND: ContentKind;

    fn validate(raw: &Mapping) -> Result<Self::Frontmatter, ValidationError>;

    fn assemble(frontmatter: Self::Frontmatter, content: String, file_path: PathBuf) -> Self;

    fn slug(&self) -> &str;

    fn title(&self) -> &str;

    fn date_published(&self) -> NaiveDate;

    fn excerpt(&self) -> &str;

    /// Body text with the front-matter removed
    fn content(&self) -> &str;

    fn file_path(&self) -> &Path;
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub date_published: NaiveDate,
    pub updated_at: Option<NaiveDate>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub status: Status,

    /// Raw markdown body
    pub content: String,

    /// Source file, for diagnostics only
    #[serde(skip)]
    pub file_path: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BlogPost {
    pub fn is_draft(&self) -> bool {
        self.status == Status::Draft
    }
}

impl PartialEq for BlogPost {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.slug == other.slug
            && self.date_published == other.date_published
            && self.updated_at == other.updated_at
            && self.excerpt == other.excerpt
            && self.tags == other.tags
            && self.status == other.status
            && self.content == other.content
            && self.extra == other.extra
    }
}

impl ContentRecord for BlogPost {
    type Frontmatter = BlogFrontmatter;

    const KIND: ContentKind = ContentKind::Blog;

    fn validate(raw: &Mapping) -> Result<BlogFrontmatter, ValidationError> {
        schema::validate_blog(raw)
    }

    fn assemble(fm: BlogFrontmatter, content: String, file_path: PathBuf) -> Self {
        Self {
            title: fm.title,
            slug: fm.slug,
            date_published: fm.date_published,
            updated_at: fm.updated_at,
            excerpt: fm.excerpt,
            tags: fm.tags.unwrap_or_default(),
            // Posts are published unless marked otherwise
            status: fm.status.unwrap_or(Status::Published),
            content,
            file_path,
            extra: fm.extra,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date_published(&self) -> NaiveDate {
        self.date_published
    }

    fn excerpt(&self) -> &str {
        &self.excerpt
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// A coding problem writeup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemPost {
    pub title: String,
    pub slug: String,
    pub source: Source,
    pub difficulty: Difficulty,
    pub date_published: NaiveDate,
    pub time_complexity: String,
    pub space_complexity: String,
    pub excerpt: String,

    /// Raw markdown body
    pub content: String,

    #[serde(skip)]
    pub file_path: PathBuf,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PartialEq for ProblemPost {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.slug == other.slug
            && self.source == other.source
            && self.difficulty == other.difficulty
            && self.date_published == other.date_published
            && self.time_complexity == other.time_complexity
            && self.space_complexity == other.space_complexity
            && self.excerpt == other.excerpt
            && self.content == other.content
            && self.extra == other.extra
    }
}

impl ContentRecord for ProblemPost {
    type Frontmatter = ProblemFrontmatter;

    const KIND: ContentKind = ContentKind::Problem;

    fn validate(raw: &Mapping) -> Result<ProblemFrontmatter, ValidationError> {
        schema::validate_problem(raw)
    }

    fn assemble(fm: ProblemFrontmatter, content: String, file_path: PathBuf) -> Self {
        Self {
            title: fm.title,
            slug: fm.slug,
            source: fm.source,
            difficulty: fm.difficulty,
            date_published: fm.date_published,
            time_complexity: fm.time_complexity,
            space_complexity: fm.space_complexity,
            excerpt: fm.excerpt,
            content,
            file_path,
            extra: fm.extra,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date_published(&self) -> NaiveDate {
        self.date_published
    }

    fn excerpt(&self) -> &str {
        &self.excerpt
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn file_path(&self) -> &Path {
        &self.file_path
    }
}
