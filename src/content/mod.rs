//! Content module - blog posts and problem writeups loaded from markdown

pub mod discovery;
pub mod error;
pub mod frontmatter;
pub mod gate;
pub mod loader;
mod markdown;
pub mod parser;
mod post;
pub mod schema;

pub use error::{ContentError, ContentKind, FieldViolation, Rule, ValidationError};
pub use gate::Publishable;
pub use loader::{CollectionLoader, LoadReport};
pub use markdown::MarkdownRenderer;
pub use post::{BlogPost, ContentRecord, ProblemPost};
pub use schema::{BlogFrontmatter, Difficulty, ProblemFrontmatter, Source, Status};
