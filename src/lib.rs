//! folio: content engine for a portfolio site
//!
//! Blog posts and coding-problem writeups are authored as markdown files
//! with a front-matter header. This crate discovers those files, validates
//! their metadata, and serves sorted, draft-gated collections to the
//! command line and to a small HTTP API.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod repository;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{BlogPost, ContentError, ProblemPost};
pub use repository::ContentRepository;

/// Configuration file looked up in the site directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root (holds the blog and problems directories)
    pub content_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Build the content repository for this site
    pub fn repository(&self) -> ContentRepository {
        ContentRepository::from_config(&self.config, &self.base_dir)
    }

    /// Build a markdown renderer with the site's highlight settings
    pub fn renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::from_config(&self.config.highlight)
    }
}
