//! Content repository - the operations pages are built from
//!
//! Every call reads the content tree again (or revalidates the record cache
//! when it is enabled), so edits show up on the next request.

use std::path::{Path, PathBuf};

use crate::cache::RecordCache;
use crate::config::SiteConfig;
use crate::content::gate::{self, Publishable};
use crate::content::schema::is_valid_slug;
use crate::content::{
    BlogPost, CollectionLoader, ContentError, ContentRecord, LoadReport, ProblemPost,
};

/// Read access to the blog and problem collections
pub struct ContentRepository {
    blog_dir: PathBuf,
    problems_dir: PathBuf,
    extensions: Vec<String>,
    blog_cache: Option<RecordCache<BlogPost>>,
    problem_cache: Option<RecordCache<ProblemPost>>,
}

impl ContentRepository {
    /// Create a repository over explicit collection directories
    pub fn new<P: Into<PathBuf>>(blog_dir: P, problems_dir: P, extensions: Vec<String>) -> Self {
        Self {
            blog_dir: blog_dir.into(),
            problems_dir: problems_dir.into(),
            extensions,
            blog_cache: None,
            problem_cache: None,
        }
    }

    /// Create a repository from site configuration rooted at `base_dir`
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let repo = Self::new(
            content_dir.join(&config.blog_dir),
            content_dir.join(&config.problems_dir),
            config.extensions.clone(),
        );
        if config.cache {
            repo.with_cache()
        } else {
            repo
        }
    }

    /// Reuse parsed records while their files are unchanged
    pub fn with_cache(mut self) -> Self {
        self.blog_cache = Some(RecordCache::new());
        self.problem_cache = Some(RecordCache::new());
        self
    }

    pub fn blog_dir(&self) -> &Path {
        &self.blog_dir
    }

    pub fn problems_dir(&self) -> &Path {
        &self.problems_dir
    }

    fn loader<'a, R: ContentRecord>(
        &'a self,
        root: &Path,
        cache: Option<&'a RecordCache<R>>,
    ) -> CollectionLoader<'a, R> {
        let loader = CollectionLoader::new(root, &self.extensions);
        match cache {
            Some(cache) => loader.with_cache(cache),
            None => loader,
        }
    }

    fn blog_loader(&self) -> CollectionLoader<'_, BlogPost> {
        self.loader(&self.blog_dir, self.blog_cache.as_ref())
    }

    fn problem_loader(&self) -> CollectionLoader<'_, ProblemPost> {
        self.loader(&self.problems_dir, self.problem_cache.as_ref())
    }

    /// Every valid blog post, drafts included, newest first
    pub async fn list_all_blog_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        self.blog_loader().load().await
    }

    /// Published blog posts, newest first
    pub async fn list_published_blog_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        Ok(gate::published(self.list_all_blog_posts().await?))
    }

    /// A published blog post by slug
    ///
    /// Fails with `NotPublished` for drafts and `NotFound` otherwise.
    pub async fn get_published_blog_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<BlogPost, ContentError> {
        get_published(self.blog_loader(), slug).await
    }

    /// Every valid problem writeup, newest first
    pub async fn list_all_problems(&self) -> Result<Vec<ProblemPost>, ContentError> {
        self.problem_loader().load().await
    }

    /// Published problem writeups, newest first
    pub async fn list_published_problems(&self) -> Result<Vec<ProblemPost>, ContentError> {
        Ok(gate::published(self.list_all_problems().await?))
    }

    /// A published problem writeup by slug
    pub async fn get_published_problem_by_slug(
        &self,
        slug: &str,
    ) -> Result<ProblemPost, ContentError> {
        get_published(self.problem_loader(), slug).await
    }

    /// Validate every blog post file and report the ones that fail
    pub async fn check_blog_posts(&self) -> Result<LoadReport<BlogPost>, ContentError> {
        self.blog_loader().load_report().await
    }

    /// Validate every problem file and report the ones that fail
    pub async fn check_problems(&self) -> Result<LoadReport<ProblemPost>, ContentError> {
        self.problem_loader().load_report().await
    }
}

async fn get_published<R: Publishable>(
    loader: CollectionLoader<'_, R>,
    slug: &str,
) -> Result<R, ContentError> {
    // No file can carry a slug that breaks the pattern
    if !is_valid_slug(slug) {
        return Err(ContentError::NotFound {
            kind: R::KIND,
            slug: slug.to_string(),
        });
    }
    let record = loader.find_by_slug(slug).await?;
    gate::require_published(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Difficulty, Status};
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, ContentRepository) {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let repo = ContentRepository::from_config(&config, dir.path());
        (dir, repo)
    }

    fn write(path: PathBuf, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn write_blog(repo: &ContentRepository, slug: &str, date: &str, status: Option<&str>) {
        let status = status
            .map(|s| format!("status: {}\n", s))
            .unwrap_or_default();
        write(
            repo.blog_dir().join(format!("{}.md", slug)),
            &format!(
                "---\ntitle: {slug}\nslug: {slug}\ndatePublished: {date}\nexcerpt: About {slug}.\n{status}---\nBody\n"
            ),
        );
    }

    fn write_problem(repo: &ContentRepository, slug: &str, difficulty: &str) {
        write(
            repo.problems_dir().join(format!("{}.md", slug)),
            &format!(
                r#"---
title: {slug}
slug: {slug}
source: leetcode
difficulty: {difficulty}
datePublished: 2024-01-01
timeComplexity: O(n)
spaceComplexity: O(1)
excerpt: Notes on {slug}.
---
Solution
"#
            ),
        );
    }

    #[tokio::test]
    async fn test_empty_site_lists_nothing() {
        let (_dir, repo) = site();
        assert!(repo.list_published_blog_posts().await.unwrap().is_empty());
        assert!(repo.list_published_problems().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drafts_are_hidden_from_listing_but_still_parsed() {
        let (_dir, repo) = site();
        write_blog(&repo, "live-post", "2024-02-01", None);
        write_blog(&repo, "draft-post", "2024-03-01", Some("draft"));
        write_blog(&repo, "explicit-post", "2024-01-01", Some("published"));

        let published: Vec<String> = repo
            .list_published_blog_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(published, vec!["live-post", "explicit-post"]);

        let all = repo.list_all_blog_posts().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].slug, "draft-post");
        assert_eq!(all[0].status, Status::Draft);
    }

    #[tokio::test]
    async fn test_get_blog_post_by_slug() {
        let (_dir, repo) = site();
        write_blog(&repo, "live-post", "2024-02-01", None);
        write_blog(&repo, "draft-post", "2024-03-01", Some("draft"));

        let post = repo.get_published_blog_post_by_slug("live-post").await.unwrap();
        assert_eq!(post.title, "live-post");

        let err = repo
            .get_published_blog_post_by_slug("draft-post")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotPublished { .. }));

        let err = repo
            .get_published_blog_post_by_slug("missing-slug")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_malformed_slug_request_is_not_found() {
        let (_dir, repo) = site();
        write_blog(&repo, "live-post", "2024-02-01", None);

        for slug in ["../live-post", "Live-Post", ""] {
            let err = repo.get_published_blog_post_by_slug(slug).await.unwrap_err();
            assert!(matches!(err, ContentError::NotFound { .. }), "{:?}", slug);
        }
    }

    #[tokio::test]
    async fn test_problems() {
        let (_dir, repo) = site();
        write_problem(&repo, "two-sum", "easy");
        write_problem(&repo, "valid-palindrome", "easy");
        write(
            repo.problems_dir().join("first-unique-character.md"),
            "---\ntitle: First Unique Character\nslug: first-unique-character\n---\n",
        );

        let problems = repo.list_published_problems().await.unwrap();
        assert_eq!(problems.len(), 2);

        let problem = repo.get_published_problem_by_slug("two-sum").await.unwrap();
        assert_eq!(problem.difficulty, Difficulty::Easy);

        let err = repo
            .get_published_problem_by_slug("first-unique-character")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));

        let report = repo.check_problems().await.unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_filesystem_error_fails_the_whole_listing() {
        let (_dir, repo) = site();
        write_blog(&repo, "live-post", "2024-02-01", None);
        std::os::unix::fs::symlink(
            repo.blog_dir().join("nowhere.md"),
            repo.blog_dir().join("x.md"),
        )
        .unwrap();

        let err = repo.list_published_blog_posts().await.unwrap_err();
        assert!(matches!(err, ContentError::Filesystem { .. }), "{:?}", err);

        let err = repo
            .get_published_blog_post_by_slug("live-post")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Filesystem { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_cached_repository_sees_status_changes() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            cache: true,
            ..Default::default()
        };
        let repo = ContentRepository::from_config(&config, dir.path());
        write_blog(&repo, "soon", "2024-02-01", Some("draft"));

        assert!(repo.list_published_blog_posts().await.unwrap().is_empty());

        write_blog(&repo, "soon", "2024-02-01", Some("published"));
        let posts = repo.list_published_blog_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
    }
}
