//! Print a single published record

use anyhow::Result;

use crate::content::{ContentError, ContentRecord, MarkdownRenderer};
use crate::Folio;

use super::Collection;

/// Print the record with `slug`, either raw or rendered to HTML
pub async fn run(folio: &Folio, collection: Collection, slug: &str, html: bool) -> Result<()> {
    let repo = folio.repository();
    let renderer = html.then(|| folio.renderer());

    let text = match collection {
        Collection::Blog => {
            let post = repo
                .get_published_blog_post_by_slug(slug)
                .await
                .map_err(not_found)?;
            format_record(&post, renderer.as_ref())
        }
        Collection::Problems => {
            let problem = repo
                .get_published_problem_by_slug(slug)
                .await
                .map_err(not_found)?;
            format_record(&problem, renderer.as_ref())
        }
    };

    print!("{}", text);
    Ok(())
}

fn format_record<R: ContentRecord>(record: &R, renderer: Option<&MarkdownRenderer>) -> String {
    match renderer {
        Some(renderer) => format!("{}\n", renderer.render(record.content())),
        None => format!(
            "# {}\n\n> {}\n\n{}",
            record.title(),
            record.excerpt(),
            record.content()
        ),
    }
}

/// Report drafts as missing, like the public site does
fn not_found(err: ContentError) -> anyhow::Error {
    match err {
        ContentError::NotPublished { kind, slug } => {
            ContentError::NotFound { kind, slug }.into()
        }
        other => other.into(),
    }
}
