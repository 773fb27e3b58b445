//! List site content

use anyhow::Result;

use crate::Folio;

use super::Collection;

/// List a collection, newest first
pub async fn run(folio: &Folio, collection: Collection, include_drafts: bool) -> Result<()> {
    let repo = folio.repository();

    match collection {
        Collection::Blog => {
            let posts = if include_drafts {
                repo.list_all_blog_posts().await?
            } else {
                repo.list_published_blog_posts().await?
            };
            println!("Blog posts ({}):", posts.len());
            for post in posts {
                let marker = if post.is_draft() { " (draft)" } else { "" };
                println!(
                    "  {} - {} [{}]{}",
                    post.date_published,
                    post.title,
                    post.slug,
                    marker
                );
            }
        }
        Collection::Problems => {
            // Problems have no drafts, so both listings agree
            let problems = repo.list_published_problems().await?;
            println!("Problems ({}):", problems.len());
            for problem in problems {
                println!(
                    "  {} - {} [{}] {}/{} time {} space {}",
                    problem.date_published,
                    problem.title,
                    problem.slug,
                    problem.source,
                    problem.difficulty,
                    problem.time_complexity,
                    problem.space_complexity
                );
            }
        }
    }

    Ok(())
}
