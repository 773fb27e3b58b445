//! Validate every content file

use anyhow::Result;

use crate::content::{ContentError, LoadReport};
use crate::Folio;

/// Validate both collections and print every file that would be skipped
///
/// Fails when any file is invalid, so the command can gate a deploy.
pub async fn run(folio: &Folio) -> Result<()> {
    let repo = folio.repository();

    let blog = repo.check_blog_posts().await?;
    let problems = repo.check_problems().await?;

    print_report("Blog posts", &blog);
    print_report("Problems", &problems);

    let failures = blog.failures.len() + problems.failures.len();
    if failures > 0 {
        anyhow::bail!("{} content file(s) failed validation", failures);
    }

    println!("All content is valid.");
    Ok(())
}

fn print_report<R>(label: &str, report: &LoadReport<R>) {
    println!(
        "{}: {} valid, {} invalid",
        label,
        report.records.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        match failure {
            ContentError::Validation { path, source } => {
                println!("  {}", path.display());
                for violation in &source.violations {
                    println!("    - {}", violation);
                }
            }
            other => println!("  {}", other),
        }
    }
}
