//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Pre-render every post, failing if any post could not be rendered
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let source = blog.source()?;
    let generator = Generator::new(blog, source)?;
    let report = generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts in {:.2}s",
        report.generated.len(),
        duration.as_secs_f64()
    );

    if !report.failed.is_empty() {
        for (uid, reason) in &report.failed {
            tracing::error!("{}: {}", uid, reason);
        }
        anyhow::bail!("{} post(s) failed to generate", report.failed.len());
    }

    Ok(())
}
