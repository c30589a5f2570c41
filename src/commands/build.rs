//! Build manifests, snapshots and mirrored assets

use anyhow::Result;

use crate::generator::{BuildReport, ManifestGenerator};
use crate::watch::ContentWatcher;
use crate::Site;

/// Run the generator once and print its summary line
pub async fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let report = ManifestGenerator::new(site).run().await?;
    println!("{}", report);

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}

/// Re-run the generator whenever the content directory changes
pub async fn watch(site: &Site) -> Result<()> {
    let mut watcher = ContentWatcher::new(&[site.content_dir.as_path()])?;
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(paths) = watcher.changed().await {
        for path in &paths {
            println!("File changed: {}", path.display());
        }

        // Pick up a changed config.json as well as content
        site.invalidate().await;
        if let Err(e) = run(site).await {
            tracing::error!("Generation failed: {:#}", e);
        }
    }

    Ok(())
}
