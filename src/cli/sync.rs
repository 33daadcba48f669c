use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error, info,
    management::LocalInventory,
    success,
    sync::{Synchronizer, reconcile},
    types::{SummaryTableRow, SyncReport},
    vk::{Authorizer, BrowserPrompt, CatalogClient},
    warning,
};

pub async fn sync(config: &Config) {
    let started = Instant::now();

    let credential = match Authorizer::new(config).authorize(&BrowserPrompt).await {
        Ok(credential) => credential,
        Err(e) => error!("Authorization failed: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching your music collection...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let entries = match CatalogClient::new(config)
        .fetch(&credential.user_id, &credential.access_token)
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot fetch music collection: {}", e);
        }
    };
    pb.finish_and_clear();
    info!("Found {} songs in your collection.", entries.len());

    let mut inventory = match LocalInventory::scan(&config.output_dir).await {
        Ok(inventory) => inventory,
        Err(e) => error!("Cannot scan output folder: {}", e),
    };

    let plan = reconcile(entries, &inventory.ids());
    info!(
        "{} new, {} removed, {} already in {}.",
        plan.to_download.len(),
        plan.to_delete.len(),
        plan.tracks.len() - plan.to_download.len(),
        config.output_dir.display()
    );

    let report = Synchronizer::new(config).execute(&plan, &mut inventory).await;

    print_summary(&report, started.elapsed());
}

fn print_summary(report: &SyncReport, elapsed: Duration) {
    for (id, reason) in &report.failed_downloads {
        warning!("Track {} was not downloaded: {}", id, reason);
    }
    for (path, reason) in &report.failed_tags {
        warning!("{} was not tagged: {}", path.display(), reason);
    }

    let rows = vec![
        row("Deleted", report.deleted.len()),
        row("Downloaded", report.downloaded.len()),
        row("Failed downloads", report.failed_downloads.len()),
        row("Tagged", report.tagged.len()),
        row("Failed tags", report.failed_tags.len()),
        SummaryTableRow {
            step: "Processing time".to_string(),
            count: format!("{:.2}s", elapsed.as_secs_f64()),
        },
    ];

    println!("{}", Table::new(rows));
    success!("Done.");
}

fn row(step: &str, count: usize) -> SummaryTableRow {
    SummaryTableRow {
        step: step.to_string(),
        count: count.to_string(),
    }
}
