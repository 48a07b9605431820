use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use webharvest::{CrawlConfig, CrawlOutcome, Crawler, ExportFormat};

#[derive(Parser, Debug)]
#[command(
    name = "webharvest",
    version,
    about = "Crawl a website breadth-first and export the collected pages"
)]
struct Cli {
    /// Seed URL to start crawling from (explicit http:// or https:// scheme)
    base_url: String,

    /// Maximum number of pages to collect (1-100)
    #[arg(long, default_value_t = 10)]
    max_pages: usize,

    /// Maximum crawl depth from the seed (1-10)
    #[arg(long, default_value_t = 3)]
    max_depth: u32,

    /// Comma-separated keywords; only pages containing at least one are kept
    #[arg(long, default_value = "")]
    keywords: String,

    /// Outbound request budget per second (1-60)
    #[arg(long, default_value_t = 5)]
    requests_per_second: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Export formats, comma-separated
    #[arg(long = "format", value_enum, value_delimiter = ',', default_value = "json")]
    formats: Vec<ExportFormat>,

    /// Directory to write exports into
    #[arg(long, default_value = "scraped")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webharvest=info,warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = CrawlConfig::new(&cli.base_url)
        .with_max_pages(cli.max_pages)
        .with_max_depth(cli.max_depth)
        .with_keywords(&cli.keywords)
        .with_requests_per_second(cli.requests_per_second)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    // Configuration problems surface here, before any request goes out.
    let crawler = Crawler::new(config)?;

    let cancel = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping, keeping pages collected so far...");
            cancel.cancel();
        }
    });

    let (tx, mut rx) = mpsc::channel::<webharvest::ProgressEvent>(100);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("Scraped: {} (depth {})", event.url, event.depth);
        }
    });

    let report = crawler.run_with_progress(Some(tx)).await?;
    printer.await?;

    let reason = match report.outcome {
        CrawlOutcome::BudgetReached => "page budget reached",
        CrawlOutcome::Drained => "no more links to follow",
        CrawlOutcome::Cancelled => "cancelled",
    };
    println!("Crawl finished ({reason}): {} page(s) collected", report.records.len());

    if report.records.is_empty() {
        println!("Nothing to export.");
        return Ok(());
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    let mut failures = 0usize;
    for format in &cli.formats {
        let path = format.default_path(&cli.output_dir);
        match webharvest::export(&report.records, *format, &path) {
            Ok(()) => println!("Exported {format:?} to {}", path.display()),
            Err(err) => {
                failures += 1;
                eprintln!("Export {format:?} failed: {err}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} export(s) failed");
    }
    Ok(())
}
