use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn, Level};

use classavail::catalog::{CatalogConfig, ClassAvailClient, Course, SearchCriteria};

/// Lists UH Manoa class availability, optionally filtered by requirement tags.
#[derive(Debug, Parser)]
#[command(name = "classavail", version)]
struct Args {
    /// Department code (e.g. ICS); every department when omitted
    #[arg(long)]
    dept: Option<String>,

    /// General education tag (FGA, FGB, FGC, FS, FW, HSL, NI)
    #[arg(long)]
    gen_ed: Option<String>,

    /// Diversification tag (DA, DB, DH, DL, DP, DS, DY)
    #[arg(long)]
    div: Option<String>,

    /// Focus tag (ETH, HAP, OC, WI)
    #[arg(long)]
    focus: Option<String>,

    /// Only list courses with an online meeting
    #[arg(long)]
    online: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print courses as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CatalogConfig::default(),
    };

    let criteria = SearchCriteria {
        department: args.dept,
        gen_ed: args.gen_ed,
        diversification: args.div,
        focus: args.focus,
        online_only: args.online,
    };

    // Ctrl-C takes effect between departments.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current department");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let client = ClassAvailClient::with_config(config)?;
    let catalogs = client
        .load_departments(&criteria.departments(), &cancel)
        .await?;

    let courses: Vec<Course> = catalogs.into_iter().flat_map(|c| c.courses).collect();
    let loaded = courses.len();
    let courses = criteria.filter(courses);
    info!("{} of {} courses match", courses.len(), loaded);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else {
        for course in &courses {
            println!("{course}\n");
        }
    }

    Ok(())
}
