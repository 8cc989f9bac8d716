use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gold_dashboard_lib::core::presenter;
use gold_dashboard_lib::{Aggregator, DashboardConfig, Summarizer};

/// Gold price, news and economic calendar in one refresh.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the refresh as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Ask Gemini for a short briefing on the refreshed data (needs GEMINI_API_KEY).
    #[arg(long)]
    summarize: bool,

    /// Also read the secondary news feed (up to 15 headlines).
    #[arg(long)]
    secondary_news: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays machine readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::from_env();
    if args.secondary_news {
        config = config.with_secondary_news();
    }

    info!("Refreshing gold dashboard ({} news feeds)", config.feeds.len());
    let result = Aggregator::new(&config).refresh().await;

    let summary = if args.summarize {
        Some(Summarizer::new(config.summarizer.clone()).summarize(&result).await)
    } else {
        None
    };

    if args.json {
        let mut value = serde_json::to_value(&result)?;
        if let Some(summary) = &summary {
            value["summary"] = match summary {
                Ok(s) => serde_json::to_value(s)?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            };
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", presenter::render(&result));
        if let Some(summary) = &summary {
            print!("{}", presenter::render_summary(summary));
        }
    }

    Ok(())
}
