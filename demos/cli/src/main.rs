use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use transport_core::{SystemClock, TransportConfig};
use transport_records::summarize_portfolio_str;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "transport-cli",
    about = "Value transport bookings and total the portfolio from JSON exports."
)]
struct Args {
    /// JSON array of upstream booking rows.
    #[arg(short, long)]
    bookings: PathBuf,

    /// JSON array of upstream hospital rows.
    #[arg(short = 'H', long)]
    hospitals: PathBuf,

    /// Tariff in currency units per kilometre.
    #[arg(long)]
    rate: Option<f64>,

    /// Offset (minutes east of UTC) of the pickup date/time fields.
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,

    /// Print the full summary as JSON.
    #[arg(long)]
    json: bool,

    /// Log fallback decisions.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let bookings = std::fs::read_to_string(&args.bookings)
        .with_context(|| format!("could not read bookings file {:?}", args.bookings))?;
    let hospitals = std::fs::read_to_string(&args.hospitals)
        .with_context(|| format!("could not read hospitals file {:?}", args.hospitals))?;

    let mut config = TransportConfig::default();
    if let Some(rate) = args.rate {
        config.tariff_per_km = rate;
    }
    if let Some(minutes) = args.utc_offset_minutes {
        config.utc_offset_minutes = minutes;
    }

    let summary = summarize_portfolio_str(&bookings, &hospitals, &config, &SystemClock)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Generated at: {}\nBookings: {} ({} active, {} rejected rows)\nPortfolio total: {}",
        summary.generated_at,
        summary.booking_count,
        summary.active_count,
        summary.rejected_records,
        summary.total_value
    );
    for (source, count) in &summary.valued_by {
        println!("  {source:?}: {count}");
    }

    Ok(())
}
