//! ListingView command line
//!
//! `report` prints what cleaning removed and the state/status summary tables,
//! `clean` writes the cleaned listings, and `serve` (with the `server`
//! feature) exposes the dashboard over WebSocket.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use listingview::{
    clean, state_summary, status_summary, CleaningReport, GroupSummary, ListingTable,
};

#[derive(Parser)]
#[command(name = "listingview", about = "Real-estate listings dashboard engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cleaning report and the state and status summaries
    Report {
        /// Listings file (comma-separated, with header)
        file: PathBuf,
        /// Also print the first N cleaned listings as JSON
        #[arg(long, default_value_t = 0)]
        head: usize,
    },
    /// Write the rows that have every analysis field
    Clean {
        file: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Serve dashboard sessions over WebSocket
    #[cfg(feature = "server")]
    Serve {
        file: PathBuf,
        /// Polygon vertices for the map (long,lat,group,order,region)
        #[arg(long)]
        geometry: Option<PathBuf>,
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
        /// States shown by the comparison view at start
        #[arg(long, default_value_t = 5)]
        compared_states: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { file, head } => report(&file, head)?,
        Commands::Clean { file, output } => {
            let raw = ListingTable::from_csv_path(&file)?;
            let cleaned = clean(&raw);
            cleaned.write_csv(BufWriter::new(File::create(&output)?))?;
            log::info!("Wrote {} listings to {}", cleaned.len(), output.display());
        }
        #[cfg(feature = "server")]
        Commands::Serve {
            file,
            geometry,
            host,
            port,
            compared_states,
        } => {
            let tables = listingview::SharedTables::load(&file, geometry.as_deref())?;
            let config = listingview::DashboardConfig {
                compared_states,
                ..Default::default()
            };
            actix_web::rt::System::new().block_on(listingview::server::run_server(
                &host, port, tables, config,
            ))?;
        }
    }

    Ok(())
}

fn report(file: &std::path::Path, head: usize) -> Result<(), Box<dyn std::error::Error>> {
    let raw = ListingTable::from_csv_path(file)?;
    let cleaned = clean(&raw);

    println!("Cleaning");
    print!("{}", CleaningReport::new(&raw, &cleaned)?);
    let strings = raw.table().interner_stats();
    println!(
        "  {} distinct strings over {} text cells (~{} KiB)",
        strings.unique_strings,
        strings.total_occurrences,
        strings.memory_bytes / 1024
    );

    println!();
    println!("By state (highest average price first)");
    print_summaries("state", &state_summary(&cleaned)?);

    println!();
    println!("By status (most listings first)");
    print_summaries("status", &status_summary(&cleaned)?);

    if head > 0 {
        println!();
        for record in cleaned.head(head)? {
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}

fn print_summaries(key: &str, summaries: &[GroupSummary]) {
    println!(
        "{:<24} {:>14} {:>14} {:>10}",
        key, "avg_price", "median_size", "count"
    );
    for s in summaries {
        println!(
            "{:<24} {:>14} {:>14} {:>10}",
            s.key,
            format_number(s.avg_price),
            format_number(s.median_size),
            s.count
        );
    }
}

fn format_number(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.2}", v))
}
