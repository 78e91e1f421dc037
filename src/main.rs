/// Main entry point for the nutrition tracker
///
/// Sets up logging, resolves configuration from flags and environment, and
/// starts either the HTTP API (default) or the MCP server on stdio.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nutrition_tracker::NutritionTrackerServer;

/// Get the default database path, trying user directories before temp
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".nutrition_tracker");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("nutrition_tracker");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("nutrition_tracker");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".nutrition_tracker");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Make sure the directory is actually writable
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("nutrition.db"));
            }
        }
    }

    let mut temp_path = std::env::temp_dir();
    temp_path.push("nutrition_tracker");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("nutrition.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "NUTRITION_DB")]
    database: Option<PathBuf>,

    /// Address the HTTP API binds to
    #[arg(long, env = "NUTRITION_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port the HTTP API listens on
    #[arg(long, env = "NUTRITION_PORT", default_value_t = 8080)]
    port: u16,

    /// Serve MCP JSON-RPC over stdin/stdout instead of HTTP
    #[arg(long)]
    stdio: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("nutrition_tracker={},tower_http={}", log_level, log_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout is the MCP channel
        .init();

    info!("Starting nutrition tracker");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = NutritionTrackerServer::new(db_path).await?;

    if args.stdio {
        server.run_stdio().await?;
    } else {
        server.serve_http(SocketAddr::new(args.host, args.port)).await?;
    }

    info!("Nutrition tracker shutdown complete");
    Ok(())
}
