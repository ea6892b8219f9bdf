use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use geo_router::config::load_config;
use geo_router::edge::handle_event_json;
use geo_router::http::INVOKE_PATH;
use geo_router::observability::logging;
use geo_router::GeoRouter;

#[derive(Parser)]
#[command(name = "geo-router-cli")]
#[command(about = "Tooling for geo-router configurations and edge events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration and print the compiled tables
    Check {
        #[arg(short, long, default_value = "geo-router.toml")]
        config: PathBuf,
    },
    /// Run one edge event through the router offline
    Decide {
        #[arg(short, long, default_value = "geo-router.toml")]
        config: PathBuf,
        /// Event JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: PathBuf,
    },
    /// Send an edge event to a running host
    Invoke {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Event JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_stderr_logging("warn")?;

    match cli.command {
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let router = GeoRouter::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&summary(&router))?);
        }
        Commands::Decide { config, event } => {
            let config = load_config(&config)?;
            let router = GeoRouter::from_config(&config)?;
            let payload = read_event(&event)?;
            let routed = handle_event_json(&router, &payload)?;
            eprintln!(
                "country={} region={} served_by={} outcome={}",
                routed.resolution.country.as_str(),
                routed.resolution.region.as_ref().map(|r| r.as_str()).unwrap_or("none"),
                routed.resolution.served_by.as_ref().map(|r| r.as_str()).unwrap_or("none"),
                routed.outcome.as_str()
            );
            println!("{}", serde_json::to_string_pretty(&routed.decision)?);
        }
        Commands::Invoke { url, event } => {
            let payload = read_event(&event)?;
            let client = reqwest::Client::new();
            let res = client
                .post(format!("{}{}", url.trim_end_matches('/'), INVOKE_PATH))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn read_event(path: &Path) -> Result<Vec<u8>, std::io::Error> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}

fn summary(router: &GeoRouter) -> Value {
    let countries: Map<String, Value> = router
        .routes()
        .iter()
        .map(|(country, region)| (country.to_string(), Value::from(region.as_str())))
        .collect();
    let origins: Map<String, Value> = router
        .origins()
        .iter()
        .map(|(region, origin)| (region.to_string(), Value::from(origin.base_url())))
        .collect();

    let policy = router.policy();
    json!({
        "mode": policy.mode,
        "unmatched_policy": policy.unmatched,
        "default_region": router.default_region().as_str(),
        "fallback_region": router.fallback_region().as_str(),
        "countries": countries,
        "origins": origins,
    })
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("edge host returned status {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
