use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use service_client::config::validation::validate_config;
use service_client::config::{load_or_default, ConfigError, TEMPLATE_SERVICE, USER_SERVICE};
use service_client::observability::{logging, metrics};
use service_client::{ClientError, ServiceClient};

#[derive(Parser)]
#[command(name = "service-cli")]
#[command(about = "Fetch records from internal services through their circuit breakers", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the internal API base URL (takes precedence over INTERNAL_API_BASE_URL).
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    User,
    Template,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a user by id
    User { user_id: String },
    /// Fetch a template by code
    Template { template_code: String },
    /// Call a service repeatedly and show breaker state after each call
    Watch {
        #[arg(value_enum)]
        resource: Resource,
        identifier: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.http.base_url = base_url;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::debug!(
        base_url = %config.http.base_url,
        max_failures = config.breaker.max_failures,
        reset_timeout_secs = config.breaker.reset_timeout_secs,
        request_timeout_secs = config.http.request_timeout_secs,
        "Configuration loaded"
    );

    let client = ServiceClient::from_config(&config)?;

    match cli.command {
        Commands::User { user_id } => {
            print_outcome(client.try_get_user_data(&user_id).await.map(|r| json!(r)))?;
        }
        Commands::Template { template_code } => {
            print_outcome(client.try_get_template_data(&template_code).await.map(|r| json!(r)))?;
        }
        Commands::Watch {
            resource,
            identifier,
            count,
            interval_ms,
        } => {
            for attempt in 1..=count {
                let outcome = match resource {
                    Resource::User => client.try_get_user_data(&identifier).await.map(|r| json!(r)),
                    Resource::Template => {
                        client.try_get_template_data(&identifier).await.map(|r| json!(r))
                    }
                };
                let service = match resource {
                    Resource::User => USER_SERVICE,
                    Resource::Template => TEMPLATE_SERVICE,
                };
                let kind = match &outcome {
                    Ok(_) => "success",
                    Err(e) => e.kind(),
                };
                let snapshot = client.registry().snapshot(service, Instant::now())?;
                let line = json!({
                    "attempt": attempt,
                    "outcome": kind,
                    "breaker": snapshot,
                });
                println!("{}", line);
                if attempt < count {
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: Result<Value, ClientError>) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        Err(e) => {
            eprintln!("Error ({}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
    Ok(())
}
