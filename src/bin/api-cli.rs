use std::collections::BTreeMap;

use api_tester_sdk::{ApiResponse, ApiTesterClient, RelayCall};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "api-cli")]
#[command(about = "Management CLI for the API tester backend", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Health,
    /// Inspect or clear request history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// List collections
    Collections,
    /// Relay a request through the backend
    Send {
        /// HTTP method
        method: String,
        /// Target URL
        url: String,
        /// Header as name:value, repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// JSON body (sent as text when it does not parse)
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show one page of history
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one entry with its response body
    Show { id: String },
    /// Delete one entry
    Delete { id: String },
    /// Delete every entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ApiTesterClient::new(&cli.url);

    let res = match cli.command {
        Commands::Health => client.health().await?,
        Commands::History { action } => match action {
            HistoryAction::List { page, limit } => client.history(page, limit).await?,
            HistoryAction::Show { id } => client.history_entry(&id).await?,
            HistoryAction::Delete { id } => client.delete_history_entry(&id).await?,
            HistoryAction::Clear => client.clear_history().await?,
        },
        Commands::Collections => client.collections().await?,
        Commands::Send {
            method,
            url,
            headers,
            data,
        } => {
            let mut call = RelayCall::new(&method, &url);
            call.headers = parse_headers(&headers)?;
            call.body = data.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)));
            client.send_request(&call).await?
        }
    };

    print_response(res)
}

fn parse_headers(raw: &[String]) -> Result<Option<BTreeMap<String, String>>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|h| match h.split_once(':') {
            Some((name, value)) => Ok((name.trim().to_string(), value.trim().to_string())),
            None => Err(format!("Invalid header '{}', expected name:value", h)),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}

fn print_response(res: ApiResponse) -> Result<(), Box<dyn std::error::Error>> {
    if !res.is_success() {
        eprintln!("Error: API returned status {}", res.status);
    }
    println!("{}", serde_json::to_string_pretty(&res.body)?);
    Ok(())
}
