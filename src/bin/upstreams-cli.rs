use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "upstreams-cli")]
#[command(about = "Management CLI for the dynamic upstream registry", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token for the admin API, when one is configured.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Status,
    /// List upstreams
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Show a single upstream
    Get { id: u64 },
    /// Add an upstream
    Add {
        server: String,
        #[arg(long)]
        scheme: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        weight: Option<u32>,
        #[arg(long)]
        route: Option<String>,
        /// Create the upstream already marked down.
        #[arg(long)]
        down: bool,
    },
    /// Edit fields of an existing upstream
    Set {
        id: u64,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        scheme: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        weight: Option<u32>,
        #[arg(long)]
        route: Option<String>,
        #[arg(long)]
        down: Option<bool>,
    },
    /// Remove an upstream
    Remove { id: u64 },
    /// Clear the registry and reload the seed configuration
    Purge,
    /// Ask the selector for a backend endpoint
    Pick,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))?,
        );
    }

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::List { page, per_page } => {
            let res = client
                .get(format!(
                    "{}/upstreams?page={page}&per_page={per_page}",
                    cli.url
                ))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { id } => {
            let res = client
                .get(format!("{}/upstreams/{id}", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Add {
            server,
            scheme,
            port,
            weight,
            route,
            down,
        } => {
            let mut body = Map::new();
            body.insert("server".to_string(), Value::String(server));
            if let Some(scheme) = scheme {
                body.insert("scheme".to_string(), Value::String(scheme));
            }
            if let Some(port) = port {
                body.insert("port".to_string(), Value::from(port));
            }
            if let Some(weight) = weight {
                body.insert("weight".to_string(), Value::from(weight));
            }
            if let Some(route) = route {
                body.insert("route".to_string(), Value::String(route));
            }
            if down {
                body.insert("down".to_string(), Value::Bool(true));
            }

            let res = client
                .post(format!("{}/upstreams", cli.url))
                .headers(headers)
                .json(&Value::Object(body))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set {
            id,
            server,
            scheme,
            port,
            weight,
            route,
            down,
        } => {
            let mut body = Map::new();
            if let Some(server) = server {
                body.insert("server".to_string(), Value::String(server));
            }
            if let Some(scheme) = scheme {
                body.insert("scheme".to_string(), Value::String(scheme));
            }
            if let Some(port) = port {
                body.insert("port".to_string(), Value::from(port));
            }
            if let Some(weight) = weight {
                body.insert("weight".to_string(), Value::from(weight));
            }
            if let Some(route) = route {
                body.insert("route".to_string(), Value::String(route));
            }
            if let Some(down) = down {
                body.insert("down".to_string(), Value::Bool(down));
            }

            let res = client
                .patch(format!("{}/upstreams/{id}", cli.url))
                .headers(headers)
                .json(&Value::Object(body))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Remove { id } => {
            let res = client
                .delete(format!("{}/upstreams/{id}", cli.url))
                .headers(headers)
                .send()
                .await?;
            println!("{}", res.status());
        }
        Commands::Purge => {
            let res = client
                .request(
                    reqwest::Method::from_bytes(b"PURGE")?,
                    format!("{}/upstreams", cli.url),
                )
                .headers(headers)
                .send()
                .await?;
            println!("{}", res.status());
        }
        Commands::Pick => {
            let res = client.get(format!("{}/select", cli.url)).send().await?;
            if res.status().is_success() {
                println!("{}", res.text().await?);
            } else {
                eprintln!("no healthy upstream ({})", res.status());
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: admin API returned status {status}");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
