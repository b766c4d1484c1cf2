/*
[INPUT]:  CLI arguments, YAML configuration file, request data
[OUTPUT]: Signed OpenSRS requests and JSON-rendered responses
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or subcommands
*/

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use opensrs_client::OpensrsClient;
use opensrs_client::http::signature::sign;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use opensrs_cli::{load_settings, request_data};

#[derive(Parser, Debug)]
#[command(name = "opensrs", version, about = "OpenSRS XML API client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one request and print the parsed reply
    Call {
        /// YAML or JSON file holding the request fields
        #[arg(long = "data", value_name = "FILE")]
        data: Option<PathBuf>,
        /// Request field as key=value; dots nest (attributes.domain=example.com)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Print the X-Signature for a request body file
    Sign {
        #[arg(long = "key", value_name = "KEY")]
        key: String,
        body: PathBuf,
    },
    /// Validate configuration without contacting the server
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Call { data, fields } => {
            let client = build_client(args.config_path.as_ref())?;
            let request = request_data(data.as_deref(), &fields)?;
            info!(url = %client.request_url(), fields = request.len(), "sending request");

            let response = client
                .call(request)
                .await
                .map_err(|err| anyhow!("{:?}: {err}", err.kind()))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Sign { key, body } => {
            let content = std::fs::read_to_string(&body)
                .with_context(|| format!("read body file {}", body.display()))?;
            println!("{}", sign(&content, &key));
        }
        Command::Check => {
            let client = build_client(args.config_path.as_ref())?;
            info!(url = %client.request_url(), "configuration valid");
            println!("ok");
        }
    }

    Ok(())
}

fn build_client(config_path: Option<&PathBuf>) -> Result<OpensrsClient> {
    let path = config_path.context("--config is required for this command")?;
    let config = load_settings(path)?;
    info!(
        config_path = %path.display(),
        server = %config.server,
        "configuration loaded"
    );
    OpensrsClient::new(config).context("build client")
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
