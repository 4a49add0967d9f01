//! distree CLI - merge distributions and compute their commitment
//!
//! Reads and writes distributions as JSON documents. Results go to stdout as
//! JSON; logs go to stderr and are filtered with `RUST_LOG`.

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use distree::model::format_address;
use distree::{Distribution, Hash};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "distree")]
#[command(about = "Accumulate token reward distributions and build their merkle commitment")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum distributions in the order given
    Merge {
        /// Distribution files to add together
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Write the merged distribution here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the two-level merkle commitment for a distribution
    Merklize {
        /// Distribution file
        input: PathBuf,
        /// Fail unless the account root equals this hex hash
        #[arg(long)]
        expect_root: Option<String>,
    },

    /// Amount of a token owed to an account
    Get {
        /// Distribution file
        input: PathBuf,
        /// Account address
        account: String,
        /// Token address
        token: String,
    },

    /// Count (account, token) pairs
    Leaves {
        /// Distribution file
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { inputs, output: path } => {
            let mut total = Distribution::new();
            for input in &inputs {
                let part = Distribution::load(input)
                    .map_err(|e| anyhow::anyhow!("{}: {}", input.display(), e))?;
                total.add(&part);
            }
            match path {
                Some(path) => {
                    total.save(&path)?;
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "ok",
                            "output": path.display().to_string(),
                            "inputs": inputs.len(),
                            "accounts": total.num_accounts(),
                            "leaves": total.num_leaves()
                        }),
                    );
                }
                None => output(&cli.format, &serde_json::to_value(&total)?),
            }
        }

        Commands::Merklize { input, expect_root } => {
            let expected = expect_root
                .as_deref()
                .map(|text| {
                    Hash::from_hex(text)
                        .map_err(|e| anyhow::anyhow!("Invalid root {}: {}", text, e))
                })
                .transpose()?;

            let distribution = Distribution::load(&input)?;
            let commitment = distribution.merklize()?;
            if let Some(expected) = expected {
                anyhow::ensure!(
                    commitment.root() == expected,
                    "Root mismatch: expected {}, computed {}",
                    expected,
                    commitment.root()
                );
            }

            let mut accounts = Vec::with_capacity(distribution.num_accounts());
            for (index, (account, tokens)) in distribution.accounts().iter().enumerate() {
                let tree = commitment
                    .token_tree(index)
                    .ok_or_else(|| anyhow::anyhow!("No token tree for {}", account))?;
                accounts.push(serde_json::json!({
                    "account": format_address(account),
                    "tokens": tokens.len(),
                    "token_root": tree.root()
                }));
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "root": commitment.root(),
                    "accounts": distribution.num_accounts(),
                    "leaves": distribution.num_leaves(),
                    "token_trees": accounts
                }),
            );
        }

        Commands::Get {
            input,
            account,
            token,
        } => {
            let distribution = Distribution::load(&input)?;
            let account = parse_address(&account)?;
            let token = parse_address(&token)?;
            let amount = distribution.get(&account, &token);
            output(
                &cli.format,
                &serde_json::json!({
                    "account": format_address(&account),
                    "token": format_address(&token),
                    "amount": amount
                }),
            );
        }

        Commands::Leaves { input } => {
            let distribution = Distribution::load(&input)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "accounts": distribution.num_accounts(),
                    "leaves": distribution.num_leaves()
                }),
            );
        }
    }

    Ok(())
}

fn parse_address(text: &str) -> anyhow::Result<Address> {
    Address::from_str(text).map_err(|e| anyhow::anyhow!("Invalid address {}: {}", text, e))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "failed to render output"),
    }
}
