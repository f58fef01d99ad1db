use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::{debug, info};
use txforge_common::traits::{BaseKeyPair, BaseTransaction};
use txforge_common::utils::decode_hex;
use txforge_dot::NetworkConfig;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "txforge")]
#[command(about = "Offline transaction tooling for relay chain and system program transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Chain {
    Dot,
    Sol,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair, or derive one from a 32-byte hex seed
    Keygen {
        #[arg(long, value_enum)]
        chain: Chain,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value = "testnet")]
        network: String,
    },
    /// Decode a raw transaction and print its summary
    Inspect {
        #[arg(long, value_enum)]
        chain: Chain,
        #[arg(long, default_value = "testnet")]
        network: String,
        /// Network bundle file, overrides --network
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(value_name = "RAW")]
        raw: String,
    },
    /// Write a built-in network bundle to a file
    Network {
        #[arg(long)]
        name: String,
        #[arg(short, long, value_name = "OUT")]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Keygen { chain, seed, network } => keygen(chain, seed.as_deref(), &network),
        Commands::Inspect {
            chain,
            network,
            config,
            raw,
        } => inspect(chain, &network, config, &raw),
        Commands::Network { name, out } => export_network(&name, out),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn network_by_name(name: &str) -> CliResult<NetworkConfig> {
    NetworkConfig::by_name(name).ok_or_else(|| format!("unknown network '{}'", name).into())
}

fn keygen(chain: Chain, seed: Option<&str>, network: &str) -> CliResult<String> {
    let seed = seed.map(decode_hex).transpose()?;
    let summary = match chain {
        Chain::Dot => {
            let network = network_by_name(network)?;
            let pair = match &seed {
                Some(seed) => txforge_dot::KeyPair::from_seed(seed)?,
                None => txforge_dot::KeyPair::generate(),
            };
            json!({
                "keys": pair.keys(),
                "address": pair.address_with_format(network.ss58_format)?,
            })
        }
        Chain::Sol => {
            let pair = match &seed {
                Some(seed) => txforge_sol::KeyPair::from_seed(seed)?,
                None => txforge_sol::KeyPair::generate(),
            };
            json!({
                "keys": pair.keys(),
                "address": pair.address(),
            })
        }
    };
    info!("🔑 Key pair ready");
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn summarize<T: BaseTransaction>(tx: &T) -> CliResult<Value> {
    Ok(json!({
        "id": tx.id(),
        "type": tx.transaction_type().map(|t| t.to_string()),
        "signatures": tx.signature(),
        "data": serde_json::to_value(tx.to_json()?)?,
    }))
}

fn inspect(chain: Chain, network: &str, config: Option<PathBuf>, raw: &str) -> CliResult<String> {
    let summary = match chain {
        Chain::Dot => {
            let network = match config {
                Some(path) => NetworkConfig::load_from_file(&path)?,
                None => network_by_name(network)?,
            };
            debug!(chain = %network.chain_name, "inspecting relay chain transaction");
            summarize(&txforge_dot::Transaction::from_raw(raw, network)?)?
        }
        Chain::Sol => summarize(&txforge_sol::Transaction::from_raw(raw)?)?,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn export_network(name: &str, out: PathBuf) -> CliResult<String> {
    let network = network_by_name(name)?;
    network.save_to_file(&out)?;
    info!("💾 Network '{}' written to {}", name, out.display());
    Ok(out.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen_from_seed_is_deterministic() {
        let seed = hex::encode([7u8; 32]);
        let first = keygen(Chain::Sol, Some(&seed), "testnet").unwrap();
        let second = keygen(Chain::Sol, Some(&seed), "testnet").unwrap();
        assert_eq!(first, second);

        let dot: Value = serde_json::from_str(&keygen(Chain::Dot, Some(&seed), "mainnet").unwrap()).unwrap();
        assert!(dot["address"].as_str().unwrap().starts_with('1'));
    }

    #[test]
    fn test_unknown_network() {
        assert!(keygen(Chain::Dot, None, "kusama-ish").is_err());
    }

    #[test]
    fn test_inspect_relay_chain_stake() {
        let raw = "0x4d02840061b18c6dc02ddcabdeac56cb4f21a971cc41cc97640f6f85b073480008c53a0d002f727310a5a1e2991edd4c51d723f0cdc4c065f7139a678ede2a27147953477490b50b4c5d8110ab38799e1ca1b627bb79014c9fb14c7b7733c24984ef2af90bd5012103000700009f7b0675db59d19b4bd9c8c72eaabba75a9863d02b30115b8b3c3ca5c20f02540b00203d88792d00";
        let out: Value = serde_json::from_str(&inspect(Chain::Dot, "testnet", None, raw).unwrap()).unwrap();
        assert_eq!(out["type"], "StakingActivate");
        assert_eq!(out["data"]["amount"], "50000000000000");
    }
}
