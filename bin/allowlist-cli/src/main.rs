//! allowlist: off-line tooling for allowlisted sales.
//!
//! Compiles `(address, allocation)` lists into a commitment root, issues
//! membership proofs for distribution to buyers and validates sale configs
//! before deployment.

#![allow(missing_docs, rustdoc::missing_crate_level_docs)]

use alloy_primitives::{Address, B256, U256};
use clap::{Args, Parser, Subcommand};
use eyre::{bail, ensure, WrapErr};
use sale_allowlist::{source, AllowlistEntry, AllowlistTree, Proof, ProofBundle};
use sale_engine::SaleConfig;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "allowlist", version, about = "Allowlist sale tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the commitment root of an allowlist file
    Root(SourceArgs),
    /// Print the entry and proof of one address as JSON
    Proof {
        #[command(flatten)]
        source: SourceArgs,
        /// Address to prove
        #[arg(long)]
        address: Address,
    },
    /// Check one proof against a root
    Verify {
        /// Commitment root
        #[arg(long)]
        root: B256,
        /// Claimed address
        #[arg(long)]
        address: Address,
        /// Claimed allocation
        #[arg(long)]
        allocation: U256,
        /// Comma separated sibling hashes, leaf side first
        #[arg(long, value_delimiter = ',')]
        proof: Vec<B256>,
    },
    /// Write a proof bundle for every entry
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Re-check every proof of an exported bundle
    CheckBundle {
        /// Bundle JSON file
        bundle: PathBuf,
        /// Root the bundle must match
        #[arg(long)]
        root: Option<B256>,
    },
    /// Validate a sale config file, or `SALE_*` variables when no file is given
    Config {
        /// TOML or JSON config file
        file: Option<PathBuf>,
        /// Allowlist file whose root must match `allowlistRoot`
        #[arg(long)]
        allowlist: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Allowlist file: JSON array, or `address,allocation` lines
    file: PathBuf,
}

impl SourceArgs {
    fn compile(&self) -> eyre::Result<AllowlistTree> {
        compile(&self.file)
    }
}

fn compile(path: &Path) -> eyre::Result<AllowlistTree> {
    let entries = source::load(path)
        .wrap_err_with(|| format!("failed to read allowlist {}", path.display()))?;
    let tree = AllowlistTree::build(entries)?;
    info!(entries = tree.len(), depth = tree.depth(), root = %tree.root(), "allowlist compiled");
    Ok(tree)
}

fn proof_json(tree: &AllowlistTree, address: Address) -> eyre::Result<String> {
    let (entry, proof) = tree.proof_for_address(address)?;
    let output = serde_json::json!({
        "root": tree.root(),
        "address": entry.address,
        "allocation": entry.allocation,
        "leaf": entry.leaf(),
        "proof": proof,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn check_bundle(bundle: &ProofBundle, root: Option<B256>) -> eyre::Result<()> {
    if let Some(root) = root {
        ensure!(
            bundle.root == root,
            "bundle root {} does not match expected {root}",
            bundle.root
        );
    }
    if let Some(entry) = bundle.first_invalid() {
        bail!("proof for {} does not verify against {}", entry.address, bundle.root);
    }
    Ok(())
}

fn load_config(file: Option<&Path>) -> eyre::Result<SaleConfig> {
    let Some(path) = file else {
        return SaleConfig::from_env().wrap_err("invalid SALE_* environment");
    };
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        SaleConfig::from_json(&raw)?
    } else {
        SaleConfig::from_toml_str(&raw)?
    };
    Ok(config)
}

fn run(cli: Cli) -> eyre::Result<()> {
    match cli.command {
        Command::Root(source) => {
            println!("{}", source.compile()?.root());
        }
        Command::Proof { source, address } => {
            println!("{}", proof_json(&source.compile()?, address)?);
        }
        Command::Verify {
            root,
            address,
            allocation,
            proof,
        } => {
            let entry = AllowlistEntry::new(address, allocation);
            let proof = Proof::from(proof);
            debug!(%entry, siblings = proof.len(), "verifying proof");
            ensure!(proof.verify(entry.leaf(), root), "proof does not verify against {root}");
            println!("valid");
        }
        Command::Export { source, out } => {
            let bundle = ProofBundle::from_tree(&source.compile()?);
            let json = bundle.to_json_pretty()?;
            match out {
                Some(path) => {
                    fs::write(&path, json)
                        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), entries = bundle.entries.len(), "bundle written");
                }
                None => println!("{json}"),
            }
        }
        Command::CheckBundle { bundle, root } => {
            let raw = fs::read_to_string(&bundle)
                .wrap_err_with(|| format!("failed to read bundle {}", bundle.display()))?;
            let bundle = ProofBundle::from_json(&raw)?;
            check_bundle(&bundle, root)?;
            println!("{} entries valid under {}", bundle.entries.len(), bundle.root);
        }
        Command::Config { file, allowlist } => {
            let config = load_config(file.as_deref())?;
            if let Some(path) = allowlist {
                let root = compile(&path)?.root();
                ensure!(
                    config.allowlist_root == root,
                    "allowlistRoot {} does not match {} compiled from {}",
                    config.allowlist_root,
                    root,
                    path.display()
                );
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> eyre::Result<()> {
    init_tracing();
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIST: &str = "\
# buyers
0x00000000000000000000000000000000000000a1,2
0x00000000000000000000000000000000000000b1,1
0x00000000000000000000000000000000000000c1,5
";

    fn list_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(LIST.as_bytes()).unwrap();
        file
    }

    #[test]
    fn cli_parses_verify_proof_list() {
        let proof = format!("{},{}", B256::with_last_byte(2), B256::with_last_byte(3));
        let cli = Cli::try_parse_from([
            "allowlist",
            "verify",
            "--root",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--address",
            "0x00000000000000000000000000000000000000a1",
            "--allocation",
            "2",
            "--proof",
            proof.as_str(),
        ])
        .unwrap();
        match cli.command {
            Command::Verify { proof, allocation, .. } => {
                assert_eq!(proof.len(), 2);
                assert_eq!(allocation, U256::from(2u64));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn proof_json_verifies() {
        let file = list_file();
        let tree = compile(file.path()).unwrap();
        let address: Address = "0x00000000000000000000000000000000000000c1".parse().unwrap();

        let raw = proof_json(&tree, address).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let proof: Proof = serde_json::from_value(json["proof"].clone()).unwrap();
        let root: B256 = serde_json::from_value(json["root"].clone()).unwrap();
        let entry = AllowlistEntry::new(address, U256::from(5u64));
        assert!(proof.verify(entry.leaf(), root));
    }

    #[test]
    fn exported_bundle_passes_check() {
        let tree = compile(list_file().path()).unwrap();
        let bundle = ProofBundle::from_tree(&tree);
        check_bundle(&bundle, Some(tree.root())).unwrap();
        assert!(check_bundle(&bundle, Some(B256::ZERO)).is_err());
    }

    #[test]
    fn config_file_is_validated() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"owner = \"0x00000000000000000000000000000000000000a0\"\n")
            .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_supply, U256::from(1000u64));

        let mut zero = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        zero.write_all(br#"{"owner": "0x0000000000000000000000000000000000000000"}"#)
            .unwrap();
        assert!(load_config(Some(zero.path())).is_err());
    }
}
