//! # Signed-Operation Subcommands
//!
//! `revreg sign-change-status` asks the node to sign a status change and
//! prints the payload as JSON (or writes it to `--out`). Anyone can later
//! relay it with `revreg submit-signed`, which reads the JSON from a file or
//! from standard input (`-`).
//!
//! The payload is bound to the signer's current nonce, so it can be
//! submitted once.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use revreg_core::SignedOperation;

use crate::connection::ConnectionArgs;
use crate::KeyPathArgs;

#[derive(Args, Debug)]
pub struct SignChangeStatusArgs {
    #[command(flatten)]
    pub path: KeyPathArgs,

    /// Target status.
    #[arg(long, action = clap::ArgAction::Set)]
    pub revoked: bool,

    /// Sign as a list delegate rather than the owner.
    #[arg(long)]
    pub delegated: bool,

    /// Write the payload to this file instead of standard output.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SubmitSignedArgs {
    /// Signed payload JSON file, or `-` for standard input.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Relay to the delegate entry point.
    #[arg(long)]
    pub delegated: bool,
}

pub async fn run_sign_change_status(args: &SignChangeStatusArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let path = args.path.to_path();
    let op = if args.delegated {
        controller
            .generate_change_status_delegated_signed_payload(args.revoked, &path)
            .await?
    } else {
        controller
            .generate_change_status_signed_payload(args.revoked, &path)
            .await?
    };
    write_operation(&op, args.out.as_deref())?;
    Ok(0)
}

pub async fn run_submit_signed(args: &SubmitSignedArgs, conn: &ConnectionArgs) -> Result<u8> {
    let op = read_operation(&args.file)?;
    let controller = conn.controller()?;
    let tx = if args.delegated {
        controller.change_status_delegated_signed(&op).await?
    } else {
        controller.change_status_signed(&op).await?
    };
    println!("{}", tx.hash);
    Ok(0)
}

fn write_operation(op: &SignedOperation, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(op).context("failed to serialize signed payload")?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "signed payload written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_operation(path: &Path) -> Result<SignedOperation> {
    let raw = crate::read_input(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a signed payload", path.display()))
}
