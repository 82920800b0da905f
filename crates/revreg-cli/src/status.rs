//! # Status Subcommands
//!
//! Node-signed status changes: `revreg change-status` for one key and
//! `revreg change-statuses` for a batch of keys within one list. Batch
//! instructions are written `KEY=true` or `KEY=false`.

use anyhow::{anyhow, Result};
use clap::Args;

use revreg_core::RevocationKeyInstruction;

use crate::connection::ConnectionArgs;
use crate::{KeyPathArgs, ListPathArgs};

#[derive(Args, Debug)]
pub struct ChangeStatusArgs {
    #[command(flatten)]
    pub path: KeyPathArgs,

    /// Target status.
    #[arg(long, action = clap::ArgAction::Set)]
    pub revoked: bool,

    /// Act as a list delegate rather than the owner.
    #[arg(long)]
    pub delegated: bool,
}

#[derive(Args, Debug)]
pub struct ChangeStatusesArgs {
    #[command(flatten)]
    pub path: ListPathArgs,

    /// Instructions as `KEY=true|false`, applied in the order given.
    #[arg(required = true, value_name = "KEY=REVOKED", value_parser = parse_instruction)]
    pub instructions: Vec<RevocationKeyInstruction>,

    /// Act as a list delegate rather than the owner.
    #[arg(long)]
    pub delegated: bool,
}

/// Parse `KEY=true|false` into an instruction. Key shape is checked later
/// by the controller.
pub fn parse_instruction(raw: &str) -> Result<RevocationKeyInstruction> {
    let (key, revoked) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=true|false, got {raw:?}"))?;
    let revoked = match revoked.trim() {
        "true" => true,
        "false" => false,
        other => return Err(anyhow!("expected true or false after '=', got {other:?}")),
    };
    Ok(RevocationKeyInstruction::new(key.trim(), revoked))
}

pub async fn run_change_status(args: &ChangeStatusArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let path = args.path.to_path();
    let tx = if args.delegated {
        controller.change_status_delegated(args.revoked, &path).await?
    } else {
        controller.change_status(args.revoked, &path).await?
    };
    println!("{}", tx.hash);
    Ok(0)
}

pub async fn run_change_statuses(args: &ChangeStatusesArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let path = args.path.to_path();
    let tx = if args.delegated {
        controller
            .change_statuses_in_list_delegated(&path, &args.instructions)
            .await?
    } else {
        controller
            .change_statuses_in_list(&path, &args.instructions)
            .await?
    };
    println!("{}", tx.hash);
    Ok(0)
}
