//! # List Administration Subcommands
//!
//! Ownership transfer and delegate management for a revocation list.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use crate::connection::ConnectionArgs;
use crate::ListPathArgs;

#[derive(Args, Debug)]
pub struct ChangeListOwnerArgs {
    #[command(flatten)]
    pub path: ListPathArgs,

    /// Address of the new owner.
    pub new_owner: String,
}

#[derive(Args, Debug)]
pub struct AddListDelegateArgs {
    #[command(flatten)]
    pub path: ListPathArgs,

    /// Address of the delegate.
    pub delegate: String,

    /// When the delegation ends (RFC 3339). Must lie in the future.
    #[arg(long)]
    pub expiry: DateTime<Utc>,
}

#[derive(Args, Debug)]
pub struct RemoveListDelegateArgs {
    #[command(flatten)]
    pub path: ListPathArgs,

    /// Address of the delegate.
    pub delegate: String,
}

pub async fn run_change_list_owner(args: &ChangeListOwnerArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let tx = controller
        .change_list_owner(&args.path.to_path(), &args.new_owner)
        .await?;
    println!("{}", tx.hash);
    Ok(0)
}

pub async fn run_add_list_delegate(args: &AddListDelegateArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let tx = controller
        .add_list_delegate(&args.path.to_path(), &args.delegate, args.expiry)
        .await?;
    println!("{}", tx.hash);
    Ok(0)
}

pub async fn run_remove_list_delegate(
    args: &RemoveListDelegateArgs,
    conn: &ConnectionArgs,
) -> Result<u8> {
    let controller = conn.controller()?;
    let tx = controller
        .remove_list_delegate(&args.path.to_path(), &args.delegate)
        .await?;
    println!("{}", tx.hash);
    Ok(0)
}
