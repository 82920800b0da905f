//! # Query Subcommand
//!
//! `revreg is-revoked` prints `true` or `false`. With `--at` the answer is
//! reconstructed from the registry's events as of that instant; otherwise the
//! contract is asked directly at `--block` (default `latest`).

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use revreg_client::IsRevokedOptions;
use revreg_core::BlockTag;

use crate::connection::ConnectionArgs;
use crate::KeyPathArgs;

#[derive(Args, Debug)]
pub struct IsRevokedArgs {
    #[command(flatten)]
    pub path: KeyPathArgs,

    /// Point in time (RFC 3339), e.g. `2024-05-01T12:00:00Z`. Takes precedence over --block.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Block tag or number for a live query.
    #[arg(long)]
    pub block: Option<BlockTag>,
}

impl IsRevokedArgs {
    pub fn options(&self) -> IsRevokedOptions {
        IsRevokedOptions {
            timestamp: self.at,
            block_tag: self.block,
        }
    }
}

pub async fn run_is_revoked(args: &IsRevokedArgs, conn: &ConnectionArgs) -> Result<u8> {
    let controller = conn.controller()?;
    let revoked = controller
        .is_revoked(&args.path.to_path(), args.options())
        .await?;
    println!("{revoked}");
    Ok(0)
}
