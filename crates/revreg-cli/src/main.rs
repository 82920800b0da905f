//! # revreg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use revreg_cli::connection::ConnectionArgs;
use revreg_cli::list::{
    run_add_list_delegate, run_change_list_owner, run_remove_list_delegate, AddListDelegateArgs,
    ChangeListOwnerArgs, RemoveListDelegateArgs,
};
use revreg_cli::query::{run_is_revoked, IsRevokedArgs};
use revreg_cli::signed::{
    run_sign_change_status, run_submit_signed, SignChangeStatusArgs, SubmitSignedArgs,
};
use revreg_cli::status::{
    run_change_status, run_change_statuses, ChangeStatusArgs, ChangeStatusesArgs,
};

/// Revocation registry controller
///
/// Queries and manages revocation lists and keys on an EIP-5539 revocation
/// registry through an Ethereum JSON-RPC node.
#[derive(Parser, Debug)]
#[command(name = "revreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Whether a key is revoked, now or at a point in time.
    IsRevoked(IsRevokedArgs),

    /// Revoke or un-revoke one key.
    ChangeStatus(ChangeStatusArgs),

    /// Revoke or un-revoke several keys of one list in one transaction.
    ChangeStatuses(ChangeStatusesArgs),

    /// Produce a signed status change that anyone can relay.
    SignChangeStatus(SignChangeStatusArgs),

    /// Relay a signed status change.
    SubmitSigned(SubmitSignedArgs),

    /// Transfer ownership of a list.
    ChangeListOwner(ChangeListOwnerArgs),

    /// Authorize a delegate on a list until an expiry.
    AddListDelegate(AddListDelegateArgs),

    /// Revoke a delegate's authorization on a list.
    RemoveListDelegate(RemoveListDelegateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("revreg CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let conn = &cli.connection;
    let result = match &cli.command {
        Commands::IsRevoked(args) => run_is_revoked(args, conn).await,
        Commands::ChangeStatus(args) => run_change_status(args, conn).await,
        Commands::ChangeStatuses(args) => run_change_statuses(args, conn).await,
        Commands::SignChangeStatus(args) => run_sign_change_status(args, conn).await,
        Commands::SubmitSigned(args) => run_submit_signed(args, conn).await,
        Commands::ChangeListOwner(args) => run_change_list_owner(args, conn).await,
        Commands::AddListDelegate(args) => run_add_list_delegate(args, conn).await,
        Commands::RemoveListDelegate(args) => run_remove_list_delegate(args, conn).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
