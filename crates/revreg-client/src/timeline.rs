//! # Event Timeline Resolver
//!
//! Answers "was this key revoked at instant T" from the registry's event
//! log instead of its current state.
//!
//! ## Decision
//!
//! Events after T are discarded and the rest ordered most-recent first
//! (block timestamp, then block number, then log index, all descending).
//!
//! | List events | Key events | Revoked |
//! |-------------|------------|---------|
//! | some | any | latest list event revoked, or latest key event revoked |
//! | none | some | latest key event |
//! | none | none | `false` |
//!
//! A revoked list therefore revokes every key in it, and a key event can
//! revoke a key in an unrevoked list but cannot un-revoke a revoked list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use revreg_core::{Bytes32, KeyLocation};

use crate::contract::{RegistryContract, StatusChangeEvent};
use crate::error::{RegistryError, RpcError};

/// A status change with its block timestamp resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    pub revoked: bool,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub block_number: u64,
    pub log_index: u64,
}

impl TimelineEvent {
    pub fn new(event: &StatusChangeEvent, timestamp: u64) -> Self {
        Self {
            revoked: event.revoked,
            timestamp,
            block_number: event.block_number,
            log_index: event.log_index,
        }
    }

    fn chain_position(&self) -> (u64, u64, u64) {
        (self.timestamp, self.block_number, self.log_index)
    }
}

/// Drop events after `at` (seconds) and order the rest most-recent first.
pub fn events_until(mut events: Vec<TimelineEvent>, at: i64) -> Vec<TimelineEvent> {
    events.retain(|e| i128::from(e.timestamp) <= i128::from(at));
    events.sort_by(|a, b| b.chain_position().cmp(&a.chain_position()));
    events
}

/// Apply the decision table to already filtered and ordered events.
pub fn resolve(list_events: &[TimelineEvent], key_events: &[TimelineEvent]) -> bool {
    let key_revoked = key_events.first().map(|e| e.revoked);
    match list_events.first() {
        Some(list) => list.revoked || key_revoked.unwrap_or(false),
        None => key_revoked.unwrap_or(false),
    }
}

/// Revocation state at `at` (seconds) from unordered event collections.
pub fn revocation_state_at(
    list_events: Vec<TimelineEvent>,
    key_events: Vec<TimelineEvent>,
    at: i64,
) -> bool {
    resolve(&events_until(list_events, at), &events_until(key_events, at))
}

/// Whether `key` was revoked at `at`, reconstructed from the event log.
///
/// Any failure to read events or block timestamps fails the whole query;
/// no partial answer is returned.
pub async fn key_revoked_at<C: RegistryContract>(
    registry: &C,
    key: &KeyLocation,
    at: DateTime<Utc>,
) -> Result<bool, RegistryError> {
    let list = key.list_location();
    let (list_events, key_events) = futures::try_join!(
        registry.list_status_events(&list),
        registry.revocation_status_events(key),
    )
    .map_err(|source| RegistryError::Fetch { source })?;

    let (list_events, key_events) = futures::try_join!(
        with_timestamps(registry, &list_events),
        with_timestamps(registry, &key_events),
    )
    .map_err(|source| RegistryError::Fetch { source })?;

    let at_secs = at.timestamp();
    let revoked = revocation_state_at(list_events, key_events, at_secs);
    tracing::debug!(
        namespace = %key.namespace,
        list = %key.list,
        key = %key.key,
        at = at_secs,
        revoked,
        "resolved historical revocation state"
    );
    Ok(revoked)
}

/// Resolve the block timestamp of every event, one lookup per distinct
/// block.
async fn with_timestamps<C: RegistryContract>(
    registry: &C,
    events: &[StatusChangeEvent],
) -> Result<Vec<TimelineEvent>, RpcError> {
    let mut blocks: Vec<Bytes32> = events.iter().map(|e| e.block_hash).collect();
    blocks.sort();
    blocks.dedup();

    let timestamps = try_join_all(blocks.iter().map(|hash| registry.block_timestamp(hash))).await?;
    let by_block: HashMap<Bytes32, u64> = blocks.into_iter().zip(timestamps).collect();

    events
        .iter()
        .map(|e| {
            by_block
                .get(&e.block_hash)
                .map(|ts| TimelineEvent::new(e, *ts))
                .ok_or_else(|| RpcError::malformed("eth_getBlockByHash", "missing block timestamp"))
        })
        .collect()
}
