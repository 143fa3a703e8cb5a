use std::collections::BTreeMap;
use std::fmt::Display;

use archive_logging::{archive_debug, archive_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ChannelId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: ChannelId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    pub canonical_url: String,
    #[serde(default)]
    pub legacy_url_alternatives: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub description: String,
}

/// Host-owned state blob. Serialized as `{"channelCache": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub channel_cache: BTreeMap<ChannelId, ChannelRecord>,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed channel state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Session cache of resolved channels. Entries never expire; an entry is only
/// replaced by another successful fetch, and a failed fetch stores nothing.
#[derive(Debug, Clone, Default)]
pub struct ChannelDirectory {
    channels: BTreeMap<ChannelId, ChannelRecord>,
}

impl ChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: PersistedState) -> Self {
        Self {
            channels: state.channel_cache,
        }
    }

    pub fn restore(saved: &str) -> Result<Self, StateError> {
        let state: PersistedState = serde_json::from_str(saved)?;
        archive_debug!("Restored {} cached channels", state.channel_cache.len());
        Ok(Self::from_state(state))
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            channel_cache: self.channels.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn lookup(&self, id: &ChannelId) -> Option<&ChannelRecord> {
        self.channels.get(id)
    }

    /// Returns the cached record, or runs `fetch` once and caches its result.
    pub fn resolve<F, E>(&mut self, id: &ChannelId, fetch: F) -> Result<&ChannelRecord, E>
    where
        F: FnOnce(&ChannelId) -> Result<ChannelRecord, E>,
        E: Display,
    {
        if !self.channels.contains_key(id) {
            let record = fetch(id).inspect_err(|err| {
                archive_warn!("Failed to resolve channel {}: {}", id, err);
            })?;
            archive_debug!("Caching channel {} as {:?}", id, record.display_name);
            self.channels.insert(id.clone(), record);
        }
        Ok(&self.channels[id])
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
