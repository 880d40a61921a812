// Persisted slices: the subset of store state written to storage

use crate::storage::Storage;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Core trait that any persisted slice of state must implement
pub trait Slice: Serialize + DeserializeOwned + Default {
    /// Storage key this slice is written under (e.g., "todo-storage")
    fn storage_key() -> &'static str;

    /// Schema version stamped into the envelope
    fn version() -> u32 {
        0
    }
}

/// On-storage wrapper around a slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    pub version: u32,
}

/// Serialize a slice into its envelope form
pub fn encode<T: Slice>(slice: &T) -> Result<String> {
    let envelope = Envelope {
        state: slice,
        version: T::version(),
    };
    serde_json::to_string(&envelope).context("Failed to serialize slice")
}

/// Write a slice to storage, replacing any previous value
pub fn save<T: Slice, S: Storage + ?Sized>(storage: &mut S, slice: &T) -> Result<()> {
    let json = encode(slice)?;
    storage.set_item(T::storage_key(), &json)?;
    debug!(key = T::storage_key(), bytes = json.len(), "Persisted slice");
    Ok(())
}

/// Read a slice back from storage
///
/// A missing key yields `None`. A value that fails to parse, or carries a different
/// version, is logged and also yields `None` so the caller falls back to defaults.
pub fn load<T: Slice, S: Storage + ?Sized>(storage: &S) -> Result<Option<T>> {
    let key = T::storage_key();
    let raw = match storage.get_item(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let envelope: Envelope<T> = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(key, error = ?e, "Failed to parse persisted slice, using defaults");
            return Ok(None);
        }
    };

    if envelope.version != T::version() {
        warn!(
            key,
            found = envelope.version,
            expected = T::version(),
            "Persisted slice version mismatch, using defaults"
        );
        return Ok(None);
    }

    Ok(Some(envelope.state))
}

/// Load a slice or fall back to its default state
pub fn load_or_default<T: Slice, S: Storage + ?Sized>(storage: &S) -> Result<T> {
    Ok(load(storage)?.unwrap_or_default())
}
