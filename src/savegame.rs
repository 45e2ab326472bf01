//! Mid-level save snapshots
//!
//! The whole `LevelState` is serde-serializable, so a save is a versioned
//! JSON envelope around it, persisted to LocalStorage on web. Derived data
//! (the static collider list) is skipped on save and rebuilt on load.

use serde::{Deserialize, Serialize};

use crate::sim::LevelState;

const VERSION: u32 = 1;

/// Versioned save envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub state: LevelState,
}

impl Snapshot {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "polarity_twins_save";

    pub fn capture(state: &LevelState) -> Self {
        Self {
            version: VERSION,
            state: state.clone(),
        }
    }

    /// Unwrap the envelope, rejecting snapshots from other save versions.
    /// Rebuilds the collider list the serializer skipped.
    pub fn into_state(self) -> Option<LevelState> {
        if self.version != VERSION {
            log::warn!(
                "ignoring save with version {} (expected {})",
                self.version,
                VERSION
            );
            return None;
        }
        let mut state = self.state;
        state.rebuild_solids();
        Some(state)
    }

    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("failed to serialize save: {e}");
                None
            }
        }
    }

    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("discarding corrupt save: {e}");
                None
            }
        }
    }

    /// Persist to LocalStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Some(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Game saved (level {})", self.state.level);
            }
        }
    }

    /// Load the stored snapshot, if any (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(Self::STORAGE_KEY).ok()??;
        Self::from_json(&json)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn clear() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(Self::STORAGE_KEY);
            log::info!("Saved game cleared");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Option<Self> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear() {}
}
