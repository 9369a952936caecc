//! Persisted user preferences behind an injected key-value store.
//!
//! The store holds opaque strings; snapshots are kept verbatim as JSON. A
//! value that no longer parses is ignored and the defaults are used instead.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;
use crate::snapshot::{ArbitrageInputs, TransferInputs};

pub const TRANSFER_INPUTS_KEY: &str = "rub-krw-calc:inputs";
pub const ARBITRAGE_INPUTS_KEY: &str = "arbitrage-calc:inputs";
pub const THEME_KEY: &str = "rub-krw-calc:theme";
pub const PRESETS_KEY: &str = "rub-krw-calc:presets";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local store, mostly for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        guard.remove(key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

type Presets = BTreeMap<String, TransferInputs>;

pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_transfer_inputs(&self) -> TransferInputs {
        self.load_or_default(TRANSFER_INPUTS_KEY)
    }

    pub fn save_transfer_inputs(&self, inputs: &TransferInputs) -> Result<(), StorageError> {
        self.save(TRANSFER_INPUTS_KEY, inputs)
    }

    pub fn load_arbitrage_inputs(&self) -> ArbitrageInputs {
        self.load_or_default(ARBITRAGE_INPUTS_KEY)
    }

    pub fn save_arbitrage_inputs(&self, inputs: &ArbitrageInputs) -> Result<(), StorageError> {
        self.save(ARBITRAGE_INPUTS_KEY, inputs)
    }

    /// Only an exact `"dark"` selects the dark theme.
    pub fn theme(&self) -> Theme {
        match self.store.get(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set(THEME_KEY, theme.as_str().to_string());
    }

    pub fn save_preset(&self, name: &str, inputs: &TransferInputs) -> Result<(), StorageError> {
        if name.trim().is_empty() {
            return Err(StorageError::EmptyPresetName);
        }
        let mut presets = self.presets();
        presets.insert(name.to_string(), inputs.clone());
        self.save(PRESETS_KEY, &presets)
    }

    pub fn load_preset(&self, name: &str) -> Option<TransferInputs> {
        self.presets().remove(name)
    }

    pub fn delete_preset(&self, name: &str) -> Result<bool, StorageError> {
        let mut presets = self.presets();
        let removed = presets.remove(name).is_some();
        if removed && presets.is_empty() {
            self.store.remove(PRESETS_KEY);
        } else if removed {
            self.save(PRESETS_KEY, &presets)?;
        }
        Ok(removed)
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets().into_keys().collect()
    }

    fn presets(&self) -> Presets {
        self.load_or_default(PRESETS_KEY)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.store.get(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("failed to parse saved {}: {}", key, e);
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences<MemoryStore> {
        Preferences::new(MemoryStore::default())
    }

    #[test]
    fn missing_inputs_load_defaults() {
        let p = prefs();
        assert_eq!(p.load_transfer_inputs(), TransferInputs::default());
        assert_eq!(p.load_arbitrage_inputs(), ArbitrageInputs::default());
    }

    #[test]
    fn inputs_round_trip_through_store() {
        let p = prefs();
        let inputs = TransferInputs {
            rub: 100_000.0,
            apply_ozon: false,
            ..TransferInputs::default()
        };
        p.save_transfer_inputs(&inputs).unwrap();
        assert_eq!(p.load_transfer_inputs(), inputs);
        assert!(p.store().get(TRANSFER_INPUTS_KEY).unwrap().contains("\"applyOzon\":false"));
    }

    #[test]
    fn malformed_inputs_fall_back_to_defaults() {
        let p = prefs();
        p.store().set(TRANSFER_INPUTS_KEY, "{not json".to_string());
        assert_eq!(p.load_transfer_inputs(), TransferInputs::default());
    }

    #[test]
    fn partial_inputs_read_missing_fields_as_zero() {
        let p = prefs();
        p.store().set(ARBITRAGE_INPUTS_KEY, r#"{"initialRub": 5000}"#.to_string());
        let inputs = p.load_arbitrage_inputs();
        assert_eq!(inputs.initial_rub, 5000.0);
        assert_eq!(inputs.rub_to_usdt_rate, 0.0);
        assert_eq!(inputs.evaluate().final_amount, 0.0);
    }

    #[test]
    fn theme_defaults_to_light() {
        let p = prefs();
        assert_eq!(p.theme(), Theme::Light);
        p.set_theme(Theme::Dark);
        assert_eq!(p.theme(), Theme::Dark);
        assert_eq!(p.store().get(THEME_KEY).as_deref(), Some("dark"));
        p.store().set(THEME_KEY, "purple".to_string());
        assert_eq!(p.theme(), Theme::Light);
    }

    #[test]
    fn presets_are_named_snapshots() {
        let p = prefs();
        let cheap = TransferInputs {
            rub: 10_000.0,
            ..TransferInputs::default()
        };
        p.save_preset("weekly", &TransferInputs::default()).unwrap();
        p.save_preset("cheap", &cheap).unwrap();

        assert_eq!(p.preset_names(), ["cheap", "weekly"]);
        assert_eq!(p.load_preset("cheap"), Some(cheap));
        assert_eq!(p.load_preset("missing"), None);

        assert!(p.delete_preset("cheap").unwrap());
        assert!(!p.delete_preset("cheap").unwrap());
        assert_eq!(p.preset_names(), ["weekly"]);
    }

    #[test]
    fn deleting_last_preset_clears_the_key() {
        let p = prefs();
        p.save_preset("only", &TransferInputs::default()).unwrap();
        assert!(p.store().get(PRESETS_KEY).is_some());

        assert!(p.delete_preset("only").unwrap());
        assert_eq!(p.store().get(PRESETS_KEY), None);
        assert!(p.preset_names().is_empty());
    }

    #[test]
    fn blank_preset_name_is_rejected() {
        let p = prefs();
        let err = p.save_preset("   ", &TransferInputs::default()).unwrap_err();
        assert!(matches!(err, StorageError::EmptyPresetName));
        assert!(p.preset_names().is_empty());
    }

    #[test]
    fn corrupt_presets_read_as_empty() {
        let p = prefs();
        p.store().set(PRESETS_KEY, "[1,2,3]".to_string());
        assert!(p.preset_names().is_empty());
        p.save_preset("fresh", &TransferInputs::default()).unwrap();
        assert_eq!(p.preset_names(), ["fresh"]);
    }
}
