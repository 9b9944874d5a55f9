//! Sample-data registry.
//!
//! Consumes the `vizhub_provide_sample_data` hook. A plugin returns a map
//! of sample keys to data sources. Each datum is either a shorthand
//! (a callable factory or a path-like string) or a full map carrying
//! `data` and `display_name` fields.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use vizhub_core::{AppError, AppResult};

use super::NamespacedStore;
use crate::hooks::caller::ResultCallback;
use crate::hooks::spec::PROVIDE_SAMPLE_DATA;
use crate::values::{DynCallable, PluginValue};

/// Where a sample's data comes from.
#[derive(Debug, Clone)]
pub enum SampleSource {
    /// A callable producing the data on demand.
    Factory(DynCallable),
    /// A path or URI the host opens through its reader machinery.
    Locator(String),
}

/// A validated sample-data registration.
#[derive(Debug, Clone)]
pub struct SampleEntry {
    /// The data source.
    pub data: SampleSource,
    /// Human-readable name shown in menus.
    pub display_name: String,
}

/// Validated, namespaced store of sample-data sources.
#[derive(Debug, Clone, Default)]
pub struct SampleDataRegistry {
    inner: Arc<RwLock<NamespacedStore<SampleEntry>>>,
}

impl SampleDataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result callback that validates and stores raw hook output.
    pub fn result_callback(&self) -> ResultCallback {
        let registry = self.clone();
        Arc::new(move |plugin, value| registry.register_raw(plugin, value))
    }

    /// Validate one plugin's raw hook return value and store what passes.
    ///
    /// The raw value must be a map of sample keys to data sources; anything
    /// else is discarded wholesale with a warning.
    pub fn register_raw(&self, plugin: &str, raw: &PluginValue) {
        let Some(samples) = raw.as_map() else {
            warn!(
                plugin = %plugin,
                hook = PROVIDE_SAMPLE_DATA,
                got = raw.type_name(),
                "Plugin provided sample data that is not a map; it has been ignored"
            );
            return;
        };

        for (key, datum) in samples {
            let Some(entry) = parse_datum(plugin, key, datum) else {
                continue;
            };
            let overwrote = self.inner.write().insert(plugin, key, entry);
            if overwrote {
                warn!(
                    plugin = %plugin,
                    sample = %key,
                    "Plugin has already registered a sample with this key; it has been overwritten"
                );
            }
        }
    }

    /// Get the sample registered by `plugin` under `key`.
    pub fn get(&self, plugin: &str, key: &str) -> AppResult<SampleEntry> {
        self.inner
            .read()
            .get(plugin, key)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Plugin '{plugin}' does not provide a sample named '{key}'"
                ))
            })
    }

    /// All `(plugin, key, display_name)` triples in registration order.
    pub fn available(&self) -> Vec<(String, String, String)> {
        self.inner
            .read()
            .iter()
            .map(|(p, k, entry)| (p.to_string(), k.to_string(), entry.display_name.clone()))
            .collect()
    }

    /// Keys of one plugin's samples in registration order.
    pub fn sample_keys(&self, plugin: &str) -> Vec<String> {
        self.inner
            .read()
            .plugin_items(plugin)
            .map(|items| items.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of registered samples across all plugins.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no samples are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Remove every entry, ahead of a discovery rebuild.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

/// Normalize one sample datum, or discard it with a warning.
///
/// A shorthand datum (callable or string) is coerced into the full form
/// with the sample key as display name.
fn parse_datum(plugin: &str, key: &str, datum: &PluginValue) -> Option<SampleEntry> {
    let (data, display_name) = match datum {
        PluginValue::Map(fields) => {
            let Some(data) = fields.get("data") else {
                warn!(
                    plugin = %plugin,
                    hook = PROVIDE_SAMPLE_DATA,
                    sample = %key,
                    "Sample map is missing the 'data' field; sample ignored"
                );
                return None;
            };
            let Some(display_name) = fields.get("display_name").and_then(|v| v.as_str()) else {
                warn!(
                    plugin = %plugin,
                    hook = PROVIDE_SAMPLE_DATA,
                    sample = %key,
                    "Sample map is missing the 'display_name' field; sample ignored"
                );
                return None;
            };
            (data.clone(), display_name.to_string())
        }
        shorthand => (shorthand.clone(), key.to_string()),
    };

    let source = match data {
        PluginValue::Callable(factory) => SampleSource::Factory(factory),
        PluginValue::Str(locator) => SampleSource::Locator(locator),
        other => {
            warn!(
                plugin = %plugin,
                hook = PROVIDE_SAMPLE_DATA,
                sample = %key,
                got = other.type_name(),
                "Sample data must be a callable or a path string; sample ignored"
            );
            return None;
        }
    };

    Some(SampleEntry {
        data: source,
        display_name,
    })
}
