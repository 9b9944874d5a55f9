//! Typed capability registries built on historic hook dispatch.
//!
//! Each registry is a pure result-callback consumer: it receives one raw
//! `(plugin, value)` pair per dispatched implementation, validates and
//! normalizes the untrusted value, and stores accepted items keyed by plugin
//! name and item name. Malformed items are discarded with a warning naming
//! the offending plugin and hook; a single bad plugin must never block the
//! rest of discovery.

pub mod dock_widget;
pub mod function_widget;
pub mod sample_data;

pub use dock_widget::{DockWidgetEntry, DockWidgetRegistry, WidgetOptions};
pub use function_widget::FunctionWidgetRegistry;
pub use sample_data::{SampleDataRegistry, SampleEntry, SampleSource};

/// Two-level insertion-ordered store keyed by plugin name, then item name.
///
/// Iteration order is registration order, which keeps menu listings stable
/// across repeated queries. Item names are unique within a plugin; inserting
/// under an existing name replaces the entry (plugin hot-reload support).
#[derive(Debug, Clone)]
pub(crate) struct NamespacedStore<T> {
    buckets: Vec<(String, Vec<(String, T)>)>,
}

impl<T> Default for NamespacedStore<T> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<T> NamespacedStore<T> {
    /// Insert an entry. Returns `true` if an entry with the same plugin and
    /// name was overwritten.
    pub fn insert(&mut self, plugin: &str, name: &str, entry: T) -> bool {
        let idx = match self.buckets.iter().position(|(p, _)| p == plugin) {
            Some(idx) => idx,
            None => {
                self.buckets.push((plugin.to_string(), Vec::new()));
                self.buckets.len() - 1
            }
        };
        let bucket = &mut self.buckets[idx].1;

        match bucket.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = entry;
                true
            }
            None => {
                bucket.push((name.to_string(), entry));
                false
            }
        }
    }

    /// All of one plugin's items in registration order.
    pub fn plugin_items(&self, plugin: &str) -> Option<&[(String, T)]> {
        self.buckets
            .iter()
            .find(|(p, _)| p == plugin)
            .map(|(_, items)| items.as_slice())
    }

    /// Get a single entry.
    pub fn get(&self, plugin: &str, name: &str) -> Option<&T> {
        self.plugin_items(plugin)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    /// Iterate every entry in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &T)> {
        self.buckets.iter().flat_map(|(plugin, items)| {
            items
                .iter()
                .map(move |(name, entry)| (plugin.as_str(), name.as_str(), entry))
        })
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, items)| items.len()).sum()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
