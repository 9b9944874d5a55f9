//! Dock-widget registry.
//!
//! Consumes the `vizhub_provide_dock_widget` hook. A plugin may return a
//! single widget factory, a `[factory]` / `[factory, options]` grouping, or
//! a list of either. Accepted factories are stored per plugin under a
//! human-readable widget name.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use vizhub_core::{AppError, AppResult};

use super::NamespacedStore;
use crate::hooks::caller::ResultCallback;
use crate::hooks::spec::PROVIDE_DOCK_WIDGET;
use crate::names::camel_to_spaces;
use crate::values::{DynCallable, PluginValue};

/// Keyword options accompanying a widget factory (e.g. `name`, `area`).
pub type WidgetOptions = std::collections::BTreeMap<String, PluginValue>;

/// A validated dock-widget registration.
#[derive(Debug, Clone)]
pub struct DockWidgetEntry {
    /// Factory producing the widget when the host instantiates it.
    pub factory: DynCallable,
    /// Keyword options to pass alongside the factory.
    pub options: WidgetOptions,
}

/// Validated, namespaced store of dock-widget factories.
///
/// Cloning produces another handle onto the same store, so the result
/// callback handed to historic dispatch and the query side share state.
#[derive(Debug, Clone, Default)]
pub struct DockWidgetRegistry {
    inner: Arc<RwLock<NamespacedStore<DockWidgetEntry>>>,
}

impl DockWidgetRegistry {
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
    pub fn register_raw(&self, plugin: &str, raw: &PluginValue) {
        for item in split_items(raw) {
            let Some((factory, options)) = parse_item(plugin, item) else {
                continue;
            };

            let name = options
                .get("name")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| camel_to_spaces(factory.name()));

            let overwrote = self.inner.write().insert(plugin, &name, DockWidgetEntry {
                factory,
                options,
            });
            if overwrote {
                warn!(
                    plugin = %plugin,
                    widget = %name,
                    "Plugin has already registered a dock widget with this name; it has been overwritten"
                );
            }
        }
    }

    /// Get widget `widget_name` provided by plugin `plugin`.
    ///
    /// With `widget_name` omitted the plugin's only widget is returned;
    /// a plugin providing several widgets requires the name.
    pub fn get(&self, plugin: &str, widget_name: Option<&str>) -> AppResult<DockWidgetEntry> {
        let store = self.inner.read();
        let Some(items) = store.plugin_items(plugin).filter(|items| !items.is_empty()) else {
            return Err(AppError::not_found(format!(
                "Plugin '{plugin}' does not provide any dock widgets"
            )));
        };

        match widget_name {
            None if items.len() > 1 => {
                let names: Vec<&str> = items.iter().map(|(n, _)| n.as_str()).collect();
                Err(AppError::ambiguous(format!(
                    "Plugin '{plugin}' provides more than one dock widget; \
                     specify a widget name from {names:?}"
                )))
            }
            None => Ok(items[0].1.clone()),
            Some(name) => items
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, entry)| entry.clone())
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Plugin '{plugin}' does not provide a dock widget named '{name}'"
                    ))
                }),
        }
    }

    /// Names of one plugin's widgets in registration order.
    pub fn widget_names(&self, plugin: &str) -> Vec<String> {
        self.inner
            .read()
            .plugin_items(plugin)
            .map(|items| items.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    /// All `(plugin, widget_name)` pairs in registration order.
    pub fn all(&self) -> Vec<(String, String)> {
        self.inner
            .read()
            .iter()
            .map(|(p, n, _)| (p.to_string(), n.to_string()))
            .collect()
    }

    /// Number of registered widgets across all plugins.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no widgets are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Remove every entry, ahead of a discovery rebuild.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

/// Break a raw return value into individual widget items.
///
/// A top-level list is a sequence of items unless it is itself a single
/// `[factory]` / `[factory, options]` grouping.
fn split_items(raw: &PluginValue) -> Vec<&PluginValue> {
    match raw {
        PluginValue::List(items) if !is_grouping(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn is_grouping(items: &[PluginValue]) -> bool {
    matches!(
        items,
        [PluginValue::Callable(_)] | [PluginValue::Callable(_), PluginValue::Map(_)]
    )
}

/// Narrow one item to `(factory, options)`, or discard it with a warning.
fn parse_item(plugin: &str, item: &PluginValue) -> Option<(DynCallable, WidgetOptions)> {
    match item {
        PluginValue::Callable(factory) => Some((factory.clone(), WidgetOptions::new())),
        PluginValue::List(group) => {
            if group.is_empty() {
                warn!(
                    plugin = %plugin,
                    hook = PROVIDE_DOCK_WIDGET,
                    "Plugin provided an empty grouping; skipping"
                );
                return None;
            }

            let Some(factory) = group[0].as_callable() else {
                warn!(
                    plugin = %plugin,
                    hook = PROVIDE_DOCK_WIDGET,
                    got = group[0].type_name(),
                    "Plugin provided a non-callable widget factory; widget ignored"
                );
                return None;
            };

            let options = match group.get(1) {
                None => WidgetOptions::new(),
                Some(PluginValue::Map(map)) => map.clone(),
                Some(other) => {
                    warn!(
                        plugin = %plugin,
                        hook = PROVIDE_DOCK_WIDGET,
                        factory = %factory.name(),
                        got = other.type_name(),
                        "Plugin provided invalid widget options; widget ignored"
                    );
                    return None;
                }
            };

            Some((factory.clone(), options))
        }
        other => {
            warn!(
                plugin = %plugin,
                hook = PROVIDE_DOCK_WIDGET,
                got = other.type_name(),
                "Plugin provided a non-callable object; widget ignored"
            );
            None
        }
    }
}
