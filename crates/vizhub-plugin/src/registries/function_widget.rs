//! Function-widget registry.
//!
//! Consumes the `vizhub_provide_function` hook. A plugin returns a single
//! function or a list of functions; each is wrapped into a widget by the
//! host at instantiation time. Names are derived from the function
//! identifier unless the registries are told otherwise.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use vizhub_core::{AppError, AppResult};

use super::NamespacedStore;
use crate::hooks::caller::ResultCallback;
use crate::hooks::spec::PROVIDE_FUNCTION;
use crate::names::snake_to_spaces;
use crate::values::{DynCallable, PluginValue};

/// Validated, namespaced store of widget-wrappable functions.
///
/// Clone handles share state, like [`DockWidgetRegistry`](super::DockWidgetRegistry).
#[derive(Debug, Clone, Default)]
pub struct FunctionWidgetRegistry {
    inner: Arc<RwLock<NamespacedStore<DynCallable>>>,
}

impl FunctionWidgetRegistry {
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
        let items: Vec<&PluginValue> = match raw {
            PluginValue::List(items) => items.iter().collect(),
            other => vec![other],
        };

        for item in items {
            let Some(func) = item.as_callable() else {
                if item.as_list().is_some() {
                    warn!(
                        plugin = %plugin,
                        hook = PROVIDE_FUNCTION,
                        "Plugin provided a nested grouping; \
                         provide multiple function widgets as a flat list"
                    );
                } else {
                    warn!(
                        plugin = %plugin,
                        hook = PROVIDE_FUNCTION,
                        got = item.type_name(),
                        "Plugin provided a non-callable function item; it has been ignored"
                    );
                }
                continue;
            };

            let name = snake_to_spaces(func.name());
            let overwrote = self.inner.write().insert(plugin, &name, func.clone());
            if overwrote {
                warn!(
                    plugin = %plugin,
                    function = %name,
                    "Plugin has already registered a function with this name; it has been overwritten"
                );
            }
        }
    }

    /// Get function `function_name` provided by plugin `plugin`.
    ///
    /// With `function_name` omitted the plugin's only function is returned.
    pub fn get(&self, plugin: &str, function_name: Option<&str>) -> AppResult<DynCallable> {
        let store = self.inner.read();
        let Some(items) = store.plugin_items(plugin).filter(|items| !items.is_empty()) else {
            return Err(AppError::not_found(format!(
                "Plugin '{plugin}' does not provide any function widgets"
            )));
        };

        match function_name {
            None if items.len() > 1 => {
                let names: Vec<&str> = items.iter().map(|(n, _)| n.as_str()).collect();
                Err(AppError::ambiguous(format!(
                    "Plugin '{plugin}' provides more than one function widget; \
                     specify a function name from {names:?}"
                )))
            }
            None => Ok(items[0].1.clone()),
            Some(name) => items
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, func)| func.clone())
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Plugin '{plugin}' does not provide a function widget named '{name}'"
                    ))
                }),
        }
    }

    /// Names of one plugin's functions in registration order.
    pub fn function_names(&self, plugin: &str) -> Vec<String> {
        self.inner
            .read()
            .plugin_items(plugin)
            .map(|items| items.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    /// All `(plugin, function_name)` pairs in registration order.
    pub fn all(&self) -> Vec<(String, String)> {
        self.inner
            .read()
            .iter()
            .map(|(p, n, _)| (p.to_string(), n.to_string()))
            .collect()
    }

    /// Number of registered functions across all plugins.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Remove every entry, ahead of a discovery rebuild.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}
