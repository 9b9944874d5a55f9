//! Plugin manager: registration, lookup, and call-order import/export.
//!
//! Owns one [`HookCaller`] per declared hook specification plus the set of
//! registered plugin names. Registration matches a module's hook functions
//! against spec names and, for specs already dispatched historically,
//! replays the recorded call against the newcomer so it never misses events.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use vizhub_core::types::call_order::{CallOrder, CallOrderEntry};
use vizhub_core::{AppError, AppResult};

use crate::hooks::caller::HookCaller;
use crate::hooks::spec::{CallPolicy, HookSpecTable};
use crate::module::PluginModule;

/// Owns hook callers and registered plugins for one plugin namespace.
#[derive(Debug)]
pub struct PluginManager {
    specs: HookSpecTable,
    callers: BTreeMap<String, HookCaller>,
    plugins: BTreeSet<String>,
    /// Plugins switched off wholesale. Kept separately from the per-caller
    /// enabled flags so the preference survives export even for plugins
    /// whose hooks never appear in a call-order record.
    disabled: BTreeSet<String>,
}

impl PluginManager {
    /// Create a manager with one caller per declared spec.
    pub fn new(specs: HookSpecTable) -> Self {
        let callers = specs
            .iter()
            .map(|spec| (spec.name().to_string(), HookCaller::new(spec.clone())))
            .collect();
        Self {
            specs,
            callers,
            plugins: BTreeSet::new(),
            disabled: BTreeSet::new(),
        }
    }

    /// The declared hook specifications.
    pub fn specs(&self) -> &HookSpecTable {
        &self.specs
    }

    /// Register a plugin module under a unique name.
    ///
    /// Hook functions whose name matches a declared spec become
    /// implementations on the corresponding caller; the rest are ignored.
    /// Callers already dispatched historically replay the recorded call
    /// against the new implementation immediately.
    pub fn register(&mut self, module: PluginModule, name: &str) -> AppResult<()> {
        if self.plugins.contains(name) {
            return Err(AppError::registration(format!(
                "Plugin '{name}' is already registered"
            )));
        }

        let mut matched = Vec::new();
        for (hook_name, func) in module.into_hooks() {
            let Some(caller) = self.callers.get_mut(&hook_name) else {
                debug!(
                    plugin = %name,
                    hook = %hook_name,
                    "Ignoring hook function matching no declared specification"
                );
                continue;
            };
            caller.add_implementation(name, func)?;
            matched.push(hook_name);
        }

        self.plugins.insert(name.to_string());
        info!(plugin = %name, hooks = matched.len(), "Plugin registered");

        // A standing disabled preference applies to newcomers too.
        if self.disabled.contains(name) {
            for hook_name in &matched {
                if let Some(caller) = self.callers.get_mut(hook_name) {
                    caller.set_enabled(name, false);
                }
            }
        }

        // Late-registration path: specs that already dispatched historically
        // feed this plugin's result to their standing subscribers.
        for hook_name in &matched {
            let caller = &self.callers[hook_name];
            if caller.is_historic() {
                caller.replay_history_for(name);
            }
        }

        Ok(())
    }

    /// Remove a plugin and all of its implementations across every caller.
    pub fn unregister(&mut self, name: &str) {
        if !self.plugins.remove(name) {
            warn!(plugin = %name, "Unregistering a plugin that was not registered");
            return;
        }
        for caller in self.callers.values_mut() {
            caller.remove_implementation(name);
        }
        info!(plugin = %name, "Plugin unregistered");
    }

    /// Whether a plugin with this name is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.plugins.contains(name)
    }

    /// Names of all registered plugins, sorted.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(String::as_str).collect()
    }

    /// The caller for a declared spec.
    pub fn hook(&self, name: &str) -> AppResult<&HookCaller> {
        self.callers.get(name).ok_or_else(|| {
            AppError::unknown_spec(format!("Hook specification '{name}' is not declared"))
        })
    }

    /// Mutable access to the caller for a declared spec.
    pub fn hook_mut(&mut self, name: &str) -> AppResult<&mut HookCaller> {
        self.callers.get_mut(name).ok_or_else(|| {
            AppError::unknown_spec(format!("Hook specification '{name}' is not declared"))
        })
    }

    /// Export the current dispatch priority as a persistable record.
    ///
    /// Only first-result specs with more than one implementation are
    /// included; single-implementation specs need no ordering.
    pub fn call_order(&self) -> CallOrder {
        let mut order = CallOrder::new();
        for (spec_name, caller) in &self.callers {
            if caller.spec().policy() != CallPolicy::FirstResult {
                continue;
            }
            let impls = caller.implementations();
            if impls.len() > 1 {
                order.insert(
                    spec_name.clone(),
                    impls
                        .into_iter()
                        .map(|(plugin, enabled)| CallOrderEntry::new(plugin, enabled))
                        .collect(),
                );
            }
        }
        order
    }

    /// Import a previously exported call order.
    ///
    /// For each spec in the record, enabled flags are applied and the named
    /// implementations are brought to the front in record order. Plugins no
    /// longer installed are skipped silently; specs absent from the record,
    /// or whose surviving list is empty, keep their native order.
    pub fn set_call_order(&mut self, order: &CallOrder) {
        for (spec_name, entries) in order {
            let Some(caller) = self.callers.get_mut(spec_name) else {
                debug!(hook = %spec_name, "Skipping call order for undeclared specification");
                continue;
            };

            let mut surviving = Vec::with_capacity(entries.len());
            for entry in entries {
                if caller.set_enabled(&entry.plugin, entry.enabled) {
                    surviving.push(entry.plugin.clone());
                } else {
                    debug!(
                        hook = %spec_name,
                        plugin = %entry.plugin,
                        "Skipping call-order entry for uninstalled plugin"
                    );
                }
            }

            if !surviving.is_empty() {
                caller.bring_to_front(&surviving);
            }
        }
    }

    /// Disable (or re-enable) every implementation a plugin has registered,
    /// and remember the toggle for settings export. The name need not be
    /// registered; the preference applies when the plugin is installed.
    pub fn set_plugin_enabled(&mut self, plugin: &str, enabled: bool) {
        for caller in self.callers.values_mut() {
            caller.set_enabled(plugin, enabled);
        }
        if enabled {
            self.disabled.remove(plugin);
        } else {
            self.disabled.insert(plugin.to_string());
        }
    }

    /// Names of plugins disabled wholesale, sorted.
    pub fn disabled_plugins(&self) -> Vec<&str> {
        self.disabled.iter().map(String::as_str).collect()
    }

    /// Forget all historic dispatch records, so discovery can run again
    /// from scratch after a registry rebuild.
    pub fn reset_history(&mut self) {
        for caller in self.callers.values_mut() {
            caller.clear_history();
        }
    }
}
