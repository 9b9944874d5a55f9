//! Plugin context, the single owner of the manager and the typed registries.
//!
//! The host constructs one context explicitly; there are no ambient
//! singletons. Discovery wires each registry's result callback into a
//! historic dispatch of the matching hook, so plugins registered after
//! discovery still land their contributions through the replay path.

use vizhub_core::config::plugins::PluginSettings;
use vizhub_core::types::call_order::CallOrder;
use vizhub_core::AppResult;

use crate::hooks::spec::{
    viewer_specs, PROVIDE_DOCK_WIDGET, PROVIDE_FUNCTION, PROVIDE_SAMPLE_DATA,
};
use crate::manager::PluginManager;
use crate::registries::{
    DockWidgetEntry, DockWidgetRegistry, FunctionWidgetRegistry, SampleDataRegistry,
};
use crate::values::HookArgs;

/// Menu label for one plugin-contributed item.
pub fn menu_item_label(plugin: &str, item: &str) -> String {
    format!("{plugin}: {item}")
}

/// Owns the plugin manager and the typed capability registries.
#[derive(Debug)]
pub struct PluginContext {
    manager: PluginManager,
    dock_widgets: DockWidgetRegistry,
    function_widgets: FunctionWidgetRegistry,
    sample_data: SampleDataRegistry,
}

impl Default for PluginContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginContext {
    /// Create a context with the viewer's declared extension points and
    /// empty registries.
    pub fn new() -> Self {
        Self {
            manager: PluginManager::new(viewer_specs()),
            dock_widgets: DockWidgetRegistry::new(),
            function_widgets: FunctionWidgetRegistry::new(),
            sample_data: SampleDataRegistry::new(),
        }
    }

    /// The plugin manager.
    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    /// Mutable access to the plugin manager, for registration.
    pub fn manager_mut(&mut self) -> &mut PluginManager {
        &mut self.manager
    }

    /// The dock-widget registry.
    pub fn dock_widgets(&self) -> &DockWidgetRegistry {
        &self.dock_widgets
    }

    /// The function-widget registry.
    pub fn function_widgets(&self) -> &FunctionWidgetRegistry {
        &self.function_widgets
    }

    /// The sample-data registry.
    pub fn sample_data(&self) -> &SampleDataRegistry {
        &self.sample_data
    }

    /// Populate the widget registries from every registered plugin.
    ///
    /// Idempotent: hooks already dispatched historically keep their record
    /// and their subscribers, so nothing is re-validated and plugins
    /// registered later are picked up through the replay path.
    pub fn discover_widgets(&mut self) -> AppResult<()> {
        let dock_callback = self.dock_widgets.result_callback();
        let caller = self.manager.hook_mut(PROVIDE_DOCK_WIDGET)?;
        if !caller.is_historic() {
            caller.call_historic(HookArgs::new(), dock_callback);
        }

        let function_callback = self.function_widgets.result_callback();
        let caller = self.manager.hook_mut(PROVIDE_FUNCTION)?;
        if !caller.is_historic() {
            caller.call_historic(HookArgs::new(), function_callback);
        }

        Ok(())
    }

    /// Populate the sample-data registry from every registered plugin.
    ///
    /// Idempotent like [`PluginContext::discover_widgets`].
    pub fn discover_sample_data(&mut self) -> AppResult<()> {
        let callback = self.sample_data.result_callback();
        let caller = self.manager.hook_mut(PROVIDE_SAMPLE_DATA)?;
        if !caller.is_historic() {
            caller.call_historic(HookArgs::new(), callback);
        }
        Ok(())
    }

    /// All discovered samples as `(plugin, key, display_name)` triples in
    /// stable registration order.
    pub fn available_samples(&self) -> Vec<(String, String, String)> {
        self.sample_data.available()
    }

    /// Get a plugin's dock widget by optional name.
    pub fn get_plugin_widget(
        &self,
        plugin: &str,
        widget_name: Option<&str>,
    ) -> AppResult<DockWidgetEntry> {
        self.dock_widgets.get(plugin, widget_name)
    }

    /// The current dispatch priority, for persistence.
    pub fn call_order(&self) -> CallOrder {
        self.manager.call_order()
    }

    /// Apply persisted plugin preferences: call order first, then the
    /// disabled-plugin list on top.
    pub fn apply_settings(&mut self, settings: &PluginSettings) {
        self.manager.set_call_order(&settings.call_order);
        for plugin in &settings.disabled_plugins {
            self.manager.set_plugin_enabled(plugin, false);
        }
    }

    /// Export the current state as persistable plugin preferences.
    pub fn snapshot_settings(&self) -> PluginSettings {
        PluginSettings {
            call_order: self.manager.call_order(),
            disabled_plugins: self
                .manager
                .disabled_plugins()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Drop all discovered entries and historic records, then run discovery
    /// again from scratch.
    pub fn rebuild(&mut self) -> AppResult<()> {
        self.dock_widgets.clear();
        self.function_widgets.clear();
        self.sample_data.clear();
        self.manager.reset_history();
        self.discover_widgets()?;
        self.discover_sample_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::hooks::spec::PROVIDE_SAMPLE_DATA;
    use crate::module::PluginModule;
    use crate::values::{DynCallable, PluginValue};
    use vizhub_core::error::ErrorKind;

    fn widget_plugin(factory_name: &'static str) -> PluginModule {
        PluginModule::new().with_hook(PROVIDE_DOCK_WIDGET, move |_| {
            Ok(PluginValue::Callable(DynCallable::new(factory_name, |_| {
                PluginValue::from("widget")
            })))
        })
    }

    fn sample_plugin(key: &'static str) -> PluginModule {
        PluginModule::new().with_hook(PROVIDE_SAMPLE_DATA, move |_| {
            let mut samples = BTreeMap::new();
            samples.insert(
                key.to_string(),
                PluginValue::Callable(DynCallable::new("make_data", |_| {
                    PluginValue::from("data")
                })),
            );
            Ok(PluginValue::Map(samples))
        })
    }

    #[test]
    fn test_discovery_populates_registries() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(widget_plugin("FancyWidget"), "plugin-a")
            .unwrap();

        ctx.discover_widgets().unwrap();
        let entry = ctx.get_plugin_widget("plugin-a", None).expect("discovered");
        assert_eq!(entry.factory.name(), "FancyWidget");
    }

    #[test]
    fn test_discovery_is_idempotent() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(widget_plugin("FancyWidget"), "plugin-a")
            .unwrap();

        ctx.discover_widgets().unwrap();
        ctx.discover_widgets().unwrap();
        assert_eq!(ctx.dock_widgets().len(), 1);
    }

    #[test]
    fn test_late_registration_lands_samples() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(sample_plugin("early-sample"), "plugin-early")
            .unwrap();
        ctx.discover_sample_data().unwrap();
        assert_eq!(ctx.available_samples().len(), 1);

        ctx.manager_mut()
            .register(sample_plugin("late-sample"), "plugin-late")
            .unwrap();

        let samples = ctx.available_samples();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().any(|(p, _, _)| p == "plugin-late"));
    }

    #[test]
    fn test_get_plugin_widget_unknown_plugin() {
        let mut ctx = PluginContext::new();
        ctx.discover_widgets().unwrap();
        let err = ctx.get_plugin_widget("nobody", None).expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_rebuild_rediscover_from_scratch() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(sample_plugin("s1"), "plugin-a")
            .unwrap();
        ctx.discover_sample_data().unwrap();
        ctx.manager_mut().unregister("plugin-a");

        // Registry still holds the stale entry until a rebuild.
        assert_eq!(ctx.available_samples().len(), 1);
        ctx.rebuild().unwrap();
        assert!(ctx.available_samples().is_empty());
    }

    #[test]
    fn test_apply_settings_disables_plugins() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(widget_plugin("AWidget"), "plugin-a")
            .unwrap();

        let settings = PluginSettings {
            call_order: CallOrder::new(),
            disabled_plugins: vec!["plugin-a".to_string()],
        };
        ctx.apply_settings(&settings);
        ctx.discover_widgets().unwrap();

        // Disabled before discovery, so nothing lands.
        assert!(ctx.dock_widgets().is_empty());
    }

    #[test]
    fn test_snapshot_keeps_widget_only_disabled_plugin() {
        let mut ctx = PluginContext::new();
        ctx.manager_mut()
            .register(widget_plugin("AWidget"), "plugin-a")
            .unwrap();

        // A dock-widget-only plugin never appears in the call-order record,
        // but its disabled toggle must still survive export.
        let settings = PluginSettings {
            call_order: CallOrder::new(),
            disabled_plugins: vec!["plugin-a".to_string()],
        };
        ctx.apply_settings(&settings);

        let snapshot = ctx.snapshot_settings();
        assert!(snapshot.call_order.is_empty());
        assert_eq!(snapshot.disabled_plugins, vec!["plugin-a"]);
    }

    #[test]
    fn test_menu_item_label() {
        assert_eq!(
            menu_item_label("plugin-a", "Fancy Widget"),
            "plugin-a: Fancy Widget"
        );
    }
}
