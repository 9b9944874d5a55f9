//! # vizhub-plugin
//!
//! Plugin engine for VizHub. Provides:
//!
//! - Hook specifications with collect-all and first-result dispatch
//! - Hook callers with per-plugin ordering, enable toggles, and reordering
//! - Historic dispatch with late-registration replay
//! - Plugin manager with call-order export/import
//! - Typed registries for dock widgets, function widgets, and sample data

pub mod context;
pub mod hooks;
pub mod manager;
pub mod module;
pub mod names;
pub mod registries;
pub mod values;

pub use context::{menu_item_label, PluginContext};
pub use hooks::caller::{CallOutcome, HookCaller, HookFailure, HookFn, HookResult, ResultCallback};
pub use hooks::spec::{viewer_specs, CallPolicy, HookSpec, HookSpecTable};
pub use manager::PluginManager;
pub use module::PluginModule;
pub use registries::{
    DockWidgetEntry, DockWidgetRegistry, FunctionWidgetRegistry, SampleDataRegistry, SampleEntry,
    SampleSource, WidgetOptions,
};
pub use values::{DynCallable, HookArgs, PluginValue};
