//! Dynamic plugin payloads.
//!
//! Plugin hook implementations return arbitrary, untrusted values: a widget
//! factory, a `(factory, options)` grouping, a mapping of sample names to
//! data sources, or something malformed. [`PluginValue`] models that output
//! as an untyped variant which the typed registries narrow and normalize.
//! Unlike a plain JSON value it can carry callables, which is what the
//! widget and sample-data extension points trade in.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Function signature shared by all plugin-supplied callables.
pub type CallableFn = Arc<dyn Fn(&HookArgs) -> PluginValue + Send + Sync>;

/// A named callable supplied by a plugin.
///
/// The name carries the identifier of the plugin-side factory or function;
/// registries derive human-readable item names from it when the plugin does
/// not provide an explicit one.
#[derive(Clone)]
pub struct DynCallable {
    name: String,
    func: CallableFn,
}

impl DynCallable {
    /// Create a named callable.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&HookArgs) -> PluginValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The identifier the plugin gave this callable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the callable.
    pub fn invoke(&self, args: &HookArgs) -> PluginValue {
        (self.func)(args)
    }
}

impl fmt::Debug for DynCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynCallable")
            .field("name", &self.name)
            .field("func", &"<callable>")
            .finish()
    }
}

/// An untyped value returned by a plugin hook implementation.
#[derive(Debug, Clone, Default)]
pub enum PluginValue {
    /// No result. A first-result dispatch skips implementations returning this.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string (also used for path-like data locators).
    Str(String),
    /// A sequence of values.
    List(Vec<PluginValue>),
    /// A string-keyed mapping.
    Map(BTreeMap<String, PluginValue>),
    /// A plugin-supplied callable.
    Callable(DynCallable),
}

impl PluginValue {
    /// Whether this is the empty result.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Human-readable type name for validation diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Callable(_) => "callable",
        }
    }

    /// View as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// View as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// View as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// View as a sequence.
    pub fn as_list(&self) -> Option<&[PluginValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// View as a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, PluginValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// View as a callable.
    pub fn as_callable(&self) -> Option<&DynCallable> {
        match self {
            Self::Callable(c) => Some(c),
            _ => None,
        }
    }
}

impl From<bool> for PluginValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PluginValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PluginValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PluginValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PluginValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<PluginValue>> for PluginValue {
    fn from(value: Vec<PluginValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, PluginValue>> for PluginValue {
    fn from(value: BTreeMap<String, PluginValue>) -> Self {
        Self::Map(value)
    }
}

impl From<DynCallable> for PluginValue {
    fn from(value: DynCallable) -> Self {
        Self::Callable(value)
    }
}

/// Arguments passed to hook implementations, a flexible key-value map.
///
/// A historic dispatch snapshots its `HookArgs` so that implementations
/// registered later can be replayed against the original call.
#[derive(Debug, Clone, Default)]
pub struct HookArgs {
    values: BTreeMap<String, PluginValue>,
}

impl HookArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value.
    pub fn with_value(mut self, key: &str, value: impl Into<PluginValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Insert a string value.
    pub fn with_str(self, key: &str, value: &str) -> Self {
        self.with_value(key, value)
    }

    /// Insert an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_value(key, value)
    }

    /// Insert a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_value(key, value)
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&PluginValue> {
        self.values.get(key)
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer value.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(|v| v.as_int())
    }

    /// Get a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(|v| v.as_bool())
    }

    /// Whether any arguments are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
