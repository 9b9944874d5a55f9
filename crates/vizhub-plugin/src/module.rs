//! Plugin modules, the unit of registration.
//!
//! A plugin presents itself as a namespace of named hook functions, the
//! moral equivalent of a module whose callables are matched against declared
//! hook specifications by name. Names that match no spec are ignored at
//! registration time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use vizhub_core::AppResult;

use crate::hooks::caller::HookFn;
use crate::values::{HookArgs, PluginValue};

/// A namespace of hook functions offered by one plugin.
#[derive(Default)]
pub struct PluginModule {
    hooks: BTreeMap<String, HookFn>,
}

impl PluginModule {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a hook function under a spec name. Re-using a name replaces
    /// the previous function.
    pub fn with_hook(
        mut self,
        name: &str,
        func: impl Fn(&HookArgs) -> AppResult<PluginValue> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(name.to_string(), Arc::new(func));
        self
    }

    /// Names of the hook functions this module carries.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.keys().map(String::as_str).collect()
    }

    /// Whether the module carries no hook functions.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Consume the module into its named hook functions.
    pub(crate) fn into_hooks(self) -> impl Iterator<Item = (String, HookFn)> {
        self.hooks.into_iter()
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_hook_replaces_same_name() {
        let module = PluginModule::new()
            .with_hook("vizhub_provide_function", |_| Ok(PluginValue::from("a")))
            .with_hook("vizhub_provide_function", |_| Ok(PluginValue::from("b")));

        assert_eq!(module.hook_names(), vec!["vizhub_provide_function"]);
        let (_, func) = module.into_hooks().next().expect("one hook");
        let value = func(&HookArgs::new()).expect("call");
        assert_eq!(value.as_str(), Some("b"));
    }
}
