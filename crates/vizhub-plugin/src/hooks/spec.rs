//! Hook specifications, the fixed set of named extension points.
//!
//! Specs are declared once at process start and are immutable afterwards;
//! they are part of the extension contract, not runtime state, so the table
//! has no removal operation.

use std::collections::BTreeMap;

use vizhub_core::{AppError, AppResult};

/// Hook spec collecting dock-widget factories from plugins.
pub const PROVIDE_DOCK_WIDGET: &str = "vizhub_provide_dock_widget";
/// Hook spec collecting function widgets from plugins.
pub const PROVIDE_FUNCTION: &str = "vizhub_provide_function";
/// Hook spec collecting sample-data catalogs from plugins.
pub const PROVIDE_SAMPLE_DATA: &str = "vizhub_provide_sample_data";
/// Hook spec resolving a reader for a data path; first capable plugin wins.
pub const GET_READER: &str = "vizhub_get_reader";

/// How results from multiple implementations of one spec are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPolicy {
    /// Invoke every enabled implementation and collect all results.
    CollectAll,
    /// Stop at the first implementation returning a non-empty result.
    FirstResult,
}

/// A named, fixed-signature extension point plugins may implement.
#[derive(Debug, Clone)]
pub struct HookSpec {
    name: String,
    policy: CallPolicy,
    /// Parameter names, informational only.
    params: Vec<String>,
}

impl HookSpec {
    /// Declare a new hook specification.
    pub fn new(name: impl Into<String>, policy: CallPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            params: Vec::new(),
        }
    }

    /// Attach informational parameter names.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// The spec's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aggregation policy.
    pub fn policy(&self) -> CallPolicy {
        self.policy
    }

    /// Informational parameter names.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Table of all declared hook specifications, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct HookSpecTable {
    specs: BTreeMap<String, HookSpec>,
}

impl HookSpecTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a spec. Fails if a spec with the same name already exists.
    pub fn register(&mut self, spec: HookSpec) -> AppResult<()> {
        if self.specs.contains_key(spec.name()) {
            return Err(AppError::duplicate_spec(format!(
                "Hook specification '{}' is already declared",
                spec.name()
            )));
        }
        self.specs.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Look up a spec by name.
    pub fn get(&self, name: &str) -> AppResult<&HookSpec> {
        self.specs.get(name).ok_or_else(|| {
            AppError::unknown_spec(format!("Hook specification '{name}' is not declared"))
        })
    }

    /// Whether a spec with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Iterate declared specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &HookSpec> {
        self.specs.values()
    }

    /// Number of declared specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// The extension points the viewer declares at startup.
pub fn viewer_specs() -> HookSpecTable {
    let mut table = HookSpecTable::new();
    table
        .register(HookSpec::new(PROVIDE_DOCK_WIDGET, CallPolicy::CollectAll))
        .expect("spec table starts empty");
    table
        .register(HookSpec::new(PROVIDE_FUNCTION, CallPolicy::CollectAll))
        .expect("spec table starts empty");
    table
        .register(HookSpec::new(PROVIDE_SAMPLE_DATA, CallPolicy::CollectAll))
        .expect("spec table starts empty");
    table
        .register(HookSpec::new(GET_READER, CallPolicy::FirstResult).with_params(["path"]))
        .expect("spec table starts empty");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizhub_core::error::ErrorKind;

    #[test]
    fn test_duplicate_spec_rejected() {
        let mut table = HookSpecTable::new();
        table
            .register(HookSpec::new("my_hook", CallPolicy::CollectAll))
            .expect("first registration");

        let err = table
            .register(HookSpec::new("my_hook", CallPolicy::FirstResult))
            .expect_err("duplicate should fail");
        assert_eq!(err.kind, ErrorKind::DuplicateSpec);
    }

    #[test]
    fn test_unknown_spec_lookup() {
        let table = HookSpecTable::new();
        let err = table.get("nope").expect_err("unknown should fail");
        assert_eq!(err.kind, ErrorKind::UnknownSpec);
    }

    #[test]
    fn test_viewer_specs_declared() {
        let table = viewer_specs();
        assert!(table.contains(PROVIDE_DOCK_WIDGET));
        assert!(table.contains(PROVIDE_FUNCTION));
        assert!(table.contains(PROVIDE_SAMPLE_DATA));
        assert_eq!(
            table.get(GET_READER).expect("declared").policy(),
            CallPolicy::FirstResult
        );
    }
}
