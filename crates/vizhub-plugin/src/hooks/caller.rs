//! Hook caller: ordered implementations and dispatch for one specification.
//!
//! Dispatch is synchronous and single-threaded: implementations run one at a
//! time in list order, and the list order *is* the dispatch priority. An
//! error inside one implementation is recorded and logged with plugin
//! attribution, never propagated; a misbehaving plugin must not prevent
//! other plugins' results from being returned.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use vizhub_core::{AppError, AppResult};

use super::spec::{CallPolicy, HookSpec};
use crate::values::{HookArgs, PluginValue};

/// A plugin hook implementation. `Err` models the plugin raising.
pub type HookFn = Arc<dyn Fn(&HookArgs) -> AppResult<PluginValue> + Send + Sync>;

/// Per-result subscriber invoked with `(plugin_name, result)` during
/// historic dispatch and late-registration replay.
pub type ResultCallback = Arc<dyn Fn(&str, &PluginValue) + Send + Sync>;

/// One plugin's implementation of a hook specification.
struct HookImplementation {
    plugin_name: String,
    func: HookFn,
    enabled: bool,
}

impl fmt::Debug for HookImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookImplementation")
            .field("plugin_name", &self.plugin_name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A successful, non-empty result with plugin attribution.
#[derive(Debug, Clone)]
pub struct HookResult {
    /// Plugin that produced the result.
    pub plugin: String,
    /// The raw, unvalidated value it returned.
    pub value: PluginValue,
}

/// A failed implementation call with plugin attribution.
#[derive(Debug, Clone)]
pub struct HookFailure {
    /// Plugin whose implementation failed.
    pub plugin: String,
    /// The error it returned.
    pub error: AppError,
}

/// Aggregated outcome of dispatching one hook call.
///
/// For a first-result spec, `results` holds at most one entry. Empty results
/// (`PluginValue::None`) are never included. Failures are carried separately
/// so callers can surface them without losing the good results.
#[derive(Debug, Clone, Default)]
pub struct CallOutcome {
    /// Successful non-empty results in dispatch order.
    pub results: Vec<HookResult>,
    /// Implementations that failed during this dispatch.
    pub failures: Vec<HookFailure>,
}

impl CallOutcome {
    /// The first (highest-priority) result, if any.
    pub fn first(&self) -> Option<&HookResult> {
        self.results.first()
    }

    /// Whether no implementation produced a result.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Record of a historic dispatch: the argument snapshot plus the standing
/// subscribers every late-registering implementation must be replayed to.
struct HistoricRecord {
    args: HookArgs,
    callbacks: Vec<ResultCallback>,
    recorded_at: DateTime<Utc>,
}

impl fmt::Debug for HistoricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoricRecord")
            .field("args", &self.args)
            .field("callbacks", &self.callbacks.len())
            .field("recorded_at", &self.recorded_at)
            .finish()
    }
}

/// Ordered implementations and dispatch state for one hook specification.
#[derive(Debug)]
pub struct HookCaller {
    spec: HookSpec,
    impls: Vec<HookImplementation>,
    history: Option<HistoricRecord>,
}

impl HookCaller {
    /// Create a caller with no implementations.
    pub fn new(spec: HookSpec) -> Self {
        Self {
            spec,
            impls: Vec::new(),
            history: None,
        }
    }

    /// The specification this caller dispatches.
    pub fn spec(&self) -> &HookSpec {
        &self.spec
    }

    /// Add a plugin's implementation.
    ///
    /// For first-result specs the newest registration is placed first
    /// (highest priority); collect-all specs append. Fails if the plugin
    /// already has an implementation for this spec.
    pub fn add_implementation(&mut self, plugin: &str, func: HookFn) -> AppResult<()> {
        if self.impls.iter().any(|imp| imp.plugin_name == plugin) {
            return Err(AppError::registration(format!(
                "Plugin '{}' already has an implementation for hook '{}'",
                plugin,
                self.spec.name()
            )));
        }

        let imp = HookImplementation {
            plugin_name: plugin.to_string(),
            func,
            enabled: true,
        };

        match self.spec.policy() {
            CallPolicy::FirstResult => self.impls.insert(0, imp),
            CallPolicy::CollectAll => self.impls.push(imp),
        }

        debug!(hook = %self.spec.name(), plugin = %plugin, "Hook implementation added");
        Ok(())
    }

    /// Remove a plugin's implementation. No error if absent.
    pub fn remove_implementation(&mut self, plugin: &str) {
        self.impls.retain(|imp| imp.plugin_name != plugin);
    }

    /// Toggle a plugin's participation in dispatch without losing its
    /// position. Returns whether the plugin had an implementation here.
    pub fn set_enabled(&mut self, plugin: &str, enabled: bool) -> bool {
        match self.impls.iter_mut().find(|imp| imp.plugin_name == plugin) {
            Some(imp) => {
                imp.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Ordered snapshot of `(plugin, enabled)` pairs for export.
    pub fn implementations(&self) -> Vec<(String, bool)> {
        self.impls
            .iter()
            .map(|imp| (imp.plugin_name.clone(), imp.enabled))
            .collect()
    }

    /// Number of implementations, including disabled ones.
    pub fn implementation_count(&self) -> usize {
        self.impls.len()
    }

    /// Reorder exactly the named implementations to the front, in the given
    /// order. Implementations not named keep their relative order after the
    /// named ones. Names without a registered implementation are skipped;
    /// installed/uninstalled plugins must not break reordering.
    pub fn bring_to_front(&mut self, plugins: &[String]) {
        let mut front = Vec::with_capacity(plugins.len());
        for plugin in plugins {
            match self.impls.iter().position(|imp| &imp.plugin_name == plugin) {
                Some(pos) => front.push(self.impls.remove(pos)),
                None => {
                    debug!(
                        hook = %self.spec.name(),
                        plugin = %plugin,
                        "Skipping unknown plugin in reorder"
                    );
                }
            }
        }
        front.append(&mut self.impls);
        self.impls = front;
    }

    /// Dispatch a call across the enabled implementations.
    pub fn call(&self, args: &HookArgs) -> CallOutcome {
        let mut outcome = CallOutcome::default();

        for imp in self.impls.iter().filter(|imp| imp.enabled) {
            match (imp.func)(args) {
                Ok(value) if value.is_none() => {}
                Ok(value) => {
                    outcome.results.push(HookResult {
                        plugin: imp.plugin_name.clone(),
                        value,
                    });
                    if self.spec.policy() == CallPolicy::FirstResult {
                        break;
                    }
                }
                Err(error) => {
                    warn!(
                        hook = %self.spec.name(),
                        plugin = %imp.plugin_name,
                        error = %error,
                        "Hook implementation failed"
                    );
                    outcome.failures.push(HookFailure {
                        plugin: imp.plugin_name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Dispatch in historic mode.
    ///
    /// The first historic call snapshots the arguments, registers `callback`
    /// as a standing subscriber, and performs a normal dispatch, feeding each
    /// individual `(plugin, result)` pair to the callback. If this spec is
    /// already historic, the callback is only added as a further subscriber;
    /// late registrations reach it through [`HookCaller::replay_history_for`].
    pub fn call_historic(&mut self, args: HookArgs, callback: ResultCallback) {
        if let Some(history) = &mut self.history {
            history.callbacks.push(callback);
            return;
        }

        self.history = Some(HistoricRecord {
            args: args.clone(),
            callbacks: vec![callback.clone()],
            recorded_at: Utc::now(),
        });

        let outcome = self.call(&args);
        for result in &outcome.results {
            callback(&result.plugin, &result.value);
        }
    }

    /// Whether this spec has been dispatched in historic mode.
    pub fn is_historic(&self) -> bool {
        self.history.is_some()
    }

    /// Replay the recorded historic call against one late-registered
    /// plugin's implementation, feeding its result to every standing
    /// subscriber. Failures are downgraded to warnings, like any dispatch.
    pub fn replay_history_for(&self, plugin: &str) {
        let Some(history) = &self.history else {
            return;
        };
        let Some(imp) = self
            .impls
            .iter()
            .find(|imp| imp.plugin_name == plugin && imp.enabled)
        else {
            return;
        };

        debug!(
            hook = %self.spec.name(),
            plugin = %plugin,
            recorded_at = %history.recorded_at,
            "Replaying historic call for late registration"
        );

        match (imp.func)(&history.args) {
            Ok(value) if value.is_none() => {}
            Ok(value) => {
                for callback in &history.callbacks {
                    callback(plugin, &value);
                }
            }
            Err(error) => {
                warn!(
                    hook = %self.spec.name(),
                    plugin = %plugin,
                    error = %error,
                    "Hook implementation failed during historic replay"
                );
            }
        }
    }

    /// Forget the historic record. Used when registries are rebuilt and
    /// discovery is about to run again from scratch.
    pub fn clear_history(&mut self) {
        self.history = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn value_hook(value: &'static str) -> HookFn {
        Arc::new(move |_| Ok(PluginValue::from(value)))
    }

    fn none_hook() -> HookFn {
        Arc::new(|_| Ok(PluginValue::None))
    }

    fn failing_hook(message: &'static str) -> HookFn {
        Arc::new(move |_| Err(AppError::plugin(message)))
    }

    fn collect_caller() -> HookCaller {
        HookCaller::new(HookSpec::new("collect_hook", CallPolicy::CollectAll))
    }

    fn first_caller() -> HookCaller {
        HookCaller::new(HookSpec::new("first_hook", CallPolicy::FirstResult))
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let mut caller = collect_caller();
        caller
            .add_implementation("plugin-a", value_hook("x"))
            .expect("first add");
        let err = caller
            .add_implementation("plugin-a", value_hook("y"))
            .expect_err("duplicate add");
        assert_eq!(err.kind, vizhub_core::error::ErrorKind::Registration);
    }

    #[test]
    fn test_first_result_prepends_new_registrations() {
        let mut caller = first_caller();
        caller.add_implementation("old", value_hook("old")).unwrap();
        caller.add_implementation("new", value_hook("new")).unwrap();

        let impls = caller.implementations();
        assert_eq!(impls[0].0, "new");
        assert_eq!(impls[1].0, "old");

        let outcome = caller.call(&HookArgs::new());
        assert_eq!(outcome.first().expect("result").plugin, "new");
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_first_result_skips_empty_results() {
        let mut caller = first_caller();
        caller.add_implementation("has-data", value_hook("data")).unwrap();
        caller.add_implementation("no-data", none_hook()).unwrap();

        // "no-data" sits first but returns None, so "has-data" wins.
        let outcome = caller.call(&HookArgs::new());
        assert_eq!(outcome.first().expect("result").plugin, "has-data");
    }

    #[test]
    fn test_first_result_all_empty_gives_empty_outcome() {
        let mut caller = first_caller();
        caller.add_implementation("a", none_hook()).unwrap();
        caller.add_implementation("b", none_hook()).unwrap();

        assert!(caller.call(&HookArgs::new()).is_empty());
    }

    #[test]
    fn test_collect_all_continues_past_failures() {
        let mut caller = collect_caller();
        caller.add_implementation("good-1", value_hook("one")).unwrap();
        caller.add_implementation("bad", failing_hook("boom")).unwrap();
        caller.add_implementation("good-2", value_hook("two")).unwrap();

        let outcome = caller.call(&HookArgs::new());
        let plugins: Vec<&str> = outcome.results.iter().map(|r| r.plugin.as_str()).collect();
        assert_eq!(plugins, vec!["good-1", "good-2"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].plugin, "bad");
    }

    #[test]
    fn test_disabled_implementation_not_called() {
        let mut caller = collect_caller();
        caller.add_implementation("a", value_hook("a")).unwrap();
        caller.add_implementation("b", value_hook("b")).unwrap();
        assert!(caller.set_enabled("a", false));

        let outcome = caller.call(&HookArgs::new());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].plugin, "b");

        // Disabled implementations stay present for re-enabling.
        assert_eq!(caller.implementation_count(), 2);
        assert!(caller.set_enabled("a", true));
        assert_eq!(caller.call(&HookArgs::new()).results.len(), 2);
    }

    #[test]
    fn test_set_enabled_unknown_plugin() {
        let mut caller = collect_caller();
        assert!(!caller.set_enabled("ghost", false));
    }

    #[test]
    fn test_bring_to_front_skips_unknown_names() {
        let mut caller = collect_caller();
        for plugin in ["a", "b", "c", "d"] {
            caller.add_implementation(plugin, value_hook("x")).unwrap();
        }

        caller.bring_to_front(&[
            "c".to_string(),
            "uninstalled".to_string(),
            "a".to_string(),
        ]);

        let order: Vec<String> = caller
            .implementations()
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(order, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_remove_implementation_is_idempotent() {
        let mut caller = collect_caller();
        caller.add_implementation("a", value_hook("x")).unwrap();
        caller.remove_implementation("a");
        caller.remove_implementation("a");
        assert_eq!(caller.implementation_count(), 0);
    }

    #[test]
    fn test_historic_call_feeds_results_per_plugin() {
        let mut caller = collect_caller();
        caller.add_implementation("a", value_hook("one")).unwrap();
        caller.add_implementation("b", value_hook("two")).unwrap();

        let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        caller.call_historic(
            HookArgs::new(),
            Arc::new(move |plugin, value| {
                sink.lock()
                    .unwrap()
                    .push((plugin.to_string(), value.as_str().unwrap().to_string()));
            }),
        );

        assert!(caller.is_historic());
        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("a".to_string(), "one".to_string()),
                ("b".to_string(), "two".to_string())
            ]
        );
    }

    #[test]
    fn test_replay_history_for_late_registration() {
        let mut caller = collect_caller();
        caller.add_implementation("early", value_hook("early")).unwrap();

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        caller.call_historic(
            HookArgs::new(),
            Arc::new(move |plugin, _| sink.lock().unwrap().push(plugin.to_string())),
        );

        caller.add_implementation("late", value_hook("late")).unwrap();
        caller.replay_history_for("late");

        assert_eq!(*seen.lock().unwrap(), vec!["early", "late"]);
    }

    #[test]
    fn test_second_historic_call_only_subscribes() {
        let mut caller = collect_caller();
        caller.add_implementation("a", value_hook("one")).unwrap();

        let first: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let counter = first.clone();
        caller.call_historic(
            HookArgs::new(),
            Arc::new(move |_, _| *counter.lock().unwrap() += 1),
        );
        assert_eq!(*first.lock().unwrap(), 1);

        // A later subscriber sees nothing until a plugin registers late.
        let second: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let counter = second.clone();
        caller.call_historic(
            HookArgs::new(),
            Arc::new(move |_, _| *counter.lock().unwrap() += 1),
        );
        assert_eq!(*second.lock().unwrap(), 0);

        caller.add_implementation("b", value_hook("two")).unwrap();
        caller.replay_history_for("b");
        assert_eq!(*first.lock().unwrap(), 2);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn test_replay_skips_failures_and_disabled() {
        let mut caller = collect_caller();
        caller.call_historic(HookArgs::new(), Arc::new(|_, _| panic!("no results expected")));

        caller.add_implementation("bad", failing_hook("boom")).unwrap();
        caller.replay_history_for("bad");

        caller.add_implementation("off", value_hook("x")).unwrap();
        caller.set_enabled("off", false);
        caller.replay_history_for("off");
    }
}
