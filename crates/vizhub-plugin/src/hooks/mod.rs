//! Hook specification table and per-spec hook callers.

pub mod caller;
pub mod spec;

pub use caller::{CallOutcome, HookCaller, HookFailure, HookFn, HookResult, ResultCallback};
pub use spec::{CallPolicy, HookSpec, HookSpecTable};
