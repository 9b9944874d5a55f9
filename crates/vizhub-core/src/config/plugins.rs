//! Plugin system configuration.
//!
//! Holds the user-facing plugin preferences that survive restarts: the
//! persisted call order for first-result hooks and the set of plugins the
//! user has switched off. The plugin manager consumes these values at
//! startup; it never reads them from disk itself.

use serde::{Deserialize, Serialize};

use crate::types::call_order::CallOrder;

/// Plugin system settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Persisted dispatch priority per first-result hook specification.
    #[serde(default)]
    pub call_order: CallOrder,
    /// Plugins whose implementations are disabled across all hooks.
    #[serde(default)]
    pub disabled_plugins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::call_order::CallOrderEntry;

    #[test]
    fn test_defaults_are_empty() {
        let settings: PluginSettings = serde_json::from_str("{}").expect("deserialize");
        assert!(settings.call_order.is_empty());
        assert!(settings.disabled_plugins.is_empty());
    }

    #[test]
    fn test_roundtrip_with_call_order() {
        let mut settings = PluginSettings::default();
        settings.call_order.insert(
            "vizhub_get_reader".to_string(),
            vec![CallOrderEntry::new("builtins", true)],
        );
        settings.disabled_plugins.push("broken-plugin".to_string());

        let json = serde_json::to_string(&settings).expect("serialize");
        let parsed: PluginSettings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.disabled_plugins, vec!["broken-plugin"]);
        assert_eq!(parsed.call_order.len(), 1);
    }
}
