//! Persistable call-order record for first-result hook dispatch.
//!
//! The plugin manager exports the current dispatch priority of every
//! first-result hook specification with more than one implementation as a
//! [`CallOrder`], and re-imports it on the next start to restore the user's
//! preferred ordering. Serialization and storage location belong to the
//! settings subsystem; this crate only defines the literal representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One implementation's position in a hook's call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOrderEntry {
    /// Name of the plugin owning the implementation.
    pub plugin: String,
    /// Whether the implementation participates in dispatch.
    pub enabled: bool,
}

impl CallOrderEntry {
    /// Create a new call-order entry.
    pub fn new(plugin: impl Into<String>, enabled: bool) -> Self {
        Self {
            plugin: plugin.into(),
            enabled,
        }
    }
}

/// Map from hook-spec name to its ordered implementation list, highest
/// priority first.
///
/// Entries referencing plugins that are no longer installed are skipped
/// silently on import; plugin churn between sessions must never fail a load.
pub type CallOrder = BTreeMap<String, Vec<CallOrderEntry>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let mut order = CallOrder::new();
        order.insert(
            "vizhub_get_reader".to_string(),
            vec![
                CallOrderEntry::new("builtins", true),
                CallOrderEntry::new("tiff-reader", false),
            ],
        );

        let json = serde_json::to_string(&order).expect("serialize");
        let parsed: CallOrder = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, order);
    }

    #[test]
    fn test_json_shape_matches_settings_contract() {
        let mut order = CallOrder::new();
        order.insert(
            "spec".to_string(),
            vec![CallOrderEntry::new("plugin-a", true)],
        );

        let json = serde_json::to_value(&order).expect("serialize");
        assert_eq!(json["spec"][0]["plugin"], "plugin-a");
        assert_eq!(json["spec"][0]["enabled"], true);
    }
}
