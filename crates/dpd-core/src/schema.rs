//! JSON Schema generation for configuration file types.
//!
//! ```bash
//! dpd schema --list
//! dpd schema SimulationScenario
//! dpd schema --all
//! ```

use dpd_config::{
    AnalysisConfig, Config, EpsilonGrid, PrivacyBoundConfig, RuleSet, SimulationScenario,
};
use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Config", "Complete configuration file"),
        ("AnalysisConfig", "Target means, dataset columns and PDF resolution"),
        ("SimulationScenario", "Beta prior, ε grid, N grid and named rules"),
        ("RuleSet", "Named single-threshold or band rules"),
        ("EpsilonGrid", "Explicit privacy budgets or powers of a base"),
        ("PrivacyBoundConfig", "Two-location Laplace illustration settings"),
    ]
}

/// Generate the JSON Schema for a type by name, or None if it is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "Config" => schema_for!(Config),
        "AnalysisConfig" => schema_for!(AnalysisConfig),
        "SimulationScenario" => schema_for!(SimulationScenario),
        "RuleSet" => schema_for!(RuleSet),
        "EpsilonGrid" => schema_for!(EpsilonGrid),
        "PrivacyBoundConfig" => schema_for!(PrivacyBoundConfig),
        _ => return None,
    };
    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            assert!(generate_schema(name).is_some(), "schema for '{}' should generate", name);
        }
        assert_eq!(generate_all_schemas().len(), available_schemas().len());
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("Plan").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_config_schema_lists_sections() {
        let schema = generate_schema("Config").unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for key in ["schema_version", "analysis", "simulation", "privacy_bound"] {
            assert!(properties.contains_key(key), "missing property {}", key);
        }
    }
}
