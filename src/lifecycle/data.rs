//! Lifecycle Data Store
//!
//! Read-only lookup tables consumed by the resolver and the fact builder:
//! category defaults, ordered duration overrides, curated profiles, spec
//! actions, health notes, risk lists, insights, EPD status and service-life
//! rules.
//!
//! `LifecycleData` is built once (from the builtin tables, optionally merged
//! with a JSON data file) and passed by reference. Every pattern is compiled
//! and every duration invariant checked at construction, so a bad table fails
//! at startup instead of at first render.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::lifecycle::tables;
use crate::lifecycle::types::*;

/// Compiled duration override. Matching is against `MaterialRecord::haystack()`.
#[derive(Debug, Clone)]
pub struct DurationRule {
    pub label: String,
    pub pattern: Regex,
    pub categories: Option<FxHashSet<MaterialCategory>>,
    pub duration: LifecycleDuration,
}

impl DurationRule {
    pub fn matches(&self, category: MaterialCategory, haystack: &str) -> bool {
        let category_ok = self
            .categories
            .as_ref()
            .map(|set| set.contains(&category))
            .unwrap_or(true);
        category_ok && self.pattern.is_match(haystack)
    }
}

/// Compiled service-life override.
#[derive(Debug, Clone)]
pub struct ServiceLifeRule {
    pub label: String,
    pub pattern: Regex,
    pub years: u32,
}

// ============================================================================
// JSON data file shape
// ============================================================================

/// Serializable rule: regex source + flags ("i" = case insensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub label: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub categories: Option<Vec<MaterialCategory>>,
    pub duration: LifecycleDuration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLifeSpec {
    pub label: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
    pub years: u32,
}

/// Lifecycle data file. Every section is optional; entries are merged over
/// the builtin tables (file overrides are evaluated first).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifecycleDataFile {
    pub category_defaults: BTreeMap<MaterialCategory, LifecycleDuration>,
    pub duration_overrides: Vec<RuleSpec>,
    pub profiles: BTreeMap<String, LifecycleProfile>,
    pub spec_actions: BTreeMap<String, Vec<String>>,
    pub health: BTreeMap<String, HealthNote>,
    pub risks: BTreeMap<String, Vec<RiskItem>>,
    pub insights: BTreeMap<String, String>,
    pub epd_status: BTreeMap<String, EpdStatus>,
    pub service_life_overrides: Vec<ServiceLifeSpec>,
    pub category_service_life: BTreeMap<MaterialCategory, u32>,
    pub landscape_ids: Vec<String>,
}

// ============================================================================
// LifecycleData
// ============================================================================

/// Immutable lifecycle tables.
#[derive(Debug, Clone)]
pub struct LifecycleData {
    category_defaults: FxHashMap<MaterialCategory, LifecycleDuration>,
    overrides: Vec<DurationRule>,
    profiles: FxHashMap<String, LifecycleProfile>,
    spec_actions: FxHashMap<String, Vec<String>>,
    health: FxHashMap<String, HealthNote>,
    risks: FxHashMap<String, Vec<RiskItem>>,
    insights: FxHashMap<String, String>,
    epd_status: FxHashMap<String, EpdStatus>,
    service_life_rules: Vec<ServiceLifeRule>,
    category_service_life: FxHashMap<MaterialCategory, u32>,
    landscape_ids: FxHashSet<String>,
    landscape_pattern: Regex,
}

fn compile(label: &str, pattern: &str, flags: &str) -> Result<Regex, DataError> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .build()
        .map_err(|source| DataError::InvalidPattern {
            label: label.to_string(),
            source,
        })
}

fn duration_from_row(
    service_life: u32,
    replacement_cycle: u32,
    partial: Option<f64>,
    payback: Option<tables::PaybackRow>,
    notes: &str,
) -> LifecycleDuration {
    let mut duration = LifecycleDuration::new(service_life, replacement_cycle);
    if let Some(factor) = partial {
        duration = duration.partial(factor);
    }
    if let Some(p) = payback {
        duration = duration.with_payback(p.years, p.range, p.category, p.assumption);
    }
    if !notes.is_empty() {
        duration = duration.with_notes(notes);
    }
    duration
}

impl LifecycleData {
    /// Compile the embedded tables.
    pub fn builtin() -> Result<Self, DataError> {
        let category_defaults = tables::CATEGORY_DEFAULTS
            .iter()
            .map(|row| {
                let duration = duration_from_row(
                    row.service_life,
                    row.replacement_cycle,
                    row.partial,
                    None,
                    row.notes,
                );
                (row.category, duration)
            })
            .collect();

        let overrides = tables::DURATION_OVERRIDES
            .iter()
            .map(|row| {
                Ok(DurationRule {
                    label: row.label.to_string(),
                    pattern: compile(row.label, row.pattern, "i")?,
                    categories: if row.categories.is_empty() {
                        None
                    } else {
                        Some(row.categories.iter().copied().collect())
                    },
                    duration: duration_from_row(
                        row.service_life,
                        row.replacement_cycle,
                        row.partial,
                        row.payback,
                        row.notes,
                    ),
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let profiles = tables::PROFILES
            .iter()
            .map(|row| {
                let mut profile = LifecycleProfile::uniform(row.impacts, Confidence::High);
                for (stage, confidence) in Stage::ALL.iter().zip(row.confidences) {
                    profile.get_mut(*stage).confidence = confidence;
                }
                (row.id.to_string(), profile)
            })
            .collect();

        let spec_actions = tables::SPEC_ACTIONS
            .iter()
            .map(|(id, actions)| (id.to_string(), actions.iter().map(|a| a.to_string()).collect()))
            .collect();

        let health = tables::HEALTH_NOTES
            .iter()
            .map(|row| {
                let note = HealthNote {
                    risk_level: row.risk,
                    concerns: row.concerns.iter().map(|c| c.to_string()).collect(),
                    note: row.note.to_string(),
                };
                (row.id.to_string(), note)
            })
            .collect();

        let risks = tables::RISKS
            .iter()
            .map(|(id, items)| {
                let items = items
                    .iter()
                    .map(|(risk, mitigation)| RiskItem {
                        risk: risk.to_string(),
                        mitigation: mitigation.to_string(),
                    })
                    .collect();
                (id.to_string(), items)
            })
            .collect();

        let insights = tables::INSIGHTS
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect();

        let epd_status = tables::EPD_STATUS
            .iter()
            .map(|(id, status)| (id.to_string(), *status))
            .collect();

        let service_life_rules = tables::SERVICE_LIFE_OVERRIDES
            .iter()
            .map(|row| {
                Ok(ServiceLifeRule {
                    label: row.label.to_string(),
                    pattern: compile(row.label, row.pattern, "i")?,
                    years: row.years,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let data = Self {
            category_defaults,
            overrides,
            profiles,
            spec_actions,
            health,
            risks,
            insights,
            epd_status,
            service_life_rules,
            category_service_life: tables::CATEGORY_SERVICE_LIFE.iter().copied().collect(),
            landscape_ids: tables::LANDSCAPE_IDS.iter().map(|id| id.to_string()).collect(),
            landscape_pattern: compile("landscape", tables::LANDSCAPE_PATTERN, "")?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Builtin tables merged with a parsed data file.
    pub fn with_file(file: LifecycleDataFile) -> Result<Self, DataError> {
        let mut data = Self::builtin()?;

        data.category_defaults.extend(file.category_defaults);

        let mut overrides = file
            .duration_overrides
            .into_iter()
            .map(|spec| {
                Ok(DurationRule {
                    pattern: compile(&spec.label, &spec.pattern, &spec.flags)?,
                    categories: spec.categories.map(|c| c.into_iter().collect()),
                    label: spec.label,
                    duration: spec.duration,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;
        overrides.append(&mut data.overrides);
        data.overrides = overrides;

        let mut service_life_rules = file
            .service_life_overrides
            .into_iter()
            .map(|spec| {
                Ok(ServiceLifeRule {
                    pattern: compile(&spec.label, &spec.pattern, &spec.flags)?,
                    label: spec.label,
                    years: spec.years,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;
        service_life_rules.append(&mut data.service_life_rules);
        data.service_life_rules = service_life_rules;

        data.profiles.extend(file.profiles);
        data.spec_actions.extend(file.spec_actions);
        data.health.extend(file.health);
        data.risks.extend(file.risks);
        data.insights.extend(file.insights);
        data.epd_status.extend(file.epd_status);
        data.category_service_life.extend(file.category_service_life);
        data.landscape_ids.extend(file.landscape_ids);

        data.validate()?;
        Ok(data)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let file: LifecycleDataFile = serde_json::from_str(json)?;
        Self::with_file(file)
    }

    /// Load a lifecycle data file and merge it over the builtin tables.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lifecycle data file: {:?}", path))?;

        let data = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid lifecycle data in {:?}", path))?;

        tracing::info!(
            "Loaded lifecycle data ({} overrides, {} profiles)",
            data.overrides.len(),
            data.profiles.len()
        );
        Ok(data)
    }

    /// Check coverage and duration invariants.
    pub fn validate(&self) -> Result<(), DataError> {
        for category in MaterialCategory::ALL {
            let duration = self
                .category_defaults
                .get(&category)
                .ok_or(DataError::MissingCategoryDefault(category))?;
            duration.check().map_err(|reason| DataError::InvalidDuration {
                key: category.key().to_string(),
                reason,
            })?;
        }

        for rule in &self.overrides {
            rule.duration.check().map_err(|reason| DataError::InvalidDuration {
                key: rule.label.clone(),
                reason,
            })?;
        }

        for (id, profile) in &self.profiles {
            if let Some(stage) = Stage::ALL
                .iter()
                .find(|s| !(1..=5).contains(&profile.get(**s).impact))
            {
                return Err(DataError::InvalidDuration {
                    key: id.clone(),
                    reason: format!("{} impact outside 1-5", stage.label()),
                });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn category_default(&self, category: MaterialCategory) -> Option<&LifecycleDuration> {
        self.category_defaults.get(&category)
    }

    /// Overrides in evaluation order.
    pub fn overrides(&self) -> &[DurationRule] {
        &self.overrides
    }

    pub fn service_life_rules(&self) -> &[ServiceLifeRule] {
        &self.service_life_rules
    }

    pub fn category_service_life(&self, category: MaterialCategory) -> Option<u32> {
        self.category_service_life.get(&category).copied()
    }

    pub fn profile(&self, id: &str) -> Option<&LifecycleProfile> {
        self.profiles.get(id)
    }

    pub fn spec_actions(&self, id: &str) -> Option<&[String]> {
        self.spec_actions.get(id).map(|v| v.as_slice())
    }

    pub fn health(&self, id: &str) -> Option<&HealthNote> {
        self.health.get(id)
    }

    pub fn risks(&self, id: &str) -> &[RiskItem] {
        self.risks.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn insight(&self, id: &str) -> Option<&str> {
        self.insights.get(id).map(|s| s.as_str())
    }

    pub fn epd_status(&self, id: &str) -> Option<EpdStatus> {
        self.epd_status.get(id).copied()
    }

    pub fn is_landscape_id(&self, id: &str) -> bool {
        self.landscape_ids.contains(id)
    }

    pub fn landscape_pattern(&self) -> &Regex {
        &self.landscape_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_category() {
        let data = LifecycleData::builtin().unwrap();
        for category in MaterialCategory::ALL {
            let duration = data.category_default(category);
            assert!(duration.is_some(), "missing default for {}", category);
            assert!(duration.unwrap().replacement_cycle > 0);
        }
    }

    #[test]
    fn test_builtin_patterns_are_case_insensitive() {
        let data = LifecycleData::builtin().unwrap();
        let clt = &data.overrides()[0];
        assert!(clt.pattern.is_match("Exposed CLT soffit"));
    }

    #[test]
    fn test_invalid_pattern_fails_at_load() {
        let json = r#"{
            "durationOverrides": [{
                "label": "broken",
                "pattern": "(unclosed",
                "duration": {"serviceLife": 10, "replacementCycle": 10}
            }]
        }"#;
        match LifecycleData::from_json_str(json) {
            Err(DataError::InvalidPattern { label, .. }) => assert_eq!(label, "broken"),
            other => panic!("expected InvalidPattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_replacement_cycle_rejected() {
        let json = r#"{
            "categoryDefaults": {
                "floor": {"serviceLife": 10, "replacementCycle": 0}
            }
        }"#;
        assert!(matches!(
            LifecycleData::from_json_str(json),
            Err(DataError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_partial_without_factor_rejected() {
        let json = r#"{
            "durationOverrides": [{
                "label": "half",
                "pattern": "half",
                "duration": {"serviceLife": 10, "replacementCycle": 10, "replacementScope": "partial"}
            }]
        }"#;
        assert!(LifecycleData::from_json_str(json).is_err());
    }

    #[test]
    fn test_file_overrides_evaluated_before_builtin() {
        let json = r#"{
            "durationOverrides": [{
                "label": "site specific",
                "pattern": "clt",
                "flags": "i",
                "duration": {"serviceLife": 99, "replacementCycle": 99}
            }],
            "insights": {"clt-panel": "Replaced insight"}
        }"#;
        let data = LifecycleData::from_json_str(json).unwrap();
        assert_eq!(data.overrides()[0].label, "site specific");
        assert_eq!(data.overrides().len(), tables::DURATION_OVERRIDES.len() + 1);
        assert_eq!(data.insight("clt-panel"), Some("Replaced insight"));
    }

    #[test]
    fn test_profile_impact_range_checked() {
        let json = r#"{
            "profiles": {"bad": {
                "raw": {"impact": 7, "confidence": "high"},
                "manufacturing": {"impact": 2, "confidence": "high"},
                "transport": {"impact": 2, "confidence": "high"},
                "installation": {"impact": 2, "confidence": "high"},
                "inUse": {"impact": 1, "confidence": "high"},
                "maintenance": {"impact": 1, "confidence": "high"},
                "endOfLife": {"impact": 1, "confidence": "high"}
            }}
        }"#;
        assert!(LifecycleData::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_curated_data_is_empty_not_error() {
        let data = LifecycleData::builtin().unwrap();
        assert!(data.profile("no-such-material").is_none());
        assert!(data.risks("no-such-material").is_empty());
        assert!(data.spec_actions("no-such-material").is_none());
    }
}
