//! Lifecycle Resolver
//!
//! Resolves a material to its lifecycle duration, decides whether it is a
//! landscape element, and derives the replacement multiplier and carbon
//! payback label used on the sheet.
//!
//! Resolution policy is FIRST MATCH WINS over the ordered override list,
//! falling back to the category default. It is not a best-match search.

use std::fmt;

use crate::error::LifecycleError;
use crate::lifecycle::data::LifecycleData;
use crate::lifecycle::types::*;

/// Building life assumed when none is configured (years).
pub const DEFAULT_BUILDING_LIFE: u32 = 60;

/// Landscape elements are maintained, not replaced, so the multiplier is
/// independent of building life.
pub const LANDSCAPE_MAINTENANCE_FACTOR: f64 = 1.0;

/// Which rule produced a resolved duration.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleMatch {
    Override { index: usize, label: String },
    CategoryDefault(MaterialCategory),
}

impl fmt::Display for RuleMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMatch::Override { index, label } => write!(f, "override #{} ({})", index, label),
            RuleMatch::CategoryDefault(category) => write!(f, "category default ({})", category),
        }
    }
}

/// Borrowing resolver over a `LifecycleData` instance.
pub struct LifecycleResolver<'a> {
    data: &'a LifecycleData,
    landscape_factor: f64,
}

impl<'a> LifecycleResolver<'a> {
    pub fn new(data: &'a LifecycleData) -> Self {
        Self {
            data,
            landscape_factor: LANDSCAPE_MAINTENANCE_FACTOR,
        }
    }

    pub fn with_landscape_factor(mut self, factor: f64) -> Self {
        self.landscape_factor = factor;
        self
    }

    pub fn data(&self) -> &'a LifecycleData {
        self.data
    }

    /// Resolve the lifecycle duration for a material.
    pub fn resolve(&self, material: &MaterialRecord) -> LifecycleDuration {
        self.resolve_traced(material).0
    }

    /// Resolve and report which rule matched.
    pub fn resolve_traced(&self, material: &MaterialRecord) -> (LifecycleDuration, RuleMatch) {
        let haystack = material.haystack();

        for (index, rule) in self.data.overrides().iter().enumerate() {
            if rule.matches(material.category, &haystack) {
                tracing::debug!("{}: matched override #{} '{}'", material.id, index, rule.label);
                return (
                    rule.duration.clone(),
                    RuleMatch::Override {
                        index,
                        label: rule.label.clone(),
                    },
                );
            }
        }

        tracing::debug!("{}: using {} category default", material.id, material.category);
        // validate() guarantees total coverage; the fallback only guards hand-built data
        let duration = self
            .data
            .category_default(material.category)
            .cloned()
            .unwrap_or_else(|| LifecycleDuration::new(DEFAULT_BUILDING_LIFE, DEFAULT_BUILDING_LIFE));
        (duration, RuleMatch::CategoryDefault(material.category))
    }

    /// Explicit id set, landscape category, or a planting keyword in the text.
    pub fn is_landscape(&self, material: &MaterialRecord) -> bool {
        self.data.is_landscape_id(&material.id)
            || material.category == MaterialCategory::Landscape
            || self.data.landscape_pattern().is_match(&material.haystack())
    }

    /// Number of times the material is installed over `building_life` years.
    ///
    /// Full replacement: `ceil(building_life / replacement_cycle)`.
    /// Partial replacement: the same count scaled by the partial factor,
    /// rounded to one decimal and floored at 1.0 (the initial install).
    pub fn lifecycle_multiplier(
        &self,
        material: &MaterialRecord,
        building_life: u32,
    ) -> Result<f64, LifecycleError> {
        if building_life == 0 {
            return Err(LifecycleError::InvalidBuildingLife);
        }
        if self.is_landscape(material) {
            return Ok(self.landscape_factor);
        }

        let duration = self.resolve(material);
        let cycles = (building_life as f64 / duration.replacement_cycle as f64).ceil();

        match (duration.replacement_scope, duration.partial_replacement_factor) {
            (Some(ReplacementScope::Partial), Some(factor)) => {
                let scaled = (cycles * factor * 10.0).round() / 10.0;
                Ok(scaled.max(1.0))
            }
            _ => Ok(cycles),
        }
    }

    /// Expected service life from the service-life tables, if known.
    pub fn service_life(&self, material: &MaterialRecord) -> Option<u32> {
        let haystack = material.haystack();
        self.data
            .service_life_rules()
            .iter()
            .find(|rule| rule.pattern.is_match(&haystack))
            .map(|rule| rule.years)
            .or_else(|| self.data.category_service_life(material.category))
    }
}

/// Human-readable payback label.
pub fn format_carbon_payback(payback: &CarbonPayback) -> String {
    if payback.years == 0 {
        let immediate = match payback.category {
            PaybackCategory::BiogenicStorage => "carbon stored in the material",
            PaybackCategory::OperationalOffset => "offsets from first year in use",
            PaybackCategory::EcosystemSequestration => "sequestration starts at planting",
        };
        return format!("Immediate ({})", immediate);
    }

    match payback.range_years {
        Some([lo, hi]) => format!("~{}-{} years ({})", lo, hi, payback.category.label()),
        None => format!("~{} years ({})", payback.years, payback.category.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn builtin() -> LifecycleData {
        LifecycleData::builtin().unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let json = r#"{
            "durationOverrides": [
                {"label": "wrong category", "pattern": "oak", "flags": "i",
                 "categories": ["roof"],
                 "duration": {"serviceLife": 5, "replacementCycle": 5}},
                {"label": "first", "pattern": "oak", "flags": "i",
                 "duration": {"serviceLife": 11, "replacementCycle": 11}},
                {"label": "second", "pattern": "oak board", "flags": "i",
                 "duration": {"serviceLife": 22, "replacementCycle": 22}}
            ]
        }"#;
        let data = LifecycleData::from_json_str(json).unwrap();
        let resolver = LifecycleResolver::new(&data);
        let oak = MaterialRecord::new("oak-board", "Oak board", "", MaterialCategory::Floor);

        let (duration, matched) = resolver.resolve_traced(&oak);
        assert_eq!(duration.service_life, 11);
        assert_eq!(
            matched,
            RuleMatch::Override { index: 1, label: "first".to_string() }
        );
    }

    #[test]
    fn test_category_default_fallback() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        let paint = MaterialRecord::new("eggshell", "Eggshell emulsion", "", MaterialCategory::PaintWall);

        let (duration, matched) = resolver.resolve_traced(&paint);
        assert_eq!(matched, RuleMatch::CategoryDefault(MaterialCategory::PaintWall));
        assert_eq!(duration.replacement_cycle, 8);
    }

    #[test]
    fn test_category_filter_respected() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        // CLT rule is limited to structural categories
        let clt_floor = MaterialRecord::new("clt-floor", "CLT floor", "", MaterialCategory::Floor);
        let (_, matched) = resolver.resolve_traced(&clt_floor);
        assert_eq!(matched, RuleMatch::CategoryDefault(MaterialCategory::Floor));

        let clt = MaterialRecord::new("clt-panel", "CLT panel", "", MaterialCategory::Structure);
        let (duration, matched) = resolver.resolve_traced(&clt);
        assert!(matches!(matched, RuleMatch::Override { index: 0, .. }));
        assert_eq!(duration.carbon_payback.unwrap().years, 0);
    }

    #[test]
    fn test_landscape_detection() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);

        let by_id = MaterialRecord::new("living-wall", "Modular wall", "", MaterialCategory::External);
        let by_category = MaterialRecord::new("x", "Gravel", "", MaterialCategory::Landscape);
        let by_text = MaterialRecord::new("y", "Native hedgerow", "", MaterialCategory::External);
        let not_landscape = MaterialRecord::new("z", "Brick slip", "", MaterialCategory::External);

        assert!(resolver.is_landscape(&by_id));
        assert!(resolver.is_landscape(&by_category));
        assert!(resolver.is_landscape(&by_text));
        assert!(!resolver.is_landscape(&not_landscape));
    }

    #[test]
    fn test_landscape_multiplier_ignores_building_life() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        let by_category = MaterialRecord::new("wildflower-meadow", "Wildflower meadow", "", MaterialCategory::Landscape);
        let by_id = MaterialRecord::new("living-wall", "Modular wall", "", MaterialCategory::External);
        let by_text = MaterialRecord::new("boundary", "Native hedgerow", "", MaterialCategory::External);

        for material in [&by_category, &by_id, &by_text] {
            let short = resolver.lifecycle_multiplier(material, 30).unwrap();
            let long = resolver.lifecycle_multiplier(material, 90).unwrap();
            assert_relative_eq!(short, LANDSCAPE_MAINTENANCE_FACTOR);
            assert_relative_eq!(long, LANDSCAPE_MAINTENANCE_FACTOR);
        }

        // floor default cycle 25: 30 -> 2 installs, 90 -> 4
        let floor = MaterialRecord::new("rubber", "Rubber sheet", "", MaterialCategory::Floor);
        assert_relative_eq!(resolver.lifecycle_multiplier(&floor, 30).unwrap(), 2.0);
        assert_relative_eq!(resolver.lifecycle_multiplier(&floor, 90).unwrap(), 4.0);
    }

    #[test]
    fn test_full_replacement_multiplier() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        // floor default cycle 25: 60 / 25 = 2.4 -> 3
        let floor = MaterialRecord::new("rubber", "Rubber sheet", "", MaterialCategory::Floor);
        assert_relative_eq!(resolver.lifecycle_multiplier(&floor, 60).unwrap(), 3.0);
        // paint cycle 8: 60 / 8 = 7.5 -> 8
        let paint = MaterialRecord::new("eggshell", "Eggshell", "", MaterialCategory::PaintWall);
        assert_relative_eq!(resolver.lifecycle_multiplier(&paint, 60).unwrap(), 8.0);
    }

    #[test]
    fn test_partial_replacement_multiplier() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        let plaster = MaterialRecord::new("gypsum", "Gypsum skim", "", MaterialCategory::Plaster);

        // ceil(60 / 40) = 2, x 0.3 = 0.6 -> floored to 1.0
        assert_relative_eq!(resolver.lifecycle_multiplier(&plaster, 60).unwrap(), 1.0);
        // ceil(200 / 40) = 5, x 0.3 = 1.5
        assert_relative_eq!(resolver.lifecycle_multiplier(&plaster, 200).unwrap(), 1.5);
    }

    #[test]
    fn test_zero_building_life_rejected() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);
        let floor = MaterialRecord::new("rubber", "Rubber sheet", "", MaterialCategory::Floor);
        assert_eq!(
            resolver.lifecycle_multiplier(&floor, 0),
            Err(LifecycleError::InvalidBuildingLife)
        );
    }

    #[test]
    fn test_format_carbon_payback() {
        let immediate = CarbonPayback {
            years: 0,
            range_years: None,
            category: PaybackCategory::BiogenicStorage,
            assumption: String::new(),
        };
        assert_eq!(
            format_carbon_payback(&immediate),
            "Immediate (carbon stored in the material)"
        );

        let ranged = CarbonPayback {
            years: 4,
            range_years: Some([3, 6]),
            category: PaybackCategory::OperationalOffset,
            assumption: String::new(),
        };
        assert_eq!(format_carbon_payback(&ranged), "~3-6 years (operational offset)");

        let single = CarbonPayback { range_years: None, ..ranged };
        assert_eq!(format_carbon_payback(&single), "~4 years (operational offset)");
    }

    #[test]
    fn test_service_life_lookup() {
        let data = builtin();
        let resolver = LifecycleResolver::new(&data);

        let brick = MaterialRecord::new("brick-slip", "Reclaimed brick", "", MaterialCategory::External);
        assert_eq!(resolver.service_life(&brick), Some(100));

        let panel = MaterialRecord::new("panel", "Ash veneer", "", MaterialCategory::TimberPanel);
        assert_eq!(resolver.service_life(&panel), None);

        let window = MaterialRecord::new("win", "Timber window", "", MaterialCategory::Window);
        assert_eq!(resolver.service_life(&window), Some(30));
    }
}
