//! Material Fact Builder
//!
//! Derives a `MaterialFact` from a catalogue record and the lifecycle tables.
//! `build` is a pure function of its inputs: the same record and tables always
//! produce the same fact (and byte-identical JSON).
//!
//! Score derivation:
//! - Curated profile when one exists for the id
//! - Otherwise the default profile, with the carbon-intensity multiplier
//!   applied to raw materials and manufacturing only
//! - Every impact is rounded and clamped to 1-5 here, not at draw time

use std::cmp::Reverse;

use rayon::prelude::*;
use regex::{Regex, RegexBuilder};

use crate::error::{DataError, FactError, LifecycleError};
use crate::facts::text_tables::{self, MaterialFunction, ACTION_RULES, GENERIC_ACTIONS};
use crate::facts::types::*;
use crate::lifecycle::data::LifecycleData;
use crate::lifecycle::resolver::{format_carbon_payback, LifecycleResolver, RuleMatch};
use crate::lifecycle::types::*;

/// Profile used when no curated profile exists (before the carbon multiplier).
pub const DEFAULT_PROFILE: LifecycleProfile =
    LifecycleProfile::uniform([3, 3, 2, 2, 1, 2, 2], Confidence::Medium);

/// Stages the carbon-intensity multiplier applies to.
const CARBON_ADJUSTED_STAGES: [Stage; 2] = [Stage::Raw, Stage::Manufacturing];

const MAX_ACTIONS: usize = 3;
const MAX_TYPICAL_USES: usize = 3;

/// Compiled text patterns used during derivation.
struct TextPatterns {
    sentence: Regex,
    parenthetical: Regex,
    hex_colour: Regex,
    repeated_separators: Regex,
    whitespace: Regex,
    epd_mention: Regex,
    functions: Vec<(MaterialFunction, Regex)>,
    actions: Vec<Regex>, // aligned with ACTION_RULES
}

fn compile_ci(label: &str, pattern: &str) -> Result<Regex, DataError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| DataError::InvalidPattern {
            label: label.to_string(),
            source,
        })
}

impl TextPatterns {
    fn new() -> Result<Self, DataError> {
        let functions = MaterialFunction::PRIORITY
            .iter()
            .map(|f| Ok((*f, compile_ci("material function", f.pattern())?)))
            .collect::<Result<Vec<_>, DataError>>()?;

        let actions = ACTION_RULES
            .iter()
            .map(|rule| compile_ci(rule.action, rule.pattern))
            .collect::<Result<Vec<_>, DataError>>()?;

        Ok(Self {
            sentence: compile_ci("sentence", r"[^.!?]+[.!?]+|[^.!?]+$")?,
            parenthetical: compile_ci("parenthetical", r"\([^)]*\)")?,
            hex_colour: compile_ci("hex colour", r"#[0-9a-f]{3,8}\b")?,
            repeated_separators: compile_ci("separators", r"([,·/|–-])(?:\s*[,·/|–-])+")?,
            whitespace: compile_ci("whitespace", r"\s+")?,
            epd_mention: compile_ci("epd", r"\bepds?\b|environmental product declaration")?,
            functions,
            actions,
        })
    }
}

/// Builds facts for one set of lifecycle tables and one building life.
pub struct FactBuilder<'a> {
    data: &'a LifecycleData,
    resolver: LifecycleResolver<'a>,
    building_life: u32,
    patterns: TextPatterns,
}

impl<'a> FactBuilder<'a> {
    pub fn new(data: &'a LifecycleData, building_life: u32) -> Result<Self, FactError> {
        if building_life == 0 {
            return Err(LifecycleError::InvalidBuildingLife.into());
        }
        Ok(Self {
            data,
            resolver: LifecycleResolver::new(data),
            building_life,
            patterns: TextPatterns::new()?,
        })
    }

    /// Override the maintenance factor used for landscape elements.
    pub fn with_landscape_factor(mut self, factor: f64) -> Self {
        self.resolver = LifecycleResolver::new(self.data).with_landscape_factor(factor);
        self
    }

    pub fn resolver(&self) -> &LifecycleResolver<'a> {
        &self.resolver
    }

    /// Derive the fact for one material.
    pub fn build(&self, material: &MaterialRecord) -> MaterialFact {
        let profile = self.derive_profile(material);
        let scores = profile.impacts();
        let confidences = profile.confidences();
        let (hotspots, strengths) = rank_stages(&scores);

        let (duration, matched) = self.resolver.resolve_traced(material);
        let carbon_payback_label = duration.carbon_payback.as_ref().map(format_carbon_payback);
        // building_life was validated in new()
        let replacements = self
            .resolver
            .lifecycle_multiplier(material, self.building_life)
            .unwrap_or(1.0);

        let description = material
            .custom_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&material.description)
            .trim()
            .to_string();

        MaterialFact {
            id: material.id.clone(),
            name: material.name.clone(),
            category: material.category,
            category_label: material.category.label().to_string(),
            image: material.image.clone(),
            system_role: SystemRole::for_category(material.category),
            form_variant: self.form_variant(material.finish.as_deref()),
            what_it_is: self.what_it_is(&description, &material.name),
            description,
            typical_uses: text_tables::typical_uses(material.category)
                .iter()
                .take(MAX_TYPICAL_USES)
                .map(|u| u.to_string())
                .collect(),
            performance_note: self.performance_note(material),
            lifecycle: LifecycleSummary {
                scores,
                confidences,
                hotspots,
                strengths,
            },
            carbon_intensity: material.carbon_intensity,
            insight: self.insight(material, hotspots, strengths),
            actions: self.actions(material),
            data_confidence: DataConfidence::from_confidences(&confidences),
            epd_status: self.epd_status(material, &matched),
            health: self.data.health(&material.id).cloned(),
            risks: self.data.risks(&material.id).to_vec(),
            service_life: self.resolver.service_life(material),
            duration,
            carbon_payback_label,
            replacements,
            is_landscape: self.resolver.is_landscape(material),
        }
    }

    /// Build facts for many materials in parallel, preserving input order.
    pub fn build_all(&self, materials: &[MaterialRecord]) -> Vec<MaterialFact> {
        let facts: Vec<MaterialFact> = materials.par_iter().map(|m| self.build(m)).collect();
        tracing::info!("Built {} material facts", facts.len());
        facts
    }

    // ------------------------------------------------------------------------
    // Scores
    // ------------------------------------------------------------------------

    fn derive_profile(&self, material: &MaterialRecord) -> LifecycleProfile {
        if let Some(curated) = self.data.profile(&material.id) {
            let mut profile = *curated;
            for stage in Stage::ALL {
                let score = profile.get_mut(stage);
                score.impact = clamp_impact(score.impact as f64);
            }
            return profile;
        }

        let multiplier = material
            .carbon_intensity
            .map(|c| c.score_multiplier())
            .unwrap_or(1.0);

        let mut profile = DEFAULT_PROFILE;
        for stage in CARBON_ADJUSTED_STAGES {
            let score = profile.get_mut(stage);
            score.impact = clamp_impact(score.impact as f64 * multiplier);
        }
        profile
    }

    // ------------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------------

    fn what_it_is(&self, description: &str, name: &str) -> String {
        self.patterns
            .sentence
            .find(description)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    }

    fn form_variant(&self, finish: Option<&str>) -> String {
        let Some(finish) = finish else {
            return "Standard".to_string();
        };

        let cleaned = self.patterns.parenthetical.replace_all(finish, " ");
        let cleaned = self.patterns.hex_colour.replace_all(&cleaned, " ");
        let cleaned = self.patterns.repeated_separators.replace_all(&cleaned, "$1");
        let cleaned = self.patterns.whitespace.replace_all(&cleaned, " ");
        let cleaned = cleaned
            .replace(" ,", ",")
            .trim_matches(|c: char| c.is_whitespace() || ",·/|–-".contains(c))
            .to_string();

        if cleaned.is_empty() {
            "Standard".to_string()
        } else {
            cleaned
        }
    }

    fn search_text(material: &MaterialRecord) -> String {
        format!(
            "{} {} {}",
            material.haystack(),
            material.keywords.join(" "),
            material.tags.join(" ")
        )
    }

    fn performance_note(&self, material: &MaterialRecord) -> String {
        if let Some(note) = text_tables::category_performance_note(material.category) {
            return note.to_string();
        }

        let text = Self::search_text(material);
        self.patterns
            .functions
            .iter()
            .find(|(_, pattern)| pattern.is_match(&text))
            .map(|(function, _)| function.performance_note())
            .unwrap_or(text_tables::GENERIC_PERFORMANCE_NOTE)
            .to_string()
    }

    fn insight(&self, material: &MaterialRecord, hotspots: [Stage; 2], strengths: [Stage; 2]) -> String {
        if let Some(curated) = self.data.insight(&material.id) {
            return curated.to_string();
        }

        format!(
            "Hotspots: {}, {}. Strengths: {}, {}. Main hotspot is {}; reduce via {}.",
            hotspots[0].label(),
            hotspots[1].label(),
            strengths[0].label(),
            strengths[1].label(),
            hotspots[0].label(),
            text_tables::stage_reduction_phrase(hotspots[0]),
        )
    }

    fn actions(&self, material: &MaterialRecord) -> Vec<String> {
        if let Some(curated) = self.data.spec_actions(&material.id) {
            return curated.iter().take(MAX_ACTIONS).cloned().collect();
        }

        let text = Self::search_text(material);
        let mut actions: Vec<String> = Vec::with_capacity(MAX_ACTIONS);

        for (rule, pattern) in ACTION_RULES.iter().zip(&self.patterns.actions) {
            let fires = rule.categories.contains(&material.category) || pattern.is_match(&text);
            if fires && !actions.iter().any(|a| a == rule.action) {
                actions.push(rule.action.to_string());
            }
        }

        for generic in GENERIC_ACTIONS {
            if actions.len() >= MAX_ACTIONS {
                break;
            }
            if !actions.iter().any(|a| a == generic) {
                actions.push(generic.to_string());
            }
        }

        actions.truncate(MAX_ACTIONS);
        actions
    }

    fn epd_status(&self, material: &MaterialRecord, matched: &RuleMatch) -> EpdStatus {
        if let Some(status) = self.data.epd_status(&material.id) {
            return status;
        }

        let mentions_epd = material
            .keywords
            .iter()
            .chain(&material.tags)
            .any(|k| self.patterns.epd_mention.is_match(k));

        if mentions_epd {
            EpdStatus::Available
        } else if matches!(matched, RuleMatch::CategoryDefault(_)) {
            EpdStatus::Generic
        } else {
            EpdStatus::Unknown
        }
    }
}

/// Round half away from zero and clamp into 1-5.
pub fn clamp_impact(value: f64) -> u8 {
    value.round().clamp(1.0, 5.0) as u8
}

/// Two highest and two lowest of all seven stages. Ties resolve in canonical
/// stage order, so a flat profile can list the same stage in both.
pub fn rank_stages(scores: &[u8; 7]) -> ([Stage; 2], [Stage; 2]) {
    let mut by_impact = Stage::ALL;
    by_impact.sort_by_key(|s| (Reverse(scores[s.index()]), s.index()));

    let mut by_strength = Stage::ALL;
    by_strength.sort_by_key(|s| (scores[s.index()], s.index()));

    ([by_impact[0], by_impact[1]], [by_strength[0], by_strength[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> LifecycleData {
        LifecycleData::builtin().unwrap()
    }

    fn steel_frame() -> MaterialRecord {
        MaterialRecord::new(
            "steel-frame",
            "Steel frame",
            "Hot-rolled steel sections. Bolted connections.",
            MaterialCategory::Structure,
        )
        .with_carbon(CarbonIntensity::High)
    }

    #[test]
    fn test_steel_frame_end_to_end() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let fact = builder.build(&steel_frame());

        assert_eq!(fact.lifecycle.scores, [4, 4, 2, 2, 1, 2, 2]);
        assert_eq!(fact.lifecycle.hotspots, [Stage::Raw, Stage::Manufacturing]);
        assert_eq!(fact.lifecycle.strengths, [Stage::InUse, Stage::Transport]);
        assert_eq!(fact.data_confidence, DataConfidence::Medium);
        assert_eq!(fact.epd_status, EpdStatus::Generic);
        assert_eq!(fact.what_it_is, "Hot-rolled steel sections.");
        assert_eq!(fact.system_role, SystemRole::Structure);
        assert_eq!(fact.replacements, 1.0);
        assert_eq!(
            fact.insight,
            "Hotspots: Raw materials, Manufacturing. Strengths: In use, Transport. \
             Main hotspot is Raw materials; reduce via lower-carbon or recycled feedstock."
        );
        assert_eq!(fact.actions.len(), 3);
        assert!(fact.actions[0].contains("recycled content"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let first = serde_json::to_string(&builder.build(&steel_frame())).unwrap();
        let second = serde_json::to_string(&builder.build(&steel_frame())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_low_carbon_multiplier() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let earth = MaterialRecord::new("rammed-earth", "Rammed earth wall", "", MaterialCategory::WallInternal)
            .with_carbon(CarbonIntensity::Low);
        let fact = builder.build(&earth);
        // 3 x 0.7 = 2.1 -> 2
        assert_eq!(fact.lifecycle.score(Stage::Raw), 2);
        assert_eq!(fact.lifecycle.score(Stage::Manufacturing), 2);
    }

    #[test]
    fn test_curated_profile_used() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let clt = MaterialRecord::new("clt-panel", "CLT panel", "", MaterialCategory::Structure)
            .with_carbon(CarbonIntensity::High);
        let fact = builder.build(&clt);

        // multiplier does not touch curated profiles
        assert_eq!(fact.lifecycle.scores, [1, 2, 2, 2, 1, 1, 2]);
        assert_eq!(fact.lifecycle.hotspots, [Stage::Manufacturing, Stage::Transport]);
        assert_eq!(fact.lifecycle.strengths, [Stage::Raw, Stage::InUse]);
        assert_eq!(fact.epd_status, EpdStatus::Available);
        assert_eq!(fact.actions.len(), 3);
        assert_eq!(fact.risks.len(), 2);
        assert_eq!(
            fact.carbon_payback_label.as_deref(),
            Some("Immediate (carbon stored in the material)")
        );
    }

    #[test]
    fn test_curated_profile_clamped() {
        let json = r#"{
            "profiles": {"odd": {
                "raw": {"impact": 5, "confidence": "high"},
                "manufacturing": {"impact": 5, "confidence": "high"},
                "transport": {"impact": 1, "confidence": "high"},
                "installation": {"impact": 1, "confidence": "high"},
                "inUse": {"impact": 1, "confidence": "high"},
                "maintenance": {"impact": 1, "confidence": "high"},
                "endOfLife": {"impact": 1, "confidence": "high"}
            }}
        }"#;
        let data = LifecycleData::from_json_str(json).unwrap();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let fact = builder.build(&MaterialRecord::new("odd", "Odd", "", MaterialCategory::Fixture));
        assert!(fact.lifecycle.scores.iter().all(|s| (1..=5).contains(s)));
        assert_eq!(fact.data_confidence, DataConfidence::High);
    }

    #[test]
    fn test_rank_stages_disjoint_and_tie_break() {
        let (hot, strong) = rank_stages(&[2, 5, 3, 1, 4, 2, 3]);
        assert_eq!(hot, [Stage::Manufacturing, Stage::InUse]);
        assert_eq!(strong, [Stage::Installation, Stage::Raw]);
        assert!(strong.iter().all(|s| !hot.contains(s)));

        // all equal: canonical order decides both ends
        let (hot, strong) = rank_stages(&[3; 7]);
        assert_eq!(hot, [Stage::Raw, Stage::Manufacturing]);
        assert_eq!(strong, [Stage::Raw, Stage::Manufacturing]);
    }

    #[test]
    fn test_rank_stages_ranks_all_stages_for_flat_templates() {
        use crate::lifecycle::MaterialType;

        let earth = MaterialType::Earth.template().impacts();
        assert_eq!(earth, [1, 1, 1, 2, 1, 1, 1]);
        let (hot, strong) = rank_stages(&earth);
        assert_eq!(hot, [Stage::Installation, Stage::Raw]);
        assert_eq!(strong, [Stage::Raw, Stage::Manufacturing]);

        // repeated calls agree
        assert_eq!(rank_stages(&earth), (hot, strong));
    }

    #[test]
    fn test_form_variant_cleaning() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        assert_eq!(builder.form_variant(Some("Natural oak (matt) #C8A165")), "Natural oak");
        assert_eq!(builder.form_variant(Some("Sage green · #9CAF88")), "Sage green");
        assert_eq!(builder.form_variant(Some("(custom)")), "Standard");
        assert_eq!(builder.form_variant(None), "Standard");
    }

    #[test]
    fn test_what_it_is_falls_back_to_name() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        assert_eq!(builder.what_it_is("", "Cork tile"), "Cork tile");
        assert_eq!(builder.what_it_is("No full stop here", "x"), "No full stop here");
        assert_eq!(builder.what_it_is("Is it good? Yes.", "x"), "Is it good?");
    }

    #[test]
    fn test_action_rules_fire_once_each() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let mut window = MaterialRecord::new(
            "alu-clad-window",
            "Aluminium-clad timber window",
            "Timber frame with aluminium cladding and glass units.",
            MaterialCategory::Window,
        );
        window.keywords = vec!["glazing".to_string()];
        let actions = builder.build(&window).actions;

        assert_eq!(actions.len(), 3);
        assert!(actions[0].contains("recycled content"));
        assert!(actions[1].contains("FSC"));
        assert!(actions[2].contains("U-value"));
    }

    #[test]
    fn test_epd_keyword_marks_available() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let mut tile = MaterialRecord::new("porcelain", "Porcelain tile", "", MaterialCategory::Tile);
        tile.tags = vec!["EPD".to_string()];
        assert_eq!(builder.build(&tile).epd_status, EpdStatus::Available);

        // matched an override, no curated status, no mention
        let carpet = MaterialRecord::new("loop-pile", "Loop pile carpet", "", MaterialCategory::Floor);
        assert_eq!(builder.build(&carpet).epd_status, EpdStatus::Unknown);
    }

    #[test]
    fn test_performance_note_priority() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        // wall-internal has no category note; acoustic outranks decorative
        let panel = MaterialRecord::new(
            "felt",
            "Felt wall lining",
            "Decorative acoustic felt in feature colours.",
            MaterialCategory::WallInternal,
        );
        assert_eq!(
            builder.build(&panel).performance_note,
            MaterialFunction::Acoustic.performance_note()
        );
    }

    #[test]
    fn test_build_all_preserves_order() {
        let data = builtin();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let materials: Vec<MaterialRecord> = (0..40)
            .map(|i| MaterialRecord::new(&format!("m{}", i), "Board", "", MaterialCategory::Joinery))
            .collect();
        let ids: Vec<String> = builder.build_all(&materials).into_iter().map(|f| f.id).collect();
        let expected: Vec<String> = (0..40).map(|i| format!("m{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_zero_building_life_rejected() {
        let data = builtin();
        assert!(FactBuilder::new(&data, 0).is_err());
    }
}
