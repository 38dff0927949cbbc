//! Profile seeding
//!
//! Authoring aid that proposes a template lifecycle profile for catalogue
//! materials without a curated one. The material type is inferred from
//! keywords in name, description and keyword list; the first matching type
//! wins and concrete is the fallback.
//!
//! The fact builder never seeds implicitly: uncurated materials get the
//! carbon-adjusted default profile. Seeded profiles are meant to be reviewed
//! and written into a lifecycle data file.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::lifecycle::data::LifecycleData;
use crate::lifecycle::types::{Confidence, LifecycleProfile, MaterialRecord, StageScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Timber,
    Ceramic,
    Metal,
    Concrete,
    Glass,
    Plastic,
    Earth,
    Stone,
    Textile,
    Biobased,
    Paint,
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialType::Timber => "timber",
            MaterialType::Ceramic => "ceramic",
            MaterialType::Metal => "metal",
            MaterialType::Concrete => "concrete",
            MaterialType::Glass => "glass",
            MaterialType::Plastic => "plastic",
            MaterialType::Earth => "earth",
            MaterialType::Stone => "stone",
            MaterialType::Textile => "textile",
            MaterialType::Biobased => "biobased",
            MaterialType::Paint => "paint",
        };
        f.write_str(name)
    }
}

const H: Confidence = Confidence::High;
const M: Confidence = Confidence::Medium;
const L: Confidence = Confidence::Low;

const fn profile(impacts: [u8; 7], confidences: [Confidence; 7]) -> LifecycleProfile {
    LifecycleProfile {
        raw: StageScore::new(impacts[0], confidences[0]),
        manufacturing: StageScore::new(impacts[1], confidences[1]),
        transport: StageScore::new(impacts[2], confidences[2]),
        installation: StageScore::new(impacts[3], confidences[3]),
        in_use: StageScore::new(impacts[4], confidences[4]),
        maintenance: StageScore::new(impacts[5], confidences[5]),
        end_of_life: StageScore::new(impacts[6], confidences[6]),
    }
}

impl MaterialType {
    /// Template profile for this material type.
    pub fn template(&self) -> LifecycleProfile {
        match self {
            MaterialType::Timber => profile([1, 2, 2, 2, 1, 2, 1], [H, H, M, H, H, M, H]),
            MaterialType::Ceramic => profile([2, 5, 3, 2, 1, 1, 2], [H, H, M, H, H, H, M]),
            MaterialType::Metal => profile([5, 5, 3, 2, 1, 1, 1], [H, H, M, H, H, H, H]),
            MaterialType::Concrete => profile([3, 5, 3, 3, 1, 1, 3], [H, H, M, H, H, H, M]),
            MaterialType::Glass => profile([3, 4, 3, 2, 1, 1, 3], [H, H, M, H, H, H, M]),
            MaterialType::Plastic => profile([4, 4, 2, 1, 1, 1, 4], [H, H, M, H, H, H, L]),
            MaterialType::Earth => profile([1, 1, 1, 2, 1, 1, 1], [H, H, H, M, H, H, H]),
            MaterialType::Stone => profile([3, 3, 4, 2, 1, 1, 2], [H, H, M, H, H, H, M]),
            MaterialType::Textile => profile([2, 3, 2, 1, 1, 2, 2], [M, M, M, H, H, M, L]),
            MaterialType::Biobased => profile([1, 1, 2, 2, 1, 1, 1], [H, H, M, M, H, H, H]),
            MaterialType::Paint => profile([3, 3, 2, 2, 1, 2, 2], [M, M, M, M, H, M, L]),
        }
    }
}

/// Keyword classifier. Patterns are evaluated in order.
pub struct MaterialClassifier {
    rules: Vec<(MaterialType, Regex)>,
}

impl MaterialClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns: [(MaterialType, &str); 11] = [
            (MaterialType::Timber, r"timber|wood|oak|bamboo|larch|cedar|plywood"),
            (MaterialType::Metal, r"steel|aluminum|aluminium|metal|brass|copper|zinc"),
            (MaterialType::Concrete, r"concrete|cement|microcement"),
            (MaterialType::Glass, r"glass|glazing"),
            (MaterialType::Ceramic, r"ceramic|terracotta|porcelain|clay|brick|tile"),
            (MaterialType::Plastic, r"plastic|vinyl|upvc|composite|grp|pet|epoxy|resin"),
            (MaterialType::Biobased, r"hemp|cork|mycelium|bio-based|biobased|wool|felt"),
            (MaterialType::Earth, r"earth|rammed|lime|plaster|render"),
            (MaterialType::Stone, r"stone|marble|granite|slate|travertine"),
            (MaterialType::Textile, r"fabric|textile|carpet|leather|upholster"),
            (MaterialType::Paint, r"paint|emulsion"),
        ];

        let rules = patterns
            .iter()
            .map(|(kind, pattern)| Ok((*kind, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn classify(&self, name: &str, description: &str, keywords: &[String]) -> MaterialType {
        let text = format!("{} {} {}", name, description, keywords.join(" ")).to_lowercase();
        self.rules
            .iter()
            .find(|(_, pattern)| pattern.is_match(&text))
            .map(|(kind, _)| *kind)
            .unwrap_or(MaterialType::Concrete)
    }
}

/// One-shot classification. Builds the classifier each call; use
/// `MaterialClassifier` directly when classifying many materials.
pub fn classify_material_type(name: &str, description: &str, keywords: &[String]) -> MaterialType {
    match MaterialClassifier::new() {
        Ok(classifier) => classifier.classify(name, description, keywords),
        Err(_) => MaterialType::Concrete,
    }
}

/// Proposed profile for a material lacking a curated one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededProfile {
    pub material_type: MaterialType,
    pub profile: LifecycleProfile,
}

/// Template profiles for every material without a curated profile, keyed by id.
pub fn seed_missing_profiles(
    data: &LifecycleData,
    materials: &[MaterialRecord],
) -> Result<BTreeMap<String, SeededProfile>, regex::Error> {
    let classifier = MaterialClassifier::new()?;

    let seeded: BTreeMap<String, SeededProfile> = materials
        .iter()
        .filter(|m| data.profile(&m.id).is_none())
        .map(|m| {
            let material_type = classifier.classify(&m.name, &m.description, &m.keywords);
            let seeded = SeededProfile {
                material_type,
                profile: material_type.template(),
            };
            (m.id.clone(), seeded)
        })
        .collect();

    tracing::info!(
        "Seeded {} profiles ({} materials already curated)",
        seeded.len(),
        materials.len() - seeded.len()
    );
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::types::MaterialCategory;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_classification_order() {
        // timber is checked before metal
        assert_eq!(
            classify_material_type("Oak and steel stair", "", &[]),
            MaterialType::Timber
        );
        // metal is checked before concrete
        assert_eq!(
            classify_material_type("Zinc over concrete", "", &[]),
            MaterialType::Metal
        );
        assert_eq!(
            classify_material_type("Handmade tile", "", &[]),
            MaterialType::Ceramic
        );
        assert_eq!(
            classify_material_type("Acoustic panel", "", &kw(&["felt"])),
            MaterialType::Biobased
        );
    }

    #[test]
    fn test_unmatched_falls_back_to_concrete() {
        assert_eq!(
            classify_material_type("Mystery board", "Unknown composition", &[]),
            MaterialType::Concrete
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            classify_material_type("TRAVERTINE", "", &[]),
            MaterialType::Stone
        );
    }

    #[test]
    fn test_templates_in_range() {
        let all = [
            MaterialType::Timber,
            MaterialType::Ceramic,
            MaterialType::Metal,
            MaterialType::Concrete,
            MaterialType::Glass,
            MaterialType::Plastic,
            MaterialType::Earth,
            MaterialType::Stone,
            MaterialType::Textile,
            MaterialType::Biobased,
            MaterialType::Paint,
        ];
        for kind in all {
            assert!(kind.template().impacts().iter().all(|i| (1..=5).contains(i)), "{}", kind);
        }
        assert_eq!(MaterialType::Metal.template().impacts(), [5, 5, 3, 2, 1, 1, 1]);
    }

    #[test]
    fn test_seed_skips_curated_materials() {
        let data = LifecycleData::builtin().unwrap();
        let materials = vec![
            MaterialRecord::new("clt-panel", "CLT panel", "", MaterialCategory::Structure),
            MaterialRecord::new("zinc-roof", "Standing seam zinc", "", MaterialCategory::Roof),
            MaterialRecord::new("brick-slip", "Brick slip", "", MaterialCategory::External),
        ];

        let seeded = seed_missing_profiles(&data, &materials).unwrap();
        assert_eq!(seeded.len(), 2);
        assert!(!seeded.contains_key("clt-panel"));
        assert_eq!(seeded["zinc-roof"].material_type, MaterialType::Metal);
        assert_eq!(seeded["brick-slip"].material_type, MaterialType::Ceramic);

        let ids: Vec<&String> = seeded.keys().collect();
        assert_eq!(ids, vec!["brick-slip", "zinc-roof"]);
    }
}
