//! Shared data types for lifecycle resolution.
//!
//! Data sources:
//! - Material records: catalogue collaborator (JSON, camelCase)
//! - Profiles and durations: builtin tables or a lifecycle data file

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Material catalogue input
// ============================================================================

/// Catalogue category. Every value must have a category default duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialCategory {
    Structure,
    ExposedStructure,
    Floor,
    WallInternal,
    External,
    Ceiling,
    Soffit,
    Window,
    Door,
    Roof,
    Finish,
    PaintWall,
    PaintCeiling,
    Plaster,
    Microcement,
    TimberPanel,
    Tile,
    Wallpaper,
    AcousticPanel,
    TimberSlat,
    Joinery,
    Fixture,
    Landscape,
    Insulation,
    Balustrade,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 25] = [
        MaterialCategory::Structure,
        MaterialCategory::ExposedStructure,
        MaterialCategory::Floor,
        MaterialCategory::WallInternal,
        MaterialCategory::External,
        MaterialCategory::Ceiling,
        MaterialCategory::Soffit,
        MaterialCategory::Window,
        MaterialCategory::Door,
        MaterialCategory::Roof,
        MaterialCategory::Finish,
        MaterialCategory::PaintWall,
        MaterialCategory::PaintCeiling,
        MaterialCategory::Plaster,
        MaterialCategory::Microcement,
        MaterialCategory::TimberPanel,
        MaterialCategory::Tile,
        MaterialCategory::Wallpaper,
        MaterialCategory::AcousticPanel,
        MaterialCategory::TimberSlat,
        MaterialCategory::Joinery,
        MaterialCategory::Fixture,
        MaterialCategory::Landscape,
        MaterialCategory::Insulation,
        MaterialCategory::Balustrade,
    ];

    /// Wire key, as used in JSON data files.
    pub fn key(&self) -> &'static str {
        match self {
            MaterialCategory::Structure => "structure",
            MaterialCategory::ExposedStructure => "exposed-structure",
            MaterialCategory::Floor => "floor",
            MaterialCategory::WallInternal => "wall-internal",
            MaterialCategory::External => "external",
            MaterialCategory::Ceiling => "ceiling",
            MaterialCategory::Soffit => "soffit",
            MaterialCategory::Window => "window",
            MaterialCategory::Door => "door",
            MaterialCategory::Roof => "roof",
            MaterialCategory::Finish => "finish",
            MaterialCategory::PaintWall => "paint-wall",
            MaterialCategory::PaintCeiling => "paint-ceiling",
            MaterialCategory::Plaster => "plaster",
            MaterialCategory::Microcement => "microcement",
            MaterialCategory::TimberPanel => "timber-panel",
            MaterialCategory::Tile => "tile",
            MaterialCategory::Wallpaper => "wallpaper",
            MaterialCategory::AcousticPanel => "acoustic-panel",
            MaterialCategory::TimberSlat => "timber-slat",
            MaterialCategory::Joinery => "joinery",
            MaterialCategory::Fixture => "fixture",
            MaterialCategory::Landscape => "landscape",
            MaterialCategory::Insulation => "insulation",
            MaterialCategory::Balustrade => "balustrade",
        }
    }

    /// Display label used on sheet chips.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Structure => "Structure",
            MaterialCategory::ExposedStructure => "Exposed structure",
            MaterialCategory::Floor => "Floor",
            MaterialCategory::WallInternal => "Internal wall",
            MaterialCategory::External => "External envelope",
            MaterialCategory::Ceiling => "Ceiling",
            MaterialCategory::Soffit => "Soffit",
            MaterialCategory::Window => "Window",
            MaterialCategory::Door => "Door",
            MaterialCategory::Roof => "Roof",
            MaterialCategory::Finish => "Finish",
            MaterialCategory::PaintWall => "Wall paint",
            MaterialCategory::PaintCeiling => "Ceiling paint",
            MaterialCategory::Plaster => "Plaster",
            MaterialCategory::Microcement => "Microcement",
            MaterialCategory::TimberPanel => "Timber panel",
            MaterialCategory::Tile => "Tile",
            MaterialCategory::Wallpaper => "Wallpaper",
            MaterialCategory::AcousticPanel => "Acoustic panel",
            MaterialCategory::TimberSlat => "Timber slats",
            MaterialCategory::Joinery => "Joinery",
            MaterialCategory::Fixture => "Fixture",
            MaterialCategory::Landscape => "Landscape",
            MaterialCategory::Insulation => "Insulation",
            MaterialCategory::Balustrade => "Balustrade",
        }
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Embodied carbon tag from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarbonIntensity {
    Low,
    Medium,
    High,
}

impl CarbonIntensity {
    /// Multiplier applied to raw/manufacturing default scores.
    pub fn score_multiplier(&self) -> f64 {
        match self {
            CarbonIntensity::High => 1.3,
            CarbonIntensity::Medium => 1.0,
            CarbonIntensity::Low => 0.7,
        }
    }

    pub fn chip_label(&self) -> &'static str {
        match self {
            CarbonIntensity::High => "High carbon",
            CarbonIntensity::Medium => "Medium carbon",
            CarbonIntensity::Low => "Low carbon",
        }
    }
}

/// Catalogue material as seen by this crate. Resolution is a pure function of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: MaterialCategory,
    #[serde(default)]
    pub carbon_intensity: Option<CarbonIntensity>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub custom_description: Option<String>,
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub image: Option<String>, // data URI thumbnail
}

impl MaterialRecord {
    /// Minimal record, mostly for tests and seeding tools.
    pub fn new(id: &str, name: &str, description: &str, category: MaterialCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            carbon_intensity: None,
            keywords: Vec::new(),
            tags: Vec::new(),
            custom_description: None,
            finish: None,
            image: None,
        }
    }

    pub fn with_carbon(mut self, intensity: CarbonIntensity) -> Self {
        self.carbon_intensity = Some(intensity);
        self
    }

    /// Text that rule patterns are matched against.
    pub fn haystack(&self) -> String {
        format!("{} {} {}", self.id, self.name, self.description)
    }
}

// ============================================================================
// Lifecycle stages and profiles
// ============================================================================

/// The seven lifecycle stages, in canonical (tie-break) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Raw,
    Manufacturing,
    Transport,
    Installation,
    InUse,
    Maintenance,
    EndOfLife,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Raw,
        Stage::Manufacturing,
        Stage::Transport,
        Stage::Installation,
        Stage::InUse,
        Stage::Maintenance,
        Stage::EndOfLife,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Raw => "Raw materials",
            Stage::Manufacturing => "Manufacturing",
            Stage::Transport => "Transport",
            Stage::Installation => "Installation",
            Stage::InUse => "In use",
            Stage::Maintenance => "Maintenance",
            Stage::EndOfLife => "End of life",
        }
    }

    /// Compact label for radar axes.
    pub fn short_label(&self) -> &'static str {
        match self {
            Stage::Raw => "Raw",
            Stage::Manufacturing => "Mfg",
            Stage::Transport => "Transport",
            Stage::Installation => "Install",
            Stage::InUse => "In use",
            Stage::Maintenance => "Maint.",
            Stage::EndOfLife => "End of life",
        }
    }
}

/// Evidence quality behind a stage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Impact score (1 = minimal, 5 = significant) with its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageScore {
    pub impact: u8,
    pub confidence: Confidence,
}

impl StageScore {
    pub const fn new(impact: u8, confidence: Confidence) -> Self {
        Self { impact, confidence }
    }
}

/// Exactly seven stage scores. One field per stage so a profile can never be partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleProfile {
    pub raw: StageScore,
    pub manufacturing: StageScore,
    pub transport: StageScore,
    pub installation: StageScore,
    pub in_use: StageScore,
    pub maintenance: StageScore,
    pub end_of_life: StageScore,
}

impl LifecycleProfile {
    /// Build from impacts in canonical stage order, all with one confidence.
    pub const fn uniform(impacts: [u8; 7], confidence: Confidence) -> Self {
        Self {
            raw: StageScore::new(impacts[0], confidence),
            manufacturing: StageScore::new(impacts[1], confidence),
            transport: StageScore::new(impacts[2], confidence),
            installation: StageScore::new(impacts[3], confidence),
            in_use: StageScore::new(impacts[4], confidence),
            maintenance: StageScore::new(impacts[5], confidence),
            end_of_life: StageScore::new(impacts[6], confidence),
        }
    }

    pub fn get(&self, stage: Stage) -> StageScore {
        match stage {
            Stage::Raw => self.raw,
            Stage::Manufacturing => self.manufacturing,
            Stage::Transport => self.transport,
            Stage::Installation => self.installation,
            Stage::InUse => self.in_use,
            Stage::Maintenance => self.maintenance,
            Stage::EndOfLife => self.end_of_life,
        }
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut StageScore {
        match stage {
            Stage::Raw => &mut self.raw,
            Stage::Manufacturing => &mut self.manufacturing,
            Stage::Transport => &mut self.transport,
            Stage::Installation => &mut self.installation,
            Stage::InUse => &mut self.in_use,
            Stage::Maintenance => &mut self.maintenance,
            Stage::EndOfLife => &mut self.end_of_life,
        }
    }

    /// Impacts in canonical stage order.
    pub fn impacts(&self) -> [u8; 7] {
        Stage::ALL.map(|s| self.get(s).impact)
    }

    pub fn confidences(&self) -> [Confidence; 7] {
        Stage::ALL.map(|s| self.get(s).confidence)
    }
}

// ============================================================================
// Durations and carbon payback
// ============================================================================

/// How a material pays back its carbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackCategory {
    BiogenicStorage,
    OperationalOffset,
    EcosystemSequestration,
}

impl PaybackCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PaybackCategory::BiogenicStorage => "biogenic storage",
            PaybackCategory::OperationalOffset => "operational offset",
            PaybackCategory::EcosystemSequestration => "ecosystem sequestration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonPayback {
    pub years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_years: Option<[u32; 2]>,
    pub category: PaybackCategory,
    pub assumption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementScope {
    Full,
    Partial,
}

/// Service life, replacement cycle and optional carbon payback for a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleDuration {
    pub service_life: u32,
    pub replacement_cycle: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_payback: Option<CarbonPayback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_scope: Option<ReplacementScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_replacement_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LifecycleDuration {
    pub fn new(service_life: u32, replacement_cycle: u32) -> Self {
        Self {
            service_life,
            replacement_cycle,
            carbon_payback: None,
            replacement_scope: None,
            partial_replacement_factor: None,
            notes: None,
        }
    }

    pub fn partial(mut self, factor: f64) -> Self {
        self.replacement_scope = Some(ReplacementScope::Partial);
        self.partial_replacement_factor = Some(factor);
        self
    }

    pub fn with_payback(
        mut self,
        years: u32,
        range_years: Option<[u32; 2]>,
        category: PaybackCategory,
        assumption: &str,
    ) -> Self {
        self.carbon_payback = Some(CarbonPayback {
            years,
            range_years,
            category,
            assumption: assumption.to_string(),
        });
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Check the data invariants. Returns the reason on failure.
    pub fn check(&self) -> Result<(), String> {
        if self.replacement_cycle == 0 {
            return Err("replacementCycle must be > 0".to_string());
        }
        if self.replacement_scope == Some(ReplacementScope::Partial) {
            match self.partial_replacement_factor {
                Some(f) if f > 0.0 && f <= 1.0 => {}
                Some(f) => return Err(format!("partialReplacementFactor {} outside (0, 1]", f)),
                None => return Err("partial scope without partialReplacementFactor".to_string()),
            }
        }
        if let Some(CarbonPayback { range_years: Some([lo, hi]), .. }) = &self.carbon_payback {
            if lo > hi {
                return Err(format!("carbon payback range {}-{} is inverted", lo, hi));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Curated per-material notes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRisk {
    Low,
    Medium,
    High,
}

impl HealthRisk {
    pub fn label(&self) -> &'static str {
        match self {
            HealthRisk::Low => "Low concern",
            HealthRisk::Medium => "Moderate concern",
            HealthRisk::High => "High concern",
        }
    }
}

/// Health/toxicity note for a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthNote {
    pub risk_level: HealthRisk,
    #[serde(default)]
    pub concerns: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    pub mitigation: String,
}

/// Environmental Product Declaration availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpdStatus {
    Available,
    Generic,
    Unknown,
}

impl EpdStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EpdStatus::Available => "Product EPD available",
            EpdStatus::Generic => "Generic data",
            EpdStatus::Unknown => "EPD status unknown",
        }
    }
}
