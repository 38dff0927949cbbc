//! Material fact types
//!
//! `MaterialFact` is the render-facing view of one material. It is derived on
//! demand from a `MaterialRecord` and the lifecycle tables and never persisted.

use serde::Serialize;

use crate::lifecycle::types::*;

/// Broad building system a material belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemRole {
    Structure,
    Envelope,
    Openings,
    Finishes,
    Landscape,
}

impl SystemRole {
    pub fn for_category(category: MaterialCategory) -> Self {
        use MaterialCategory as C;
        match category {
            C::Structure | C::ExposedStructure => SystemRole::Structure,
            C::External | C::Roof | C::Soffit | C::Insulation => SystemRole::Envelope,
            C::Window | C::Door => SystemRole::Openings,
            C::Landscape => SystemRole::Landscape,
            _ => SystemRole::Finishes,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemRole::Structure => "Structure",
            SystemRole::Envelope => "Envelope",
            SystemRole::Openings => "Openings",
            SystemRole::Finishes => "Finishes",
            SystemRole::Landscape => "Landscape",
        }
    }
}

/// Worst confidence across the seven stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataConfidence {
    High,
    Medium,
    Low,
}

impl DataConfidence {
    pub fn from_confidences(confidences: &[Confidence]) -> Self {
        if confidences.contains(&Confidence::Low) {
            DataConfidence::Low
        } else if confidences.contains(&Confidence::Medium) {
            DataConfidence::Medium
        } else {
            DataConfidence::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataConfidence::High => "High confidence",
            DataConfidence::Medium => "Medium confidence",
            DataConfidence::Low => "Low confidence",
        }
    }
}

/// Scores in canonical stage order plus ranked stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleSummary {
    pub scores: [u8; 7],
    pub confidences: [Confidence; 7],
    pub hotspots: [Stage; 2],   // highest impacts
    pub strengths: [Stage; 2],  // lowest impacts, may repeat a hotspot on flat profiles
}

impl LifecycleSummary {
    pub fn score(&self, stage: Stage) -> u8 {
        self.scores[stage.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFact {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub category_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub system_role: SystemRole,
    pub form_variant: String,
    pub description: String,
    pub what_it_is: String,
    pub typical_uses: Vec<String>,
    pub performance_note: String,
    pub lifecycle: LifecycleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_intensity: Option<CarbonIntensity>,
    pub insight: String,
    pub actions: Vec<String>,
    pub data_confidence: DataConfidence,
    pub epd_status: EpdStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthNote>,
    pub risks: Vec<RiskItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_life: Option<u32>,
    pub duration: LifecycleDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_payback_label: Option<String>,
    pub replacements: f64,
    pub is_landscape: bool,
}

impl MaterialFact {
    /// Second header line: finish variant and the one-sentence summary.
    pub fn descriptor(&self) -> String {
        if self.what_it_is.is_empty() || self.what_it_is == self.name {
            self.form_variant.clone()
        } else {
            format!("{} · {}", self.form_variant, self.what_it_is)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_confidence_is_worst_of() {
        use Confidence::*;
        assert_eq!(DataConfidence::from_confidences(&[High; 7]), DataConfidence::High);
        assert_eq!(
            DataConfidence::from_confidences(&[High, High, Medium, High, High, High, High]),
            DataConfidence::Medium
        );
        assert_eq!(
            DataConfidence::from_confidences(&[High, Medium, Low, High, High, High, High]),
            DataConfidence::Low
        );
    }

    #[test]
    fn test_system_roles() {
        assert_eq!(SystemRole::for_category(MaterialCategory::ExposedStructure), SystemRole::Structure);
        assert_eq!(SystemRole::for_category(MaterialCategory::Insulation), SystemRole::Envelope);
        assert_eq!(SystemRole::for_category(MaterialCategory::Door), SystemRole::Openings);
        assert_eq!(SystemRole::for_category(MaterialCategory::Wallpaper), SystemRole::Finishes);
        assert_eq!(SystemRole::for_category(MaterialCategory::Landscape), SystemRole::Landscape);
    }
}
