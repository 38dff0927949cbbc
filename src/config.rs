//! Sheet configuration
//!
//! Every layout constant lives here so the layout engine stays a pure function
//! of (facts, config). Defaults reproduce the A4 two-card sheet; any subset of
//! fields can be overridden from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::lifecycle::resolver::{DEFAULT_BUILDING_LIFE, LANDSCAPE_MAINTENANCE_FACTOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    // Page (points, origin top-left)
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub footer_offset: f64,       // footerY = page_height - footer_offset
    pub footer_rule_gap: f64,     // rule sits this far above footerY
    pub min_footer_clearance: f64,

    // Card placement
    pub second_material_offset: f64,
    pub min_card_gap: f64,
    pub max_card_gap: f64,

    // Card geometry
    pub header_height: f64,
    pub header_two_line_extra: f64,
    pub header_gap: f64,
    pub body_height: f64,
    pub column_gap: f64,
    pub left_column_fraction: f64,
    pub box_gap: f64,
    pub box_padding: f64,

    // Left column
    pub health_box_height: f64,
    pub actions_box_height: f64,

    // Right column
    pub heading_height: f64,
    pub chart_height: f64,
    pub min_chart_height: f64,
    pub list_block_height: f64,
    pub insight_box_height: f64,

    // Overflow absorbers, in priority order
    pub max_main_expansion: f64,
    pub max_insight_shrink: f64,
    pub max_chart_shrink: f64,

    // Text
    pub name_font_size: f64,
    pub body_font_size: f64,
    pub small_font_size: f64,
    pub line_height: f64,
    pub section_gap: f64,
    pub description_max_lines: usize,
    pub descriptor_max_lines: usize,
    pub actions_max_lines: usize,

    // Lifecycle arithmetic shown on the sheet
    pub building_life: u32,
    pub landscape_maintenance_factor: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 28.0,
            footer_offset: 30.0,
            footer_rule_gap: 8.0,
            min_footer_clearance: 34.0,

            second_material_offset: -28.0,
            min_card_gap: 18.0,
            max_card_gap: 22.0,

            header_height: 52.0,
            header_two_line_extra: 10.0,
            header_gap: 6.0,
            body_height: 292.0,
            column_gap: 12.0,
            left_column_fraction: 0.56,
            box_gap: 6.0,
            box_padding: 7.0,

            health_box_height: 58.0,
            actions_box_height: 72.0,

            heading_height: 14.0,
            chart_height: 130.0,
            min_chart_height: 100.0,
            list_block_height: 34.0,
            insight_box_height: 56.0,

            max_main_expansion: 12.0,
            max_insight_shrink: 8.0,
            max_chart_shrink: 10.0,

            name_font_size: 12.0,
            body_font_size: 7.5,
            small_font_size: 6.5,
            line_height: 9.0,
            section_gap: 4.0,
            description_max_lines: 3,
            descriptor_max_lines: 2,
            actions_max_lines: 5,

            building_life: DEFAULT_BUILDING_LIFE,
            landscape_maintenance_factor: LANDSCAPE_MAINTENANCE_FACTOR,
        }
    }
}

impl SheetConfig {
    /// Load a (partial) config from JSON; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sheet config: {:?}", path))?;

        let config: SheetConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse sheet config JSON: {:?}", path))?;

        config.validate()?;
        tracing::info!("Loaded sheet config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            anyhow::bail!("Page size must be positive");
        }
        if self.building_life == 0 {
            anyhow::bail!("buildingLife must be greater than zero");
        }
        if self.min_chart_height > self.chart_height {
            anyhow::bail!(
                "minChartHeight ({}) exceeds chartHeight ({})",
                self.min_chart_height,
                self.chart_height
            );
        }
        if !(0.0..1.0).contains(&self.left_column_fraction) {
            anyhow::bail!("leftColumnFraction must be in [0, 1)");
        }
        Ok(())
    }

    pub fn footer_y(&self) -> f64 {
        self.page_height - self.footer_offset
    }

    pub fn card_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn left_column_width(&self) -> f64 {
        (self.card_width() - self.column_gap) * self.left_column_fraction
    }

    pub fn right_column_width(&self) -> f64 {
        self.card_width() - self.column_gap - self.left_column_width()
    }

    /// Card 1 top before the placement passes.
    pub fn card1_nominal_top(&self) -> f64 {
        self.page_height / 2.0 + self.margin + self.second_material_offset
    }
}
