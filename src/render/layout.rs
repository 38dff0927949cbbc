//! Adaptive Sheet Layout
//!
//! Pure layout arithmetic for two half-page cards per page. Nothing here draws;
//! the card renderer consumes the resulting `PagePlan`.
//!
//! Per card:
//!   header (+ extra when the descriptor wraps) | gap | body
//!   body = left column (main box, health box, actions box)
//!        + right column (heading, radar, two bar lists, insight box)
//!
//! Left-column overflow is absorbed in strict priority order, each capped:
//!   1. main box grows into the actions box reserve   (≤ max_main_expansion)
//!   2. insight box shrinks, body extends             (≤ max_insight_shrink)
//!   3. chart shrinks, body extends                   (≤ max_chart_shrink, floor min_chart_height)
//! Whatever remains is recorded as `unresolved_overflow` and accepted; text is
//! already clamped so the worst case is a tight box, not lost content.
//!
//! Per page, card 1 placement runs three passes once:
//!   1. footer clearance: push card 1 up by any deficit
//!   2. gap too large: pull card 1 up by the excess
//!   3. gap too small: push card 1 down, bounded by the footer slack
//! Pass 1 establishes the clearance, pass 2 only moves card 1 away from the
//! footer and pass 3 never spends more than the slack, so the footer
//! clearance holds after a single pass. The gap bound is best effort when two
//! tall cards cannot both fit.

use smallvec::{smallvec, SmallVec};

use crate::config::SheetConfig;
use crate::facts::types::MaterialFact;
use crate::render::fonts::{fit_text, text_width};
use crate::render::surface::FontWeight;

pub const THUMBNAIL_INSET: f64 = 4.0;
pub const CHIP_PADDING: f64 = 5.0;
pub const CHIP_GAP: f64 = 4.0;
pub const HEADER_TEXT_GAP: f64 = 8.0;

// ============================================================================
// Header
// ============================================================================

/// Chip labels in reading order (drawn right-to-left).
pub fn header_chips(fact: &MaterialFact) -> SmallVec<[String; 2]> {
    let mut chips: SmallVec<[String; 2]> = smallvec![fact.category_label.clone()];
    if let Some(carbon) = fact.carbon_intensity {
        chips.push(carbon.chip_label().to_string());
    }
    chips
}

pub fn chip_width(label: &str, config: &SheetConfig) -> f64 {
    text_width(label, config.small_font_size, FontWeight::Bold) + 2.0 * CHIP_PADDING
}

pub fn thumbnail_size(config: &SheetConfig) -> f64 {
    config.header_height - 2.0 * THUMBNAIL_INSET
}

/// Width available to the name and descriptor between thumbnail and chips.
pub fn header_text_width(fact: &MaterialFact, config: &SheetConfig) -> f64 {
    let chips: f64 = header_chips(fact)
        .iter()
        .map(|c| chip_width(c, config) + CHIP_GAP)
        .sum();
    (config.card_width() - thumbnail_size(config) - 2.0 * HEADER_TEXT_GAP - chips).max(40.0)
}

// ============================================================================
// Main box content
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: &'static str,
    pub lines: Vec<String>,
}

/// Wrapped, clamped text of the main box. The same lines are measured here and
/// drawn by the card renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MainContent {
    pub description: Vec<String>,
    pub sections: Vec<Section>,
}

impl MainContent {
    pub fn measure(fact: &MaterialFact, config: &SheetConfig) -> Self {
        let width = config.left_column_width() - 2.0 * config.box_padding;
        let size = config.body_font_size;
        let fit = |text: &str, lines: usize| fit_text(text, size, FontWeight::Regular, width, lines);

        let description_source = if fact.description.is_empty() {
            fact.what_it_is.as_str()
        } else {
            fact.description.as_str()
        };

        let mut sections = vec![
            Section {
                heading: "TYPICAL USES",
                lines: fit(fact.typical_uses.join(" · ").as_str(), 2),
            },
            Section {
                heading: "PERFORMANCE",
                lines: fit(&fact.performance_note, 2),
            },
            Section {
                heading: "SERVICE LIFE",
                lines: service_lines(fact, config)
                    .iter()
                    .flat_map(|line| fit(line.as_str(), 1))
                    .collect(),
            },
        ];

        if !fact.risks.is_empty() {
            sections.push(Section {
                heading: "RISKS",
                lines: fact
                    .risks
                    .iter()
                    .take(2)
                    .flat_map(|r| fit(format!("{}: {}", r.risk, r.mitigation).as_str(), 1))
                    .collect(),
            });
        }

        Self {
            description: fit(description_source, config.description_max_lines),
            sections,
        }
    }

    /// Estimated height: wrapped lines × line height + fixed paddings per section.
    pub fn height(&self, config: &SheetConfig) -> f64 {
        let lh = config.line_height;
        let sections: f64 = self
            .sections
            .iter()
            .map(|s| config.section_gap + lh + s.lines.len() as f64 * lh)
            .sum();
        2.0 * config.box_padding + self.description.len() as f64 * lh + sections
    }
}

fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}x", value as u32)
    } else {
        format!("{:.1}x", value)
    }
}

/// Service life, replacement and payback lines for the main box.
pub fn service_lines(fact: &MaterialFact, config: &SheetConfig) -> Vec<String> {
    let service_life = fact.service_life.unwrap_or(fact.duration.service_life);
    let mut lines = vec![format!(
        "~{} years service life; replaced every {} years",
        service_life, fact.duration.replacement_cycle
    )];

    if fact.is_landscape {
        lines.push(format!(
            "Maintained rather than replaced ({} maintenance factor)",
            format_multiplier(fact.replacements)
        ));
    } else {
        lines.push(format!(
            "{} installations over a {}-year building life",
            format_multiplier(fact.replacements),
            config.building_life
        ));
    }

    if let Some(label) = &fact.carbon_payback_label {
        lines.push(format!("Carbon payback: {}", label));
    }
    lines
}

// ============================================================================
// Overflow absorption
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Absorption {
    pub main_expansion: f64,
    pub insight_shrink: f64,
    pub chart_shrink: f64,
    pub unresolved: f64,
}

impl Absorption {
    /// Amount by which the body grows.
    pub fn body_extension(&self) -> f64 {
        self.insight_shrink + self.chart_shrink
    }
}

/// Distribute `overflow` across the three absorbers in priority order.
pub fn absorb_overflow(overflow: f64, actions_box_height: f64, config: &SheetConfig) -> Absorption {
    let mut remaining = overflow.max(0.0);

    let main_expansion = remaining.min(config.max_main_expansion.min(actions_box_height));
    remaining -= main_expansion;

    let insight_shrink = remaining.min(config.max_insight_shrink);
    remaining -= insight_shrink;

    let chart_room = (config.chart_height - config.min_chart_height).max(0.0);
    let chart_shrink = remaining.min(config.max_chart_shrink.min(chart_room));
    remaining -= chart_shrink;

    Absorption {
        main_expansion,
        insight_shrink,
        chart_shrink,
        unresolved: remaining,
    }
}

// ============================================================================
// Card plan
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CardPlan {
    pub header_top: f64,
    pub header_height: f64,
    pub descriptor: Vec<String>,
    pub body_top: f64,
    pub body_height: f64,
    pub main_content_height: f64,
    pub health_box_height: f64,
    pub actions_box_height: f64,
    pub chart_height: f64,
    pub insight_box_height: f64,
    pub unresolved_overflow: f64,
    pub main: MainContent,
}

impl CardPlan {
    pub fn bottom(&self) -> f64 {
        self.body_top + self.body_height
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.header_top
    }

    fn move_to(&mut self, top: f64) {
        let dy = top - self.header_top;
        self.header_top += dy;
        self.body_top += dy;
    }
}

pub fn plan_card(fact: &MaterialFact, config: &SheetConfig, top: f64) -> CardPlan {
    let descriptor = fit_text(
        &fact.descriptor(),
        config.body_font_size,
        FontWeight::Regular,
        header_text_width(fact, config),
        config.descriptor_max_lines,
    );
    let header_height = if descriptor.len() > 1 {
        config.header_height + config.header_two_line_extra
    } else {
        config.header_height
    };

    // no health data: the health box and its gap go to the actions box
    let (health_box_height, actions_nominal, gaps) = if fact.health.is_some() {
        (config.health_box_height, config.actions_box_height, 2.0 * config.box_gap)
    } else {
        (
            0.0,
            config.actions_box_height + config.health_box_height + config.box_gap,
            config.box_gap,
        )
    };
    let main_nominal = config.body_height - health_box_height - actions_nominal - gaps;

    let main = MainContent::measure(fact, config);
    let need = main.height(config);
    let absorption = absorb_overflow(need - main_nominal, actions_nominal, config);

    if absorption.unresolved > 0.0 {
        tracing::debug!(
            "{}: {:.1}pt of main content overflow left unresolved",
            fact.id,
            absorption.unresolved
        );
    }

    CardPlan {
        header_top: top,
        header_height,
        descriptor,
        body_top: top + header_height + config.header_gap,
        body_height: config.body_height + absorption.body_extension(),
        main_content_height: main_nominal + absorption.main_expansion + absorption.body_extension(),
        health_box_height,
        actions_box_height: actions_nominal - absorption.main_expansion,
        chart_height: config.chart_height - absorption.chart_shrink,
        insight_box_height: config.insight_box_height - absorption.insight_shrink,
        unresolved_overflow: absorption.unresolved,
        main,
    }
}

// ============================================================================
// Page plan
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub footer_y: f64,
    pub card1_offset: f64, // applied offset relative to card 1's nominal top
    pub cards: Vec<CardPlan>,
}

/// Footer clearance of a card bottom (must stay ≥ min_footer_clearance).
pub fn footer_clearance(card_bottom: f64, config: &SheetConfig) -> f64 {
    config.footer_y() - config.footer_rule_gap - card_bottom
}

/// Top of card 1 after the three placement passes.
pub fn place_second_card(card0_bottom: f64, card1_height: f64, config: &SheetConfig) -> f64 {
    let mut top = config.card1_nominal_top();

    // 1. footer
    let deficit = config.min_footer_clearance - footer_clearance(top + card1_height, config);
    if deficit > 0.0 {
        top -= deficit;
    }

    // 2. gap too large
    let gap = top - card0_bottom;
    if gap > config.max_card_gap {
        top -= gap - config.max_card_gap;
    }

    // 3. gap too small, bounded by footer slack
    let gap = top - card0_bottom;
    if gap < config.min_card_gap {
        let slack = (footer_clearance(top + card1_height, config) - config.min_footer_clearance).max(0.0);
        top += (config.min_card_gap - gap).min(slack);
    }

    top
}

pub fn plan_page(first: &MaterialFact, second: Option<&MaterialFact>, config: &SheetConfig) -> PagePlan {
    let card0 = plan_card(first, config, config.margin);
    let mut cards = vec![card0];
    let mut card1_offset = 0.0;

    if let Some(second) = second {
        let mut card1 = plan_card(second, config, config.card1_nominal_top());
        let top = place_second_card(cards[0].bottom(), card1.height(), config);
        card1_offset = top - config.card1_nominal_top();
        card1.move_to(top);
        cards.push(card1);
    }

    PagePlan {
        footer_y: config.footer_y(),
        card1_offset,
        cards,
    }
}
