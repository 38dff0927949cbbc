//! Multi-page sheet renderer
//!
//! Facts are paired two per page in input order; an odd count leaves the last
//! page with a single card. Each page carries the same footer.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::config::SheetConfig;
use crate::facts::types::MaterialFact;
use crate::render::card::draw_card;
use crate::render::layout::plan_page;
use crate::render::palette;
use crate::render::surface::*;

pub const FOOTER_TITLE: &str = "Moodboard Lab · Material specification sheet";
pub const DISCLAIMER: &str = "Indicative lifecycle scores for early-stage comparison only. \
    Not a certified LCA; confirm with product EPDs before specification.";

const FOOTER_SIZE: f64 = 6.5;
const DISCLAIMER_SIZE: f64 = 5.5;
const DISCLAIMER_OFFSET: f64 = 9.0;

/// Render all facts dated today. Returns the number of pages.
pub fn render_sheets(surface: &mut dyn DrawSurface, facts: &[MaterialFact], config: &SheetConfig) -> usize {
    render_sheets_dated(surface, facts, config, Local::now().date_naive())
}

pub fn render_sheets_dated(
    surface: &mut dyn DrawSurface,
    facts: &[MaterialFact],
    config: &SheetConfig,
    date: NaiveDate,
) -> usize {
    let total = facts.len().div_ceil(2);

    for (index, pair) in facts.chunks(2).enumerate() {
        surface.begin_page();

        let plan = plan_page(&pair[0], pair.get(1), config);
        for (fact, card) in pair.iter().zip(&plan.cards) {
            draw_card(surface, fact, card, config);
        }
        draw_footer(surface, config, index + 1, total, date);
    }

    info!("Rendered {} materials on {} pages", facts.len(), total);
    total
}

pub fn footer_page_label(page: usize, total: usize) -> String {
    format!("Page {} of {}", page, total)
}

fn draw_footer(surface: &mut dyn DrawSurface, config: &SheetConfig, page: usize, total: usize, date: NaiveDate) {
    let left = config.margin;
    let right = config.page_width - config.margin;
    let footer_y = config.footer_y();
    let rule_y = footer_y - config.footer_rule_gap;

    surface.draw_line(Point::new(left, rule_y), Point::new(right, rule_y), palette::RULE, 0.5);

    let style = TextStyle::new(FOOTER_SIZE, FontWeight::Regular, palette::TEXT_MUTED);
    surface.draw_text(FOOTER_TITLE, Point::new(left, footer_y), &style);
    surface.draw_text(
        &date.format("%-d %B %Y").to_string(),
        Point::new(config.page_width / 2.0, footer_y),
        &style.aligned(Align::Center),
    );
    surface.draw_text(
        &footer_page_label(page, total),
        Point::new(right, footer_y),
        &style.aligned(Align::Right),
    );

    surface.draw_text(
        DISCLAIMER,
        Point::new(config.page_width / 2.0, footer_y + DISCLAIMER_OFFSET),
        &TextStyle::new(DISCLAIMER_SIZE, FontWeight::Regular, palette::TEXT_FAINT).aligned(Align::Center),
    );
}
