//! Card renderer
//!
//! Draws one material card from its `CardPlan`. All sizes come from the plan;
//! this module only decides where inside each box the content goes.

use crate::config::SheetConfig;
use crate::facts::types::MaterialFact;
use crate::lifecycle::types::{CarbonIntensity, Stage};
use crate::render::fonts::{ellipsize, fit_text, wrap_text};
use crate::render::layout::{
    chip_width, header_chips, header_text_width, thumbnail_size, CardPlan, CHIP_GAP,
    HEADER_TEXT_GAP, THUMBNAIL_INSET,
};
use crate::render::palette;
use crate::render::radar::draw_lifecycle_radar;
use crate::render::surface::*;

const BOX_RADIUS: f64 = 4.0;
const CHIP_HEIGHT: f64 = 12.0;
const BULLET_INDENT: f64 = 8.0;
const BAR_LABEL_WIDTH: f64 = 62.0;
const BAR_HEIGHT: f64 = 5.0;
const BAR_ROW_HEIGHT: f64 = 11.0;
const SCORE_WIDTH: f64 = 12.0;

/// Score severity colour: ≥3 orange, ≥2 yellow, otherwise green.
pub fn bar_color(score: u8) -> Color {
    if score >= 3 {
        palette::ORANGE
    } else if score >= 2 {
        palette::YELLOW
    } else {
        palette::GREEN
    }
}

fn chip_color(index: usize, carbon: Option<CarbonIntensity>) -> Color {
    match (index, carbon) {
        (1, Some(CarbonIntensity::High)) => Color::rgb(250, 222, 200),
        (1, Some(CarbonIntensity::Medium)) => Color::rgb(250, 238, 196),
        (1, Some(CarbonIntensity::Low)) => Color::rgb(214, 238, 214),
        _ => palette::CHIP_BG,
    }
}

/// One rendered line of the actions list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionLine {
    pub bullet: bool,
    pub text: String,
}

/// Wrap actions under a shared line budget. A bullet cut mid-way gets an
/// ellipsis on its last kept line; bullets that do not start are dropped.
pub fn fit_actions(actions: &[String], size: f64, width: f64, max_lines: usize) -> Vec<ActionLine> {
    let mut out: Vec<ActionLine> = Vec::with_capacity(max_lines);

    for action in actions {
        let lines = wrap_text(action, size, FontWeight::Regular, width);
        for (i, line) in lines.into_iter().enumerate() {
            if out.len() == max_lines {
                if i > 0 {
                    if let Some(last) = out.last_mut() {
                        last.text = ellipsize(&last.text, size, FontWeight::Regular, width);
                    }
                }
                return out;
            }
            out.push(ActionLine { bullet: i == 0, text: line });
        }
    }
    out
}

fn lines_that_fit(height: f64, config: &SheetConfig) -> usize {
    // heading line plus top/bottom padding
    ((height - 2.0 * config.box_padding - config.line_height) / config.line_height)
        .floor()
        .max(0.0) as usize
}

pub fn draw_card(surface: &mut dyn DrawSurface, fact: &MaterialFact, plan: &CardPlan, config: &SheetConfig) {
    draw_header(surface, fact, plan, config);
    draw_left_column(surface, fact, plan, config);
    draw_right_column(surface, fact, plan, config);
}

// ============================================================================
// Header
// ============================================================================

fn draw_header(surface: &mut dyn DrawSurface, fact: &MaterialFact, plan: &CardPlan, config: &SheetConfig) {
    let x = config.margin;
    let top = plan.header_top;
    let size = thumbnail_size(config);
    let thumb = Rect::new(x, top + THUMBNAIL_INSET, size, size);

    let drawn = match &fact.image {
        Some(uri) => match surface.draw_image(uri, thumb) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{}: thumbnail skipped: {}", fact.id, e);
                false
            }
        },
        None => false,
    };
    if !drawn {
        draw_placeholder(surface, fact, thumb);
    }

    let text_x = x + size + HEADER_TEXT_GAP;
    let text_width = header_text_width(fact, config);
    let name_style = TextStyle::new(config.name_font_size, FontWeight::Bold, palette::TEXT);
    let name = fit_text(&fact.name, config.name_font_size, FontWeight::Bold, text_width, 1);
    let mut baseline = top + THUMBNAIL_INSET + config.name_font_size;
    if let Some(first) = name.first() {
        surface.draw_text(first, Point::new(text_x, baseline), &name_style);
    }

    baseline += 4.0;
    let descriptor_style = TextStyle::new(config.body_font_size, FontWeight::Regular, palette::TEXT_MUTED);
    for line in &plan.descriptor {
        baseline += config.line_height;
        surface.draw_text(line, Point::new(text_x, baseline), &descriptor_style);
    }

    let meta = format!(
        "{} · {} · {}",
        fact.system_role.label(),
        fact.epd_status.label(),
        fact.data_confidence.label()
    );
    surface.draw_text(
        &meta,
        Point::new(text_x, baseline + config.line_height),
        &TextStyle::new(config.small_font_size, FontWeight::Regular, palette::TEXT_FAINT),
    );

    // chips, right-justified: walk from the right edge leftwards
    let chips = header_chips(fact);
    let chip_style = TextStyle::new(config.small_font_size, FontWeight::Bold, palette::TEXT).aligned(Align::Center);
    let mut cursor = x + config.card_width();
    for (index, label) in chips.iter().enumerate().rev() {
        let width = chip_width(label, config);
        let rect = Rect::new(cursor - width, top + THUMBNAIL_INSET, width, CHIP_HEIGHT);
        surface.draw_rect(rect, &ShapeStyle::fill(chip_color(index, fact.carbon_intensity)), CHIP_HEIGHT / 2.0);
        surface.draw_text(
            label,
            Point::new(rect.center().x, rect.y + CHIP_HEIGHT / 2.0 + config.small_font_size / 3.0),
            &chip_style,
        );
        cursor -= width + CHIP_GAP;
    }
}

fn draw_placeholder(surface: &mut dyn DrawSurface, fact: &MaterialFact, rect: Rect) {
    surface.draw_rect(rect, &ShapeStyle::fill(palette::PLACEHOLDER), 3.0);
    if let Some(initial) = fact.name.chars().next() {
        let style = TextStyle::new(16.0, FontWeight::Bold, palette::TEXT_FAINT).aligned(Align::Center);
        let center = rect.center();
        surface.draw_text(&initial.to_uppercase().to_string(), Point::new(center.x, center.y + 5.5), &style);
    }
}

// ============================================================================
// Left column
// ============================================================================

fn draw_left_column(surface: &mut dyn DrawSurface, fact: &MaterialFact, plan: &CardPlan, config: &SheetConfig) {
    let x = config.margin;
    let width = config.left_column_width();
    let pad = config.box_padding;
    let lh = config.line_height;

    let body = TextStyle::new(config.body_font_size, FontWeight::Regular, palette::TEXT);
    let heading = TextStyle::new(config.small_font_size, FontWeight::Bold, palette::TEXT_MUTED);

    // main box
    let main = Rect::new(x, plan.body_top, width, plan.main_content_height);
    surface.draw_rect(main, &ShapeStyle::fill(palette::CARD_BG), BOX_RADIUS);

    let mut cursor = main.y + pad;
    for line in &plan.main.description {
        surface.draw_text(line, Point::new(x + pad, cursor + lh - 2.0), &body);
        cursor += lh;
    }
    for section in &plan.main.sections {
        cursor += config.section_gap;
        surface.draw_text(section.heading, Point::new(x + pad, cursor + lh - 2.0), &heading);
        cursor += lh;
        for line in &section.lines {
            surface.draw_text(line, Point::new(x + pad, cursor + lh - 2.0), &body);
            cursor += lh;
        }
    }

    let mut y = main.bottom() + config.box_gap;

    // health box
    if let (Some(health), true) = (&fact.health, plan.health_box_height > 0.0) {
        let rect = Rect::new(x, y, width, plan.health_box_height);
        surface.draw_rect(rect, &ShapeStyle::fill(palette::HEALTH_BG), BOX_RADIUS);

        let title = format!("HEALTH & INDOOR AIR · {}", health.risk_level.label().to_uppercase());
        surface.draw_text(
            &title,
            Point::new(x + pad, rect.y + pad + lh - 2.0),
            &TextStyle::new(config.small_font_size, FontWeight::Bold, palette::HEALTH_ACCENT),
        );

        let mut text = health.note.clone();
        if !health.concerns.is_empty() {
            text = format!("{} {}", health.concerns.join(", "), text);
        }
        let lines = fit_text(
            &text,
            config.body_font_size,
            FontWeight::Regular,
            width - 2.0 * pad,
            lines_that_fit(rect.height, config),
        );
        for (i, line) in lines.iter().enumerate() {
            let baseline = rect.y + pad + lh * (i + 2) as f64 - 2.0;
            surface.draw_text(line, Point::new(x + pad, baseline), &body);
        }

        y = rect.bottom() + config.box_gap;
    }

    // actions box
    let rect = Rect::new(x, y, width, plan.actions_box_height);
    surface.draw_rect(rect, &ShapeStyle::fill(palette::ACTIONS_BG), BOX_RADIUS);
    surface.draw_text(
        "SPECIFICATION ACTIONS",
        Point::new(x + pad, rect.y + pad + lh - 2.0),
        &TextStyle::new(config.small_font_size, FontWeight::Bold, palette::ACTIONS_ACCENT),
    );

    let budget = config.actions_max_lines.min(lines_that_fit(rect.height, config));
    let lines = fit_actions(
        &fact.actions,
        config.body_font_size,
        width - 2.0 * pad - BULLET_INDENT,
        budget,
    );
    for (i, line) in lines.iter().enumerate() {
        let baseline = rect.y + pad + lh * (i + 2) as f64 - 2.0;
        if line.bullet {
            surface.draw_text("•", Point::new(x + pad, baseline), &body);
        }
        surface.draw_text(&line.text, Point::new(x + pad + BULLET_INDENT, baseline), &body);
    }
}

// ============================================================================
// Right column
// ============================================================================

fn draw_right_column(surface: &mut dyn DrawSurface, fact: &MaterialFact, plan: &CardPlan, config: &SheetConfig) {
    let x = config.margin + config.left_column_width() + config.column_gap;
    let width = config.right_column_width();
    let mut cursor = plan.body_top;

    surface.draw_text(
        "LIFECYCLE IMPACT",
        Point::new(x, cursor + 10.0),
        &TextStyle::new(8.0, FontWeight::Bold, palette::TEXT),
    );
    surface.draw_text(
        fact.data_confidence.label(),
        Point::new(x + width, cursor + 10.0),
        &TextStyle::new(config.small_font_size, FontWeight::Regular, palette::TEXT_MUTED).aligned(Align::Right),
    );
    cursor += config.heading_height + config.box_gap;

    draw_lifecycle_radar(surface, Rect::new(x, cursor, width, plan.chart_height), &fact.lifecycle.scores);
    cursor += plan.chart_height + config.box_gap;

    draw_bar_list(surface, "MAJOR CONTRIBUTORS", &fact.lifecycle.hotspots, fact, x, cursor, width, config);
    cursor += config.list_block_height + config.box_gap;
    draw_bar_list(surface, "STRONGEST STAGES", &fact.lifecycle.strengths, fact, x, cursor, width, config);

    // insight box sits on the body bottom
    let rect = Rect::new(
        x,
        plan.bottom() - plan.insight_box_height,
        width,
        plan.insight_box_height,
    );
    surface.draw_rect(rect, &ShapeStyle::fill(palette::INSIGHT_BG), BOX_RADIUS);
    let max_lines = ((rect.height - 2.0 * config.box_padding) / config.line_height).floor().max(0.0) as usize;
    let lines = fit_text(
        &fact.insight,
        config.body_font_size,
        FontWeight::Regular,
        width - 2.0 * config.box_padding,
        max_lines,
    );
    let style = TextStyle::new(config.body_font_size, FontWeight::Regular, palette::TEXT);
    for (i, line) in lines.iter().enumerate() {
        let baseline = rect.y + config.box_padding + config.line_height * (i + 1) as f64 - 2.0;
        surface.draw_text(line, Point::new(x + config.box_padding, baseline), &style);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_bar_list(
    surface: &mut dyn DrawSurface,
    title: &str,
    stages: &[Stage; 2],
    fact: &MaterialFact,
    x: f64,
    top: f64,
    width: f64,
    config: &SheetConfig,
) {
    surface.draw_text(
        title,
        Point::new(x, top + 7.0),
        &TextStyle::new(config.small_font_size, FontWeight::Bold, palette::TEXT_MUTED),
    );

    let label_style = TextStyle::new(config.small_font_size, FontWeight::Regular, palette::TEXT);
    let track_x = x + BAR_LABEL_WIDTH;
    let track_width = (width - BAR_LABEL_WIDTH - SCORE_WIDTH).max(0.0);

    for (i, stage) in stages.iter().enumerate() {
        let row = top + 10.0 + i as f64 * BAR_ROW_HEIGHT;
        let score = fact.lifecycle.score(*stage).clamp(1, 5);

        surface.draw_text(stage.label(), Point::new(x, row + 7.0), &label_style);
        surface.draw_rect(
            Rect::new(track_x, row + 2.5, track_width, BAR_HEIGHT),
            &ShapeStyle::fill(palette::BAR_TRACK),
            BAR_HEIGHT / 2.0,
        );
        surface.draw_rect(
            Rect::new(track_x, row + 2.5, track_width * score as f64 / 5.0, BAR_HEIGHT),
            &ShapeStyle::fill(bar_color(score)),
            BAR_HEIGHT / 2.0,
        );
        surface.draw_text(
            &score.to_string(),
            Point::new(x + width, row + 7.0),
            &label_style.aligned(Align::Right),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactBuilder;
    use crate::lifecycle::{LifecycleData, MaterialCategory, MaterialRecord};
    use crate::render::fonts::ELLIPSIS;
    use crate::render::layout::plan_card;

    fn render(record: &MaterialRecord) -> RecordingSurface {
        let data = LifecycleData::builtin().unwrap();
        let builder = FactBuilder::new(&data, 60).unwrap();
        let fact = builder.build(record);
        let config = SheetConfig::default();
        let plan = plan_card(&fact, &config, config.margin);

        let mut surface = RecordingSurface::new();
        draw_card(&mut surface, &fact, &plan, &config);
        surface
    }

    #[test]
    fn test_bar_colors() {
        assert_eq!(bar_color(5), palette::ORANGE);
        assert_eq!(bar_color(3), palette::ORANGE);
        assert_eq!(bar_color(2), palette::YELLOW);
        assert_eq!(bar_color(1), palette::GREEN);
    }

    #[test]
    fn test_fit_actions_budget_and_ellipsis() {
        let actions = vec![
            "Short action".to_string(),
            "A much longer action that will certainly wrap over several lines of a narrow column".to_string(),
        ];
        let lines = fit_actions(&actions, 7.5, 80.0, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].bullet);
        assert!(lines[1].bullet);
        assert!(!lines[2].bullet);
        assert!(lines[2].text.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_fit_actions_drops_unstarted_bullet_without_ellipsis() {
        let actions = vec!["One".to_string(), "Two".to_string(), "Three".to_string()];
        let lines = fit_actions(&actions, 7.5, 200.0, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "Two");
    }

    #[test]
    fn test_card_draws_all_regions() {
        let record = MaterialRecord::new("clt-panel", "CLT panel", "Cross laminated timber.", MaterialCategory::Structure);
        let surface = render(&record);
        let texts = surface.texts();

        for expected in ["CLT panel", "LIFECYCLE IMPACT", "MAJOR CONTRIBUTORS", "STRONGEST STAGES", "SPECIFICATION ACTIONS", "RISKS"] {
            assert!(texts.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_bad_image_falls_back_to_placeholder() {
        let mut record = MaterialRecord::new("oak", "Oak", "", MaterialCategory::Floor);
        record.image = Some("not a data uri".to_string());
        let surface = render(&record);

        assert!(!surface.commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        assert!(surface.texts().contains(&"O"));
    }

    #[test]
    fn test_chips_right_justified_in_order() {
        let record = MaterialRecord::new("steel-frame", "Steel frame", "", MaterialCategory::Structure)
            .with_carbon(CarbonIntensity::High);
        let surface = render(&record);

        let chip_x = |label: &str| {
            surface.commands.iter().find_map(|c| match c {
                DrawCommand::Text { text, at, .. } if text == label => Some(at.x),
                _ => None,
            })
        };
        let category = chip_x("Structure").unwrap();
        let carbon = chip_x("High carbon").unwrap();
        assert!(category < carbon);
    }
}
