//! Sheet Integration Tests
//!
//! Runs the full pipeline (catalogue JSON → facts → layout → drawing) against
//! the recording and PDF surfaces, plus a seeded fuzz of the footer bound.

use base64::Engine;
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, RgbImage};
use moodboard_lab::render::layout::{footer_clearance, plan_page};
use moodboard_lab::render::surface::DrawCommand;
use moodboard_lab::{
    render_sheets_dated, FactBuilder, LifecycleData, MaterialCategory, MaterialFact, MaterialRecord, PdfSurface,
    RecordingSurface, SheetConfig, Stage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;

const CATALOGUE: &str = r#"[
    {"id": "steel-frame", "name": "Steel frame", "description": "Hot-rolled steel sections for the primary frame.",
     "category": "structure", "carbonIntensity": "high"},
    {"id": "clt-panel", "name": "CLT panel", "description": "Cross laminated timber floor and wall panels.",
     "category": "structure", "carbonIntensity": "low", "keywords": ["timber", "mass timber"]},
    {"id": "microcement-finish", "name": "Microcement", "description": "Seamless trowelled floor finish.",
     "category": "microcement"}
]"#;

const WORDS: &[&str] = &[
    "recycled", "aggregate", "terrazzo", "panel", "oak", "veneer", "acoustic", "lime", "render", "brick",
    "slip", "polished", "concrete", "hemp", "fibre", "board", "glazed", "ceramic", "tile", "natural",
];

// ids with and without curated health notes
const IDS: &[&str] = &["microcement-finish", "mdf-joinery", "clt-panel", "oak-floor", "brick-slip", "hemp-board"];

fn render_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

fn catalogue() -> Vec<MaterialRecord> {
    serde_json::from_str(CATALOGUE).unwrap()
}

fn build(records: &[MaterialRecord]) -> Vec<MaterialFact> {
    let data = LifecycleData::builtin().unwrap();
    FactBuilder::new(&data, 60).unwrap().build_all(records)
}

fn png_data_uri() -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(24, 16, image::Rgb([120, 90, 60])));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(bytes))
}

fn random_record(rng: &mut StdRng, index: usize) -> MaterialRecord {
    let word_count = rng.gen_range(0..120);
    let description: Vec<&str> = (0..word_count).map(|_| WORDS[rng.gen_range(0..WORDS.len())]).collect();
    let name_words: Vec<&str> = (0..rng.gen_range(1..8)).map(|_| WORDS[rng.gen_range(0..WORDS.len())]).collect();
    let category = MaterialCategory::ALL[rng.gen_range(0..MaterialCategory::ALL.len())];

    let id = if rng.gen_bool(0.5) {
        IDS[rng.gen_range(0..IDS.len())].to_string()
    } else {
        format!("random-{}", index)
    };
    let mut record = MaterialRecord::new(&id, &name_words.join(" "), &description.join(" "), category);
    if rng.gen_bool(0.3) {
        record.finish = Some(WORDS[rng.gen_range(0..WORDS.len())].to_string());
    }
    record
}

#[test]
fn test_footer_clearance_holds_under_fuzzed_content() {
    let config = SheetConfig::default();
    let data = LifecycleData::builtin().unwrap();
    let builder = FactBuilder::new(&data, 60).unwrap();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..300 {
        let first = builder.build(&random_record(&mut rng, round * 2));
        let second = builder.build(&random_record(&mut rng, round * 2 + 1));
        let plan = plan_page(&first, Some(&second), &config);

        let card1 = &plan.cards[1];
        let clearance = footer_clearance(card1.bottom(), &config);
        assert!(
            clearance >= config.min_footer_clearance - 1e-9,
            "round {}: clearance {:.2} below {}",
            round,
            clearance,
            config.min_footer_clearance
        );

        // body never grows past the absorber caps
        for card in &plan.cards {
            assert!(card.body_height <= config.body_height + config.max_insight_shrink + config.max_chart_shrink + 1e-9);
            assert!(card.chart_height >= config.min_chart_height);
        }
    }
}

#[test]
fn test_catalogue_to_recorded_sheet() {
    let facts = build(&catalogue());
    let steel = &facts[0];
    assert_eq!(steel.lifecycle.scores, [4, 4, 2, 2, 1, 2, 2]);
    assert_eq!(steel.lifecycle.hotspots, [Stage::Raw, Stage::Manufacturing]);

    let mut surface = RecordingSurface::new();
    let pages = render_sheets_dated(&mut surface, &facts, &SheetConfig::default(), render_date());

    // odd count: second page holds a lone card
    assert_eq!(pages, 2);
    let texts = surface.texts();
    for name in ["Steel frame", "CLT panel", "Microcement"] {
        assert!(texts.contains(&name), "missing card for {}", name);
    }
    assert!(texts.contains(&"Page 2 of 2"));
    assert!(texts.contains(&"20 November 2024"));

    let second_page = surface
        .commands
        .iter()
        .skip_while(|c| !matches!(c, DrawCommand::BeginPage))
        .skip(1)
        .skip_while(|c| !matches!(c, DrawCommand::BeginPage))
        .filter(|c| matches!(c, DrawCommand::Text { text, .. } if text == "LIFECYCLE IMPACT"))
        .count();
    assert_eq!(second_page, 1);
}

#[test]
fn test_bad_thumbnail_is_skipped() {
    let mut records = catalogue();
    records[0].image = Some("data:image/png;base64,not-really-png".to_string());
    records[1].image = Some("https://example.com/clt.png".to_string());
    let facts = build(&records);

    let mut pdf = PdfSurface::for_config(&SheetConfig::default());
    let pages = render_sheets_dated(&mut pdf, &facts, &SheetConfig::default(), render_date());
    assert_eq!(pages, 2);
    assert!(pdf.to_bytes().is_ok());
}

#[test]
fn test_pdf_output() {
    let mut records = catalogue();
    records[0].image = Some(png_data_uri());
    let facts = build(&records);

    let config = SheetConfig::default();
    let mut pdf = PdfSurface::for_config(&config);
    render_sheets_dated(&mut pdf, &facts, &config, render_date());
    let bytes = pdf.to_bytes().unwrap();

    assert!(bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_facts_json_is_deterministic() {
    let records = catalogue();
    let a = serde_json::to_string(&build(&records)).unwrap();
    let b = serde_json::to_string(&build(&records)).unwrap();
    assert_eq!(a, b);
    assert!(a.contains("\"dataConfidence\""));
}
