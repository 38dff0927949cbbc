//! Sheet rendering
//!
//! - `surface`: drawing trait and the recording backend
//! - `fonts`: Helvetica metrics, wrapping and clamping
//! - `radar`: lifecycle radar geometry and drawing
//! - `layout`: pure page/card layout arithmetic
//! - `card`, `sheet`: draw cards and pages from a layout plan
//! - `pdf`: lopdf backend

pub mod surface;
pub mod fonts;
pub mod radar;
pub mod layout;
pub mod card;
pub mod sheet;
pub mod pdf;

pub use layout::{plan_card, plan_page, CardPlan, PagePlan};
pub use pdf::PdfSurface;
pub use radar::{draw_lifecycle_radar, radar_geometry, radar_point};
pub use sheet::{render_sheets, render_sheets_dated};
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};

/// Sheet colours.
pub mod palette {
    use super::surface::Color;

    pub const TEXT: Color = Color::rgb(33, 37, 41);
    pub const TEXT_MUTED: Color = Color::rgb(96, 104, 112);
    pub const TEXT_FAINT: Color = Color::rgb(160, 166, 172);
    pub const RULE: Color = Color::rgb(210, 214, 218);
    pub const GRID: Color = Color::rgb(206, 210, 214);
    pub const BAR_TRACK: Color = Color::rgb(235, 237, 239);

    pub const CARD_BG: Color = Color::rgb(246, 245, 242);
    pub const PLACEHOLDER: Color = Color::rgb(226, 224, 219);
    pub const CHIP_BG: Color = Color::rgb(232, 230, 225);

    pub const HEALTH_BG: Color = Color::rgb(226, 243, 241);
    pub const HEALTH_ACCENT: Color = Color::rgb(23, 120, 110);
    pub const ACTIONS_BG: Color = Color::rgb(230, 244, 230);
    pub const ACTIONS_ACCENT: Color = Color::rgb(46, 125, 50);
    pub const INSIGHT_BG: Color = Color::rgb(241, 240, 250);

    pub const RADAR_FILL: Color = Color::rgb(250, 214, 180);
    pub const RADAR_STROKE: Color = Color::rgb(230, 120, 40);

    pub const ORANGE: Color = Color::rgb(239, 125, 51);
    pub const YELLOW: Color = Color::rgb(242, 192, 55);
    pub const GREEN: Color = Color::rgb(92, 170, 96);
}
