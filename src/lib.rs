//! Moodboard Lab material sheets
//!
//! Derives lifecycle facts for moodboard materials and lays them out as
//! two-card A4 specification sheets.
//!
//! - `lifecycle/`: reference data, rule resolution, profile seeding
//! - `facts/`: per-material fact derivation
//! - `render/`: layout engine, radar chart, card and PDF rendering
//! - `config`: sheet layout constants
//!
//! Fact derivation is deterministic: the same catalogue and reference data
//! always produce the same facts and the same page layout.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod facts;
pub mod render;

// Re-export commonly used types
pub use config::SheetConfig;
pub use error::{DataError, FactError, LifecycleError, SurfaceError};
pub use facts::{FactBuilder, MaterialFact};
pub use lifecycle::{LifecycleData, LifecycleResolver, MaterialCategory, MaterialRecord, Stage};
pub use render::{render_sheets, render_sheets_dated, DrawSurface, PdfSurface, RecordingSurface};
