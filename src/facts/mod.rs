//! Material facts
//!
//! Render-facing view of a material: summary text, lifecycle scores and
//! rankings, insight, specification actions and data-quality flags.

pub mod types;
pub mod text_tables;
pub mod builder;

pub use builder::{clamp_impact, rank_stages, FactBuilder, DEFAULT_PROFILE};
pub use types::{DataConfidence, LifecycleSummary, MaterialFact, SystemRole};
