//! Lifecycle data and resolution
//!
//! - `types`: material records, stages, profiles, durations
//! - `tables`: builtin lookup rows
//! - `data`: compiled, validated `LifecycleData`
//! - `resolver`: duration resolution, landscape logic, multipliers
//! - `seeding`: template profiles for uncurated materials

pub mod types;
pub mod tables;
pub mod data;
pub mod resolver;
pub mod seeding;

pub use data::{LifecycleData, LifecycleDataFile};
pub use resolver::{
    format_carbon_payback, LifecycleResolver, RuleMatch, DEFAULT_BUILDING_LIFE,
    LANDSCAPE_MAINTENANCE_FACTOR,
};
pub use seeding::{classify_material_type, seed_missing_profiles, MaterialType, SeededProfile};
pub use types::*;
