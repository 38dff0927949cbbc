//! Builtin lifecycle tables
//!
//! Embedded rows compiled into `LifecycleData` by `LifecycleData::builtin()`.
//! Rows use plain `'static` data; patterns are compiled (and validated) at
//! construction time, never on first use.
//!
//! Override rows are ORDERED: the first matching row wins, so narrow patterns
//! must be declared before broad ones.

use crate::lifecycle::types::{Confidence, EpdStatus, HealthRisk, MaterialCategory, PaybackCategory};
use crate::lifecycle::types::MaterialCategory as C;

/// Carbon payback payload of a builtin row.
#[derive(Debug, Clone, Copy)]
pub struct PaybackRow {
    pub years: u32,
    pub range: Option<[u32; 2]>,
    pub category: PaybackCategory,
    pub assumption: &'static str,
}

/// One default duration per category (total coverage).
#[derive(Debug, Clone, Copy)]
pub struct CategoryDefaultRow {
    pub category: MaterialCategory,
    pub service_life: u32,
    pub replacement_cycle: u32,
    pub partial: Option<f64>,
    pub notes: &'static str,
}

/// Pattern-based duration override.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRow {
    pub label: &'static str,
    pub pattern: &'static str,
    pub categories: &'static [MaterialCategory], // empty = any category
    pub service_life: u32,
    pub replacement_cycle: u32,
    pub partial: Option<f64>,
    pub payback: Option<PaybackRow>,
    pub notes: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileRow {
    pub id: &'static str,
    pub impacts: [u8; 7],
    pub confidences: [Confidence; 7],
}

#[derive(Debug, Clone, Copy)]
pub struct HealthRow {
    pub id: &'static str,
    pub risk: HealthRisk,
    pub concerns: &'static [&'static str],
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceLifeRow {
    pub label: &'static str,
    pub pattern: &'static str,
    pub years: u32,
}

const H: Confidence = Confidence::High;
const M: Confidence = Confidence::Medium;
const L: Confidence = Confidence::Low;

const fn cat(
    category: MaterialCategory,
    service_life: u32,
    replacement_cycle: u32,
    partial: Option<f64>,
    notes: &'static str,
) -> CategoryDefaultRow {
    CategoryDefaultRow { category, service_life, replacement_cycle, partial, notes }
}

const fn biogenic(assumption: &'static str) -> Option<PaybackRow> {
    Some(PaybackRow { years: 0, range: None, category: PaybackCategory::BiogenicStorage, assumption })
}

// ============================================================================
// CATEGORY DEFAULTS (service life / replacement cycle in years)
// ============================================================================

pub static CATEGORY_DEFAULTS: &[CategoryDefaultRow] = &[
    cat(C::Structure, 60, 60, None, "Lasts the life of the building"),
    cat(C::ExposedStructure, 60, 60, None, "Lasts the life of the building"),
    cat(C::Floor, 30, 25, None, ""),
    cat(C::WallInternal, 40, 30, None, ""),
    cat(C::External, 40, 40, None, ""),
    cat(C::Ceiling, 30, 25, None, ""),
    cat(C::Soffit, 40, 40, None, ""),
    cat(C::Window, 30, 30, None, "Frames and seals set the cycle"),
    cat(C::Door, 30, 30, None, ""),
    cat(C::Roof, 40, 40, None, ""),
    cat(C::Finish, 15, 12, None, ""),
    cat(C::PaintWall, 10, 8, None, "Recoat cycle"),
    cat(C::PaintCeiling, 12, 10, None, "Recoat cycle"),
    cat(C::Plaster, 40, 40, Some(0.3), "Local repair rather than full renewal"),
    cat(C::Microcement, 20, 15, None, ""),
    cat(C::TimberPanel, 30, 25, None, ""),
    cat(C::Tile, 40, 30, Some(0.25), "Damaged tiles replaced individually"),
    cat(C::Wallpaper, 12, 10, None, ""),
    cat(C::AcousticPanel, 20, 15, None, ""),
    cat(C::TimberSlat, 30, 25, None, ""),
    cat(C::Joinery, 25, 20, None, ""),
    cat(C::Fixture, 20, 15, None, ""),
    cat(C::Landscape, 60, 60, None, "Established once and maintained"),
    cat(C::Insulation, 60, 60, None, "Protected within the build-up"),
    cat(C::Balustrade, 40, 40, None, ""),
];

// ============================================================================
// DURATION OVERRIDES (first match wins)
// ============================================================================

pub static DURATION_OVERRIDES: &[OverrideRow] = &[
    OverrideRow {
        label: "cross-laminated timber",
        pattern: r"\b(clt|cross[- ]laminated)\b",
        categories: &[C::Structure, C::ExposedStructure],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: biogenic("Carbon stored in timber at harvest; assumes certified forestry"),
        notes: "",
    },
    OverrideRow {
        label: "glulam",
        pattern: r"\bglulam\b",
        categories: &[],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: biogenic("Carbon stored in laminated timber; assumes certified forestry"),
        notes: "",
    },
    OverrideRow {
        label: "timber cladding",
        pattern: r"\b(larch|cedar|timber)\b.*\bcladding\b|\bcladding\b.*\b(larch|cedar|timber)\b",
        categories: &[C::External],
        service_life: 40,
        replacement_cycle: 40,
        partial: Some(0.3),
        payback: biogenic("Carbon stored in cladding boards while in service"),
        notes: "Boards replaced locally as they weather",
    },
    OverrideRow {
        label: "hemp",
        pattern: r"\bhemp(crete)?\b",
        categories: &[],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: biogenic("Hemp shiv sequesters carbon during a single growing season"),
        notes: "",
    },
    OverrideRow {
        label: "cork",
        pattern: r"\bcork\b",
        categories: &[],
        service_life: 40,
        replacement_cycle: 30,
        partial: None,
        payback: biogenic("Bark harvested without felling; carbon stored in granules"),
        notes: "",
    },
    OverrideRow {
        label: "wood fibre insulation",
        pattern: r"\bwood[- ]?fib(re|er)\b",
        categories: &[C::Insulation],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: biogenic("Carbon stored in wood fibre for the life of the build-up"),
        notes: "",
    },
    OverrideRow {
        label: "foam insulation",
        pattern: r"\b(pir|pur|phenolic|polyiso)",
        categories: &[C::Insulation],
        service_life: 50,
        replacement_cycle: 50,
        partial: None,
        payback: Some(PaybackRow {
            years: 1,
            range: Some([1, 2]),
            category: PaybackCategory::OperationalOffset,
            assumption: "Heating energy saved against an uninsulated reference wall",
        }),
        notes: "",
    },
    OverrideRow {
        label: "solar photovoltaic",
        pattern: r"\b(pv|photovoltaic|solar)\b",
        categories: &[C::Roof, C::External],
        service_life: 25,
        replacement_cycle: 25,
        partial: None,
        payback: Some(PaybackRow {
            years: 2,
            range: Some([1, 3]),
            category: PaybackCategory::OperationalOffset,
            assumption: "UK irradiance and grid-average displaced electricity",
        }),
        notes: "Inverters typically replaced at 12-15 years",
    },
    OverrideRow {
        label: "triple glazing",
        pattern: r"\btriple[- ]glaz",
        categories: &[],
        service_life: 35,
        replacement_cycle: 35,
        partial: None,
        payback: Some(PaybackRow {
            years: 4,
            range: Some([3, 6]),
            category: PaybackCategory::OperationalOffset,
            assumption: "Heating energy saved versus double glazing",
        }),
        notes: "",
    },
    OverrideRow {
        label: "green roof",
        pattern: r"\b(green|sedum|biodiverse) roof\b",
        categories: &[],
        service_life: 40,
        replacement_cycle: 40,
        partial: None,
        payback: Some(PaybackRow {
            years: 8,
            range: Some([5, 12]),
            category: PaybackCategory::EcosystemSequestration,
            assumption: "Sequestration in substrate and planting; excludes irrigation",
        }),
        notes: "Protects the membrane beneath",
    },
    OverrideRow {
        label: "tree and hedge planting",
        pattern: r"\b(trees?|hedgerow|hedges?)\b",
        categories: &[C::Landscape],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: Some(PaybackRow {
            years: 15,
            range: Some([10, 25]),
            category: PaybackCategory::EcosystemSequestration,
            assumption: "Sequestration by maturing planting with 90% establishment",
        }),
        notes: "",
    },
    OverrideRow {
        label: "meadow planting",
        pattern: r"\b(meadow|wildflower)\b",
        categories: &[],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: Some(PaybackRow {
            years: 0,
            range: None,
            category: PaybackCategory::EcosystemSequestration,
            assumption: "Soil carbon gain from the first growing season",
        }),
        notes: "",
    },
    OverrideRow {
        label: "linoleum",
        pattern: r"\b(linoleum|marmoleum)\b",
        categories: &[C::Floor],
        service_life: 25,
        replacement_cycle: 25,
        partial: None,
        payback: biogenic("Linseed oil and wood flour store biogenic carbon"),
        notes: "",
    },
    OverrideRow {
        label: "carpet",
        pattern: r"\bcarpet",
        categories: &[C::Floor],
        service_life: 10,
        replacement_cycle: 10,
        partial: None,
        payback: None,
        notes: "",
    },
    OverrideRow {
        label: "polished concrete",
        pattern: r"\bpolished concrete\b",
        categories: &[C::Floor],
        service_life: 60,
        replacement_cycle: 60,
        partial: None,
        payback: None,
        notes: "Uses the slab as the finish",
    },
    OverrideRow {
        label: "oiled timber",
        pattern: r"\boil(ed)?\b",
        categories: &[C::Floor, C::TimberPanel, C::Finish],
        service_life: 30,
        replacement_cycle: 25,
        partial: Some(0.15),
        payback: None,
        notes: "Periodic re-oiling rather than replacement",
    },
    OverrideRow {
        label: "lime plaster",
        pattern: r"\blime\b",
        categories: &[C::Plaster, C::Finish, C::PaintWall],
        service_life: 50,
        replacement_cycle: 50,
        partial: Some(0.2),
        payback: None,
        notes: "Breathable; repaired locally",
    },
];

// ============================================================================
// SERVICE LIFE (first match wins, then partial category table)
// ============================================================================

pub static SERVICE_LIFE_OVERRIDES: &[ServiceLifeRow] = &[
    ServiceLifeRow { label: "brick", pattern: r"\b(brick|clay tile)s?\b", years: 100 },
    ServiceLifeRow { label: "slate", pattern: r"\bslate\b", years: 80 },
    ServiceLifeRow { label: "zinc or copper", pattern: r"\b(zinc|copper)\b", years: 80 },
    ServiceLifeRow { label: "stainless steel", pattern: r"\bstainless\b", years: 60 },
    ServiceLifeRow { label: "epdm membrane", pattern: r"\bepdm\b", years: 30 },
    ServiceLifeRow { label: "vinyl", pattern: r"\b(vinyl|lvt)\b", years: 15 },
    ServiceLifeRow { label: "carpet", pattern: r"\bcarpet", years: 10 },
];

pub static CATEGORY_SERVICE_LIFE: &[(MaterialCategory, u32)] = &[
    (C::Structure, 60),
    (C::ExposedStructure, 60),
    (C::External, 40),
    (C::Roof, 40),
    (C::Window, 30),
    (C::Door, 30),
    (C::Insulation, 60),
    (C::Floor, 25),
    (C::Tile, 40),
    (C::Plaster, 40),
    (C::Balustrade, 40),
];

// ============================================================================
// LANDSCAPE CLASSIFICATION
// ============================================================================

pub static LANDSCAPE_IDS: &[&str] = &[
    "green-roof-sedum",
    "living-wall",
    "rain-garden",
    "planted-gravel",
];

pub const LANDSCAPE_PATTERN: &str =
    r"(?i)\b(planting|meadow|wildflower|hedgerow|hedges?|turf|lawn|green roof|living wall|rain garden|bioswale|trees?|shrubs?)\b";

// ============================================================================
// CURATED PER-MATERIAL DATA
// ============================================================================

pub static PROFILES: &[ProfileRow] = &[
    ProfileRow { id: "clt-panel", impacts: [1, 2, 2, 2, 1, 1, 2], confidences: [H, H, M, H, H, M, M] },
    ProfileRow { id: "recycled-steel-frame", impacts: [3, 4, 3, 2, 1, 1, 1], confidences: [H, H, M, H, H, H, H] },
    ProfileRow { id: "hempcrete-block", impacts: [1, 1, 2, 2, 1, 1, 1], confidences: [H, M, M, M, H, H, M] },
    ProfileRow { id: "terrazzo-tile", impacts: [3, 4, 3, 3, 1, 1, 2], confidences: [H, H, M, H, H, H, M] },
    ProfileRow { id: "clay-plaster", impacts: [1, 1, 1, 2, 1, 2, 1], confidences: [H, H, H, M, H, M, H] },
    ProfileRow { id: "cork-flooring", impacts: [1, 2, 3, 2, 1, 2, 1], confidences: [H, H, M, H, H, M, M] },
    ProfileRow { id: "triple-glazed-window", impacts: [3, 4, 3, 2, 1, 1, 3], confidences: [H, H, M, H, H, H, M] },
    ProfileRow { id: "green-roof-sedum", impacts: [2, 2, 2, 3, 1, 3, 2], confidences: [M, M, M, M, H, M, L] },
    ProfileRow { id: "microcement-finish", impacts: [3, 4, 2, 3, 1, 2, 3], confidences: [M, M, M, H, H, M, L] },
    ProfileRow { id: "lime-wash", impacts: [2, 2, 2, 1, 1, 3, 1], confidences: [H, M, H, H, H, H, H] },
];

pub static SPEC_ACTIONS: &[(&str, &[&str])] = &[
    ("clt-panel", &[
        "Request FSC/PEFC chain-of-custody certificates for all panels",
        "Confirm adhesive type (formaldehyde-free) in the panel EPD",
        "Protect panels from wetting during erection; specify a moisture plan",
    ]),
    ("recycled-steel-frame", &[
        "Specify minimum 90% recycled content via EAF production",
        "Design connections for disassembly and section reuse",
        "Request a product-specific EPD (EN 15804 +A2)",
    ]),
    ("microcement-finish", &[
        "Specify a water-based, low-VOC sealer system",
        "Confirm substrate movement joints before application",
    ]),
    ("triple-glazed-window", &[
        "Specify whole-window U-value of 0.8 W/m2K or better",
        "Request recycled cullet content for the glass units",
        "Confirm frame material has a take-back scheme",
    ]),
];

pub static HEALTH_NOTES: &[HealthRow] = &[
    HealthRow {
        id: "microcement-finish",
        risk: HealthRisk::Medium,
        concerns: &["Polymer-modified binder", "Solvent-based sealers"],
        note: "Specify low-VOC sealers and ventilate during curing.",
    },
    HealthRow {
        id: "mdf-joinery",
        risk: HealthRisk::Medium,
        concerns: &["Formaldehyde-based resin"],
        note: "Specify E0 or NAF boards and seal all edges.",
    },
    HealthRow {
        id: "vinyl-flooring",
        risk: HealthRisk::High,
        concerns: &["Plasticisers", "PVC end-of-life emissions"],
        note: "Prefer phthalate-free products with third-party emission testing.",
    },
    HealthRow {
        id: "lime-wash",
        risk: HealthRisk::Low,
        concerns: &["Caustic when wet"],
        note: "Use eye and skin protection during application only.",
    },
    HealthRow {
        id: "clay-plaster",
        risk: HealthRisk::Low,
        concerns: &[],
        note: "Inert once dry; buffers indoor humidity.",
    },
];

pub static RISKS: &[(&str, &[(&str, &str)])] = &[
    ("clt-panel", &[
        ("Moisture uptake during construction", "Temporary weather protection and moisture monitoring"),
        ("Acoustic flanking through panel joints", "Resilient layers at junctions"),
    ]),
    ("microcement-finish", &[
        ("Hairline cracking over moving substrates", "Decoupling membrane and movement joints"),
    ]),
    ("green-roof-sedum", &[
        ("Waterproofing failure beneath planting", "Leak detection and root barrier"),
        ("Establishment failure in drought", "Irrigation for the first summer"),
    ]),
    ("cork-flooring", &[
        ("UV fading near glazing", "UV-stable finish or solar control"),
    ]),
];

pub static INSIGHTS: &[(&str, &str)] = &[
    ("clt-panel", "Stores more carbon than it emits in production; the main lever is keeping panels dry so they never need early replacement."),
    ("recycled-steel-frame", "Manufacturing dominates; EAF steel with high recycled content roughly halves the frame's embodied carbon."),
    ("green-roof-sedum", "Installation and upkeep matter more than materials; a robust membrane and first-year care secure the biodiversity benefit."),
];

pub static EPD_STATUS: &[(&str, EpdStatus)] = &[
    ("clt-panel", EpdStatus::Available),
    ("recycled-steel-frame", EpdStatus::Available),
    ("cork-flooring", EpdStatus::Available),
    ("microcement-finish", EpdStatus::Generic),
];
