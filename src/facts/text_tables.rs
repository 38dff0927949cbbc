//! Sentence tables for fact sheets
//!
//! Static copy used by the fact builder: typical uses and performance notes
//! per category, per-function fallback notes, stage reduction phrases and
//! specification actions.

use crate::lifecycle::types::{MaterialCategory, Stage};

/// Up to three typical applications per category.
pub fn typical_uses(category: MaterialCategory) -> &'static [&'static str] {
    use MaterialCategory as C;
    match category {
        C::Structure => &["Primary frames", "Floor and roof decks", "Load-bearing walls"],
        C::ExposedStructure => &["Exposed frames", "Feature soffits", "Visible columns and beams"],
        C::Floor => &["Living spaces", "Circulation", "Commercial interiors"],
        C::WallInternal => &["Partitions", "Feature walls", "Lining systems"],
        C::External => &["Facade cladding", "Rainscreens", "Boundary walls"],
        C::Ceiling => &["Suspended ceilings", "Exposed soffit linings", "Acoustic ceilings"],
        C::Soffit => &["Canopies", "Overhangs", "External soffits"],
        C::Window => &["Facade glazing", "Rooflights", "Screens"],
        C::Door => &["Entrance doors", "Internal doors", "Screens"],
        C::Roof => &["Pitched roofs", "Flat roofs", "Canopies"],
        C::Finish => &["Wall finishes", "Joinery faces", "Feature surfaces"],
        C::PaintWall => &["Walls", "Feature colours", "Refurbishment"],
        C::PaintCeiling => &["Ceilings", "Soffits"],
        C::Plaster => &["Internal walls", "Ceilings", "Heritage repair"],
        C::Microcement => &["Seamless floors", "Wet rooms", "Worktops"],
        C::TimberPanel => &["Wall linings", "Ceilings", "Joinery"],
        C::Tile => &["Bathrooms", "Kitchens", "Floors"],
        C::Wallpaper => &["Feature walls", "Bedrooms", "Hospitality interiors"],
        C::AcousticPanel => &["Offices", "Classrooms", "Restaurants"],
        C::TimberSlat => &["Ceilings", "Screens", "Wall linings"],
        C::Joinery => &["Kitchens", "Storage", "Built-in furniture"],
        C::Fixture => &["Lighting", "Sanitaryware", "Ironmongery"],
        C::Landscape => &["Gardens", "Public realm", "Biodiversity net gain"],
        C::Insulation => &["Walls", "Roofs", "Floors"],
        C::Balustrade => &["Stairs", "Balconies", "Galleries"],
    }
}

/// Category-specific performance note, where one is curated.
pub fn category_performance_note(category: MaterialCategory) -> Option<&'static str> {
    use MaterialCategory as C;
    let note = match category {
        C::Structure | C::ExposedStructure => {
            "Carries building loads; sizing and fire strategy set by the structural engineer."
        }
        C::Window => "Thermal and daylight performance depend on the whole window, not the glass alone.",
        C::Roof => "Primary weather line; detailing at edges and penetrations governs service life.",
        C::Insulation => "Thermal performance depends on continuous installation without gaps.",
        C::Plaster => "Breathable finishes help regulate humidity in solid walls.",
        C::Microcement => "Thin seamless layer; performance relies on a stable, crack-free substrate.",
        C::Tile => "Hard-wearing and water resistant; grout and adhesive choice drive durability.",
        C::AcousticPanel => "Absorbs mid and high frequencies; coverage area matters more than thickness.",
        C::Landscape => "Living element; establishment care in the first years determines success.",
        C::PaintWall | C::PaintCeiling => "Low-VOC formulations improve indoor air quality during curing.",
        _ => return None,
    };
    Some(note)
}

/// Function inferred from keywords, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFunction {
    Insulation,
    Weatherproofing,
    Acoustic,
    Structural,
    Surface,
    Decorative,
}

impl MaterialFunction {
    pub const PRIORITY: [MaterialFunction; 6] = [
        MaterialFunction::Insulation,
        MaterialFunction::Weatherproofing,
        MaterialFunction::Acoustic,
        MaterialFunction::Structural,
        MaterialFunction::Surface,
        MaterialFunction::Decorative,
    ];

    /// Case-insensitive keyword pattern.
    pub fn pattern(&self) -> &'static str {
        match self {
            MaterialFunction::Insulation => r"\b(insulat\w*|thermal|u-value|mineral wool|wood ?fib(re|er))",
            MaterialFunction::Weatherproofing => r"\b(waterproof\w*|weather\w*|membrane|cladding|render|rainscreen)",
            MaterialFunction::Acoustic => r"\b(acoustic|sound|absorb\w*|reverb\w*)",
            MaterialFunction::Structural => r"\b(structur\w*|load[- ]bearing|frame|beam|column|slab)",
            MaterialFunction::Surface => r"\b(floor\w*|surface|worktop|tiles?|finish\w*|wear)",
            MaterialFunction::Decorative => r"\b(decorative|feature|pattern\w*|colou?r\w*|texture)",
        }
    }

    pub fn performance_note(&self) -> &'static str {
        match self {
            MaterialFunction::Insulation => "Reduces heat loss; check thickness against the target U-value.",
            MaterialFunction::Weatherproofing => "Sheds water and protects the build-up behind; detail joints carefully.",
            MaterialFunction::Acoustic => "Controls reverberation; confirm absorption class for the room use.",
            MaterialFunction::Structural => "Load-bearing role; confirm spans and fire rating with the engineer.",
            MaterialFunction::Surface => "Exposed to wear; check slip and abrasion ratings for the location.",
            MaterialFunction::Decorative => "Primarily aesthetic; confirm colourfastness and cleaning regime.",
        }
    }
}

pub const GENERIC_PERFORMANCE_NOTE: &str =
    "Confirm performance data with the manufacturer for the intended application.";

/// Phrase completing "reduce via ..." for a hotspot stage.
pub fn stage_reduction_phrase(stage: Stage) -> &'static str {
    match stage {
        Stage::Raw => "lower-carbon or recycled feedstock",
        Stage::Manufacturing => "low-carbon production routes and product-specific EPDs",
        Stage::Transport => "local sourcing and consolidated deliveries",
        Stage::Installation => "dry fixings and reduced site waste",
        Stage::InUse => "low-emission, low-energy operation",
        Stage::Maintenance => "durable finishes and longer maintenance intervals",
        Stage::EndOfLife => "design for disassembly and take-back schemes",
    }
}

/// Type rule: if the pattern (or one of the categories) matches, the action applies.
pub struct ActionRule {
    pub pattern: &'static str,
    pub categories: &'static [MaterialCategory],
    pub action: &'static str,
}

/// Evaluated in order; every matching rule contributes once.
pub static ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        pattern: r"\b(steel|metal|alumin\w*|zinc|copper)\b",
        categories: &[],
        action: "Specify high recycled content (EAF steel or secondary aluminium)",
    },
    ActionRule {
        pattern: r"\b(timber|wood|clt|glulam|oak|larch|cedar|plywood|ash|birch)\b",
        categories: &[],
        action: "Require FSC or PEFC certified timber with chain of custody",
    },
    ActionRule {
        pattern: r"\b(concrete|cement|screed)\b",
        categories: &[],
        action: "Specify GGBS or PFA cement replacement to cut clinker content",
    },
    ActionRule {
        pattern: r"\b(glass|glaz\w*)",
        categories: &[MaterialCategory::Window],
        action: "Target a low whole-window U-value and recycled glass content",
    },
    ActionRule {
        pattern: r"\binsulat\w*",
        categories: &[MaterialCategory::Insulation],
        action: "Compare embodied carbon against bio-based insulation alternatives",
    },
];

/// Used to pad the action list to three entries.
pub static GENERIC_ACTIONS: &[&str] = &[
    "Request a product-specific EPD (EN 15804 +A2)",
    "Confirm take-back or reuse routes at end of life",
    "Set out to standard sizes to minimise offcuts",
];
