//! # Options Bag
//!
//! Everything beyond geometry, support and condition that changes the
//! estimate: openings, metalwork lengths, retail frontage, doors, dormers,
//! pre-detected defects.
//!
//! Every field has a zero default (`#[serde(default)]`), so a sparse or empty
//! JSON object is a valid bag. Pricing skips fields at zero; it never fails
//! on them.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "large_windows": 3,
//!   "railing_length_m": 22.5,
//!   "has_retail": true,
//!   "retail_frontage_m": 15.0,
//!   "door": "carriage_door",
//!   "period_style": true
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::{derive_geometry, BuildingKind, GeometryInput};
use crate::errors::{EstimateError, EstimateResult};
use crate::services::BuildingContext;

/// Street door treated with the façade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorType {
    #[default]
    None,
    /// Standard entry door
    EntryDoor,
    /// Large carriage door (porte cochère)
    CarriageDoor,
}

impl DoorType {
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "" | "none" | "aucune" => Ok(DoorType::None),
            "entry" | "entry_door" | "porte_entree" => Ok(DoorType::EntryDoor),
            "carriage" | "carriage_door" | "porte_cochere" => Ok(DoorType::CarriageDoor),
            _ => Err(EstimateError::invalid_input("door", s, "Door must be none, entry or carriage")),
        }
    }
}

/// Typed options with documented zero defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsBag {
    /// Windows up to roughly 1.2 m wide
    pub small_windows: u32,
    /// French windows and wider
    pub large_windows: u32,

    /// Window-guard railing length (ml); a share is priced as wrought iron
    pub railing_length_m: f64,
    /// Balcony railing length (ml)
    pub balcony_railing_length_m: f64,
    /// Galvanised mesh guard length (ml)
    pub galvanized_guard_length_m: f64,

    pub dormer_count: u32,
    /// Dormers are only priced (and the roofline scaffold lift added) when set
    pub treat_dormers: bool,

    pub downpipe_length_m: f64,
    /// Band courses and cornices (ml)
    pub band_course_length_m: f64,
    /// Zinc flashing (ml)
    pub flashing_length_m: f64,
    pub vent_grille_count: u32,

    /// Protection mesh along the street (ml)
    pub protection_mesh_length_m: f64,

    /// Ground floor is a shop
    pub has_retail: bool,
    /// Shop frontage needing protection (ml)
    pub retail_frontage_m: f64,

    pub door: DoorType,

    /// Period building (Haussmann); raises the surface unit price
    pub period_style: bool,

    /// Render loss measured on site needing heavy repair (m²)
    pub detected_heavy_repair_m2: f64,
    /// Cosmetic patch repair area (m²)
    pub detected_patch_repair_m2: f64,
    /// Hairline cracks (ml)
    pub hairline_crack_length_m: f64,
    /// Open cracks (ml)
    pub open_crack_length_m: f64,
}

impl OptionsBag {
    /// Parse a bag from JSON. Unknown keys are ignored, absent keys are zero.
    pub fn from_json(json: &str) -> EstimateResult<Self> {
        serde_json::from_str(json).map_err(|e| EstimateError::serialization(e.to_string()))
    }

    /// Pre-filled bag for the option stage, from confirmed dimensions and
    /// whatever the context provider knew.
    pub fn suggested(context: &BuildingContext, dimensions: &GeometryInput) -> Self {
        let geometry = derive_geometry(dimensions);
        let width = dimensions.main_face_width();
        let levels = geometry.level_count as f64;

        let railing_length_m = match dimensions.kind {
            BuildingKind::Attached => 0.5 * width * levels,
            BuildingKind::Detached => 0.0,
        };
        let downpipes = (width / 6.0).round().max(1.0);
        let has_retail = context.has_ground_floor_retail.unwrap_or(false);

        OptionsBag {
            railing_length_m,
            downpipe_length_m: downpipes * geometry.height_m,
            has_retail,
            retail_frontage_m: if has_retail { width } else { 0.0 },
            period_style: context.period_style_suspected.unwrap_or(false),
            ..OptionsBag::default()
        }
    }

    /// Whether any option would add a line beyond the mandatory ones
    pub fn is_empty(&self) -> bool {
        *self == OptionsBag::default()
    }
}
