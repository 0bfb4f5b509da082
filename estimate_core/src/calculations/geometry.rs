//! # Geometry Derivation
//!
//! Turns a building description into the quantities every pricing rule
//! works from: total height, treated perimeter, treated surface and number
//! of treated faces.
//!
//! ## Assumptions
//!
//! - Constant height per level, no roof storey
//! - Attached (party-wall) buildings expose only their street frontage, their
//!   rear-courtyard frontage, and optionally one gable running the depth
//! - Detached buildings are rectangular: both zones together mean the full
//!   perimeter `2 × (width + depth)`
//!
//! Degenerate dimensions are clamped instead of rejected, so derivation
//! always yields a usable, if conservative, geometry.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::geometry::{derive_geometry, BuildingKind, GeometryInput, ZoneSelection};
//!
//! let input = GeometryInput {
//!     kind: BuildingKind::Attached,
//!     level_count: 5,
//!     level_height_m: 3.0,
//!     street_width_m: 15.0,
//!     rear_width_m: None,
//!     depth_m: None,
//!     treat_side_wall: false,
//!     zones: ZoneSelection::Street,
//!     width_floor_m: 3.0,
//! };
//!
//! let geometry = derive_geometry(&input);
//! assert_eq!(geometry.height_m, 15.0);
//! assert_eq!(geometry.treated_perimeter_m, 15.0);
//! assert_eq!(geometry.treated_surface_m2, 225.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Level height used when the caller gives none (Paris average)
pub const DEFAULT_LEVEL_HEIGHT_M: f64 = 3.0;

/// Narrowest façade width the estimator reasons about
pub const DEFAULT_WIDTH_FLOOR_M: f64 = 3.0;

/// How the building stands relative to its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    /// Party walls on both sides (apartment block, terraced house)
    Attached,
    /// Free-standing on all four sides (detached house)
    Detached,
}

impl BuildingKind {
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "attached" | "immeuble" | "terraced" | "party-wall" => Ok(BuildingKind::Attached),
            "detached" | "pavillon" | "standalone" => Ok(BuildingKind::Detached),
            _ => Err(EstimateError::invalid_input(
                "kind",
                s,
                "Building kind must be attached or detached",
            )),
        }
    }
}

/// Which façades of the building are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSelection {
    /// Street frontage only
    Street,
    /// Rear (courtyard) frontage only
    Rear,
    /// Street and rear
    Both,
}

impl ZoneSelection {
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "street" | "rue" => Ok(ZoneSelection::Street),
            "rear" | "courtyard" | "cour" => Ok(ZoneSelection::Rear),
            "both" | "all" => Ok(ZoneSelection::Both),
            _ => Err(EstimateError::invalid_input(
                "zones",
                s,
                "Zones must be street, rear or both",
            )),
        }
    }
}

/// Dimensions confirmed by the user.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kind": "attached",
///   "level_count": 6,
///   "level_height_m": 3.0,
///   "street_width_m": 14.5,
///   "rear_width_m": 12.0,
///   "depth_m": null,
///   "treat_side_wall": false,
///   "zones": "both",
///   "width_floor_m": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryInput {
    pub kind: BuildingKind,

    /// Number of levels above ground, excluding roof storey
    pub level_count: i32,

    /// Height of one level in metres
    pub level_height_m: f64,

    /// Street frontage width in metres
    pub street_width_m: f64,

    /// Rear frontage width; the street width is used when absent
    #[serde(default)]
    pub rear_width_m: Option<f64>,

    /// Building depth (gable length); the street width is used when absent
    #[serde(default)]
    pub depth_m: Option<f64>,

    /// Include one side wall (gable)
    #[serde(default)]
    pub treat_side_wall: bool,

    pub zones: ZoneSelection,

    /// Any width at or below zero is raised to this floor
    #[serde(default = "default_width_floor")]
    pub width_floor_m: f64,
}

fn default_width_floor() -> f64 {
    DEFAULT_WIDTH_FLOOR_M
}

impl GeometryInput {
    /// Street-only input for an attached building
    pub fn street_frontage(level_count: i32, level_height_m: f64, street_width_m: f64) -> Self {
        GeometryInput {
            kind: BuildingKind::Attached,
            level_count,
            level_height_m,
            street_width_m,
            rear_width_m: None,
            depth_m: None,
            treat_side_wall: false,
            zones: ZoneSelection::Street,
            width_floor_m: DEFAULT_WIDTH_FLOOR_M,
        }
    }

    /// Reject values derivation cannot clamp meaningfully (NaN, infinities).
    pub fn validate(&self) -> EstimateResult<()> {
        let finite = [
            ("level_height_m", Some(self.level_height_m)),
            ("street_width_m", Some(self.street_width_m)),
            ("rear_width_m", self.rear_width_m),
            ("depth_m", self.depth_m),
            ("width_floor_m", Some(self.width_floor_m)),
        ];
        for (field, value) in finite {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(EstimateError::invalid_input(field, v.to_string(), "Must be a finite number"));
                }
            }
        }
        Ok(())
    }

    /// Levels after clamping to at least one
    pub fn effective_levels(&self) -> u32 {
        self.level_count.max(1) as u32
    }

    fn effective_level_height(&self) -> f64 {
        if self.level_height_m.is_finite() && self.level_height_m > 0.0 {
            self.level_height_m
        } else {
            DEFAULT_LEVEL_HEIGHT_M
        }
    }

    fn floor(&self) -> f64 {
        if self.width_floor_m.is_finite() && self.width_floor_m > 0.0 {
            self.width_floor_m
        } else {
            DEFAULT_WIDTH_FLOOR_M
        }
    }

    fn clamp_width(&self, width: f64) -> f64 {
        if width.is_finite() && width > 0.0 {
            width
        } else {
            self.floor()
        }
    }

    fn street(&self) -> f64 {
        self.clamp_width(self.street_width_m)
    }

    /// Width of the main treated face: the rear for a rear-only job, the
    /// street front otherwise.
    pub fn main_face_width(&self) -> f64 {
        match self.zones {
            ZoneSelection::Rear => self.rear(),
            ZoneSelection::Street | ZoneSelection::Both => self.street(),
        }
    }

    fn rear(&self) -> f64 {
        self.clamp_width(self.rear_width_m.unwrap_or(self.street_width_m))
    }

    fn depth(&self) -> f64 {
        self.clamp_width(self.depth_m.unwrap_or(self.street_width_m))
    }
}

/// Derived quantities. Recompute on any dimension change, never patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Total height in metres
    pub height_m: f64,

    /// Treated surface in m² (`height × perimeter`)
    pub treated_surface_m2: f64,

    /// Treated perimeter in metres
    pub treated_perimeter_m: f64,

    /// Number of treated faces
    pub face_count: u32,

    /// Levels the height was derived from
    pub level_count: u32,
}

impl Geometry {
    /// Area of one level's worth of façade
    pub fn surface_per_level_m2(&self) -> f64 {
        self.treated_surface_m2 / self.level_count.max(1) as f64
    }
}

/// Derive geometry from confirmed dimensions.
///
/// Pure and deterministic; the same input always yields the same value.
pub fn derive_geometry(input: &GeometryInput) -> Geometry {
    let levels = input.effective_levels();
    let height_m = levels as f64 * input.effective_level_height();

    let (perimeter, faces) = match input.kind {
        BuildingKind::Detached => match input.zones {
            ZoneSelection::Both => (2.0 * (input.street() + input.depth()), 4),
            ZoneSelection::Street | ZoneSelection::Rear => {
                let width = if input.zones == ZoneSelection::Street {
                    input.street()
                } else {
                    input.rear()
                };
                if input.treat_side_wall {
                    (width + input.depth(), 2)
                } else {
                    (width, 1)
                }
            }
        },
        BuildingKind::Attached => {
            let mut perimeter = 0.0;
            let mut faces = 0;
            if matches!(input.zones, ZoneSelection::Street | ZoneSelection::Both) {
                perimeter += input.street();
                faces += 1;
            }
            if matches!(input.zones, ZoneSelection::Rear | ZoneSelection::Both) {
                perimeter += input.rear();
                faces += 1;
            }
            if input.treat_side_wall {
                perimeter += input.depth();
                faces += 1;
            }
            (perimeter, faces)
        }
    };

    Geometry {
        height_m,
        treated_surface_m2: height_m * perimeter,
        treated_perimeter_m: perimeter,
        face_count: faces,
        level_count: levels,
    }
}
