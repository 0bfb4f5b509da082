//! # Supports and Finishes
//!
//! Support materials, condition ratings, and the finish each combination
//! receives.
//!
//! ## Finish Selection
//!
//! The finish is a total function of support family and condition:
//!
//! | Family   | Good | Average | Degraded |
//! |----------|------|---------|----------|
//! | Rendered | D3   | D3      | Siloxane |
//! | Masonry  | Mineral | Mineral | Mineral |
//!
//! Base prices per finish are part of the rate table (see [`crate::rates`]).
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::materials::{select_finish, ConditionRating, Finish, SupportMaterial};
//!
//! assert_eq!(select_finish(SupportMaterial::RenderedCement, ConditionRating::Degraded), Finish::Siloxane);
//! assert_eq!(select_finish(SupportMaterial::CutStone, ConditionRating::Good), Finish::Mineral);
//! ```

pub mod supports;

pub use supports::{ConditionRating, SupportFamily, SupportMaterial};

use serde::{Deserialize, Serialize};

/// Priced surface-treatment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Finish {
    /// Class D3 acrylic façade paint
    D3,
    /// Siloxane resin coating, more resistant on worn render
    Siloxane,
    /// Breathable mineral (silicate / lime) coating for stone and brick
    Mineral,
}

impl Finish {
    pub const ALL: [Finish; 3] = [Finish::D3, Finish::Siloxane, Finish::Mineral];

    pub fn display_name(&self) -> &'static str {
        match self {
            Finish::D3 => "D3",
            Finish::Siloxane => "Siloxane",
            Finish::Mineral => "Mineral",
        }
    }
}

impl std::fmt::Display for Finish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Finish applied to a support in a given condition
pub fn select_finish(support: SupportMaterial, condition: ConditionRating) -> Finish {
    match (support.family(), condition) {
        (SupportFamily::Rendered, ConditionRating::Good | ConditionRating::Average) => Finish::D3,
        (SupportFamily::Rendered, ConditionRating::Degraded) => Finish::Siloxane,
        (SupportFamily::Masonry, _) => Finish::Mineral,
    }
}
