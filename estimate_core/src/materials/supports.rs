//! Façade supports and condition ratings
//!
//! Closed enumerations of the wall materials we price and of the three
//! condition ratings a surveyor can give a façade.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Broad support families. Finish selection and repair heuristics
/// are defined per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportFamily {
    /// Render, plaster or painted concrete over the structure
    Rendered,
    /// Exposed stone or brick
    Masonry,
}

/// Façade support material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportMaterial {
    /// Cement render
    RenderedCement,
    /// Old plaster render (plâtre)
    Plaster,
    /// Bare or painted concrete
    BareConcrete,
    /// Single-coat industrial render
    Monocoat,
    /// Roughcast (crépi)
    Roughcast,
    /// Lime mortar render
    LimeMortar,
    /// Dressed cut stone (pierre de taille)
    CutStone,
    /// Exposed rubble stone
    ExposedStone,
    /// Solid brick
    SolidBrick,
    /// Exposed facing brick
    ExposedBrick,
}

impl SupportMaterial {
    /// All supports for UI selection
    pub const ALL: [SupportMaterial; 10] = [
        SupportMaterial::RenderedCement,
        SupportMaterial::Plaster,
        SupportMaterial::BareConcrete,
        SupportMaterial::Monocoat,
        SupportMaterial::Roughcast,
        SupportMaterial::LimeMortar,
        SupportMaterial::CutStone,
        SupportMaterial::ExposedStone,
        SupportMaterial::SolidBrick,
        SupportMaterial::ExposedBrick,
    ];

    /// Family the support belongs to
    pub fn family(&self) -> SupportFamily {
        match self {
            SupportMaterial::RenderedCement
            | SupportMaterial::Plaster
            | SupportMaterial::BareConcrete
            | SupportMaterial::Monocoat
            | SupportMaterial::Roughcast
            | SupportMaterial::LimeMortar => SupportFamily::Rendered,
            SupportMaterial::CutStone
            | SupportMaterial::ExposedStone
            | SupportMaterial::SolidBrick
            | SupportMaterial::ExposedBrick => SupportFamily::Masonry,
        }
    }

    /// Stable key (matches the serde representation)
    pub fn key(&self) -> &'static str {
        match self {
            SupportMaterial::RenderedCement => "RENDERED_CEMENT",
            SupportMaterial::Plaster => "PLASTER",
            SupportMaterial::BareConcrete => "BARE_CONCRETE",
            SupportMaterial::Monocoat => "MONOCOAT",
            SupportMaterial::Roughcast => "ROUGHCAST",
            SupportMaterial::LimeMortar => "LIME_MORTAR",
            SupportMaterial::CutStone => "CUT_STONE",
            SupportMaterial::ExposedStone => "EXPOSED_STONE",
            SupportMaterial::SolidBrick => "SOLID_BRICK",
            SupportMaterial::ExposedBrick => "EXPOSED_BRICK",
        }
    }

    /// Parse from common string representations, including the French
    /// trade names used on survey sheets.
    ///
    /// Anything else is a contract violation, never a silent fallback.
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "RENDERED_CEMENT" | "CEMENT" | "ENDUIT_CIMENT" => Ok(SupportMaterial::RenderedCement),
            "PLASTER" | "ENDUIT_PLATRE" | "PLATRE_ANCIEN" => Ok(SupportMaterial::Plaster),
            "BARE_CONCRETE" | "CONCRETE" | "BETON" | "BETON_PEINT" => Ok(SupportMaterial::BareConcrete),
            "MONOCOAT" | "MONOCOUCHE" => Ok(SupportMaterial::Monocoat),
            "ROUGHCAST" | "CREPI" => Ok(SupportMaterial::Roughcast),
            "LIME_MORTAR" | "ENDUIT_MORTIER" => Ok(SupportMaterial::LimeMortar),
            "CUT_STONE" | "STONE" | "PIERRE_TAILLE" => Ok(SupportMaterial::CutStone),
            "EXPOSED_STONE" | "PIERRE_APPARENTE" => Ok(SupportMaterial::ExposedStone),
            "SOLID_BRICK" | "BRICK" | "BRIQUE" | "BRIQUE_PLEINE" => Ok(SupportMaterial::SolidBrick),
            "EXPOSED_BRICK" | "BRIQUE_APPARENTE" => Ok(SupportMaterial::ExposedBrick),
            _ => Err(EstimateError::invalid_input(
                "support",
                s,
                "Unknown support material",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportMaterial::RenderedCement => "Cement render",
            SupportMaterial::Plaster => "Plaster render",
            SupportMaterial::BareConcrete => "Bare concrete",
            SupportMaterial::Monocoat => "Monocoat render",
            SupportMaterial::Roughcast => "Roughcast",
            SupportMaterial::LimeMortar => "Lime mortar render",
            SupportMaterial::CutStone => "Cut stone",
            SupportMaterial::ExposedStone => "Exposed stone",
            SupportMaterial::SolidBrick => "Solid brick",
            SupportMaterial::ExposedBrick => "Exposed brick",
        }
    }
}

impl std::fmt::Display for SupportMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Surveyed façade condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionRating {
    /// Few marks, sound render
    Good,
    /// Usual wear
    Average,
    /// Many spalls, cracks, blisters
    Degraded,
}

impl ConditionRating {
    pub const ALL: [ConditionRating; 3] = [
        ConditionRating::Good,
        ConditionRating::Average,
        ConditionRating::Degraded,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "good" | "bon" => Ok(ConditionRating::Good),
            "average" | "moyen" | "fair" => Ok(ConditionRating::Average),
            "degraded" | "degrade" | "dégradé" | "poor" => Ok(ConditionRating::Degraded),
            _ => Err(EstimateError::invalid_input(
                "condition",
                s,
                "Condition must be good, average or degraded",
            )),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConditionRating::Good => "Good",
            ConditionRating::Average => "Average",
            ConditionRating::Degraded => "Degraded",
        }
    }
}

impl Default for ConditionRating {
    fn default() -> Self {
        ConditionRating::Average
    }
}

impl std::fmt::Display for ConditionRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(
            SupportMaterial::from_str_flexible("pierre taille").unwrap(),
            SupportMaterial::CutStone
        );
        assert_eq!(
            SupportMaterial::from_str_flexible("rendered-cement").unwrap(),
            SupportMaterial::RenderedCement
        );
        assert_eq!(
            ConditionRating::from_str_flexible("Dégradé").unwrap(),
            ConditionRating::Degraded
        );
    }

    #[test]
    fn test_unknown_support_is_contract_violation() {
        let err = SupportMaterial::from_str_flexible("glass").unwrap_err();
        assert!(err.is_contract_violation());
        assert!(ConditionRating::from_str_flexible("excellent").is_err());
    }

    #[test]
    fn test_key_matches_serde() {
        for support in SupportMaterial::ALL {
            let json = serde_json::to_string(&support).unwrap();
            assert_eq!(json, format!("\"{}\"", support.key()));
            assert_eq!(SupportMaterial::from_str_flexible(support.key()).unwrap(), support);
        }
    }

    #[test]
    fn test_families() {
        assert_eq!(SupportMaterial::Monocoat.family(), SupportFamily::Rendered);
        assert_eq!(SupportMaterial::ExposedBrick.family(), SupportFamily::Masonry);
    }
}
