//! # Rate Tables
//!
//! Every coefficient and unit price the pricing engine uses, as one
//! versioned, read-only value.
//!
//! The canonical table is built in code and shared process-wide through
//! [`canonical_rates`]. Alternative tables (other regions, earlier price
//! lists kept as regression fixtures) are loaded from TOML; `data/rates.toml`
//! is the canonical table in that format.
//!
//! ## Versioning
//!
//! `version` is a semver string. A table is accepted when its major version
//! equals [`SUPPORTED_RATES_MAJOR`]; a different major means the rule set
//! changed shape and the engine refuses it.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::rates::canonical_rates;
//! use estimate_core::materials::{ConditionRating, SupportMaterial};
//!
//! let rates = canonical_rates();
//! let (finish, price) = rates.surface_unit_price(SupportMaterial::RenderedCement, ConditionRating::Average, false);
//! assert_eq!(finish.display_name(), "D3");
//! assert!((price - 96.0).abs() < 1e-9);
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::materials::{select_finish, ConditionRating, Finish, SupportFamily, SupportMaterial};

/// Version of the canonical table
pub const CANONICAL_RATES_VERSION: &str = "1.0.0";

/// Major version of rate tables this engine understands
pub const SUPPORTED_RATES_MAJOR: u64 = 1;

static CANONICAL: Lazy<Arc<RateTable>> = Lazy::new(|| Arc::new(RateTable::default()));

/// Shared handle to the canonical rate table
pub fn canonical_rates() -> Arc<RateTable> {
    Arc::clone(&CANONICAL)
}

/// A value per condition rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionValues {
    pub good: f64,
    pub average: f64,
    pub degraded: f64,
}

impl ConditionValues {
    pub fn get(&self, condition: ConditionRating) -> f64 {
        match condition {
            ConditionRating::Good => self.good,
            ConditionRating::Average => self.average,
            ConditionRating::Degraded => self.degraded,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.good, self.average, self.degraded]
    }
}

/// Multiplicative coefficients applied to the finish base price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Regional labour-cost coefficient
    pub regional: f64,
    /// Applied when the building is flagged as period style (Haussmann)
    pub period_style: f64,
    /// Per condition rating
    pub condition: ConditionValues,
}

/// Base price per m² of each finish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishPrices {
    pub d3: f64,
    pub siloxane: f64,
    pub mineral: f64,
}

impl FinishPrices {
    pub fn get(&self, finish: Finish) -> f64 {
        match finish {
            Finish::D3 => self.d3,
            Finish::Siloxane => self.siloxane,
            Finish::Mineral => self.mineral,
        }
    }
}

/// Share of the treated surface assumed to need heavy repair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairRatios {
    pub rendered: ConditionValues,
    pub masonry: ConditionValues,
}

/// Unit prices of the individual rules, in euros per unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPrices {
    pub site_setup: f64,
    pub scaffolding_m2: f64,
    pub heavy_repair_m2: f64,
    pub patch_repair_m2: f64,
    pub hairline_crack_ml: f64,
    pub open_crack_ml: f64,
    pub small_window: f64,
    pub large_window: f64,
    pub railing_ml: f64,
    pub wrought_iron_railing_ml: f64,
    /// Share of railing length assumed to be decorative wrought iron
    pub wrought_iron_share: f64,
    pub balcony_railing_ml: f64,
    pub galvanized_guard_ml: f64,
    pub downpipe_ml: f64,
    pub band_course_ml: f64,
    pub flashing_ml: f64,
    pub vent_grille: f64,
    pub protection_mesh_ml: f64,
    pub retail_protection_ml: f64,
    pub entry_door: f64,
    pub carriage_door: f64,
    pub dormer: f64,
}

/// How the closing cleanup line is priced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Share of the subtotal of every line emitted before cleanup
    Proportional { rate: f64 },
    /// Fixed amount
    LumpSum { amount: f64 },
}

/// Complete, versioned set of pricing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Semver version of this table
    pub version: String,
    /// Human-readable name (region, price list date)
    pub label: String,
    /// Reported separately, never folded into line amounts
    pub vat_rate: f64,
    pub coefficients: Coefficients,
    pub finishes: FinishPrices,
    pub repair_ratios: RepairRatios,
    pub unit_prices: UnitPrices,
    pub cleanup: CleanupPolicy,
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable {
            version: CANONICAL_RATES_VERSION.to_string(),
            label: "Paris intra-muros".to_string(),
            vat_rate: 0.10,
            coefficients: Coefficients {
                regional: 1.20,
                period_style: 1.20,
                condition: ConditionValues {
                    good: 0.95,
                    average: 1.00,
                    degraded: 1.15,
                },
            },
            finishes: FinishPrices {
                d3: 80.0,
                siloxane: 90.0,
                mineral: 105.0,
            },
            repair_ratios: RepairRatios {
                rendered: ConditionValues {
                    good: 0.0,
                    average: 0.08,
                    degraded: 0.15,
                },
                masonry: ConditionValues {
                    good: 0.0,
                    average: 0.05,
                    degraded: 0.10,
                },
            },
            unit_prices: UnitPrices {
                site_setup: 900.0,
                scaffolding_m2: 40.0,
                heavy_repair_m2: 45.0,
                patch_repair_m2: 25.0,
                hairline_crack_ml: 10.0,
                open_crack_ml: 20.0,
                small_window: 55.0,
                large_window: 85.0,
                railing_ml: 50.0,
                wrought_iron_railing_ml: 70.0,
                wrought_iron_share: 0.30,
                balcony_railing_ml: 95.0,
                galvanized_guard_ml: 70.0,
                downpipe_ml: 35.0,
                band_course_ml: 45.0,
                flashing_ml: 75.0,
                vent_grille: 15.0,
                protection_mesh_ml: 25.0,
                retail_protection_ml: 60.0,
                entry_door: 450.0,
                carriage_door: 1400.0,
                dormer: 320.0,
            },
            cleanup: CleanupPolicy::Proportional { rate: 0.01 },
        }
    }
}

impl RateTable {
    /// Parse and validate a TOML rate table.
    pub fn from_toml_str(source: &str) -> EstimateResult<Self> {
        let table: RateTable = toml::from_str(source).map_err(|e| EstimateError::serialization(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Load a rate table from a TOML file.
    pub fn load(path: &Path) -> EstimateResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| EstimateError::file_error("read rates", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&source).map_err(|e| match e {
            EstimateError::SerializationError { reason } => EstimateError::SerializationError {
                reason: format!("Invalid rate table {}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Serialize to TOML (the format accepted by [`RateTable::load`]).
    pub fn to_toml_string(&self) -> EstimateResult<String> {
        toml::to_string_pretty(self).map_err(|e| EstimateError::serialization(e.to_string()))
    }

    /// Check version compatibility and that every constant is usable.
    pub fn validate(&self) -> EstimateResult<()> {
        let version = Version::parse(&self.version).map_err(|_| EstimateError::VersionMismatch {
            file_version: self.version.clone(),
            expected_version: format!("{}.x", SUPPORTED_RATES_MAJOR),
        })?;
        if version.major != SUPPORTED_RATES_MAJOR {
            return Err(EstimateError::VersionMismatch {
                file_version: self.version.clone(),
                expected_version: format!("{}.x", SUPPORTED_RATES_MAJOR),
            });
        }

        let c = &self.coefficients;
        let positive = [
            ("coefficients.regional", c.regional),
            ("coefficients.period_style", c.period_style),
            ("coefficients.condition.good", c.condition.good),
            ("coefficients.condition.average", c.condition.average),
            ("coefficients.condition.degraded", c.condition.degraded),
            ("finishes.d3", self.finishes.d3),
            ("finishes.siloxane", self.finishes.siloxane),
            ("finishes.mineral", self.finishes.mineral),
        ];
        for (field, value) in positive {
            require_positive(field, value)?;
        }

        let p = &self.unit_prices;
        let prices = [
            ("unit_prices.site_setup", p.site_setup),
            ("unit_prices.scaffolding_m2", p.scaffolding_m2),
            ("unit_prices.heavy_repair_m2", p.heavy_repair_m2),
            ("unit_prices.patch_repair_m2", p.patch_repair_m2),
            ("unit_prices.hairline_crack_ml", p.hairline_crack_ml),
            ("unit_prices.open_crack_ml", p.open_crack_ml),
            ("unit_prices.small_window", p.small_window),
            ("unit_prices.large_window", p.large_window),
            ("unit_prices.railing_ml", p.railing_ml),
            ("unit_prices.wrought_iron_railing_ml", p.wrought_iron_railing_ml),
            ("unit_prices.balcony_railing_ml", p.balcony_railing_ml),
            ("unit_prices.galvanized_guard_ml", p.galvanized_guard_ml),
            ("unit_prices.downpipe_ml", p.downpipe_ml),
            ("unit_prices.band_course_ml", p.band_course_ml),
            ("unit_prices.flashing_ml", p.flashing_ml),
            ("unit_prices.vent_grille", p.vent_grille),
            ("unit_prices.protection_mesh_ml", p.protection_mesh_ml),
            ("unit_prices.retail_protection_ml", p.retail_protection_ml),
            ("unit_prices.entry_door", p.entry_door),
            ("unit_prices.carriage_door", p.carriage_door),
            ("unit_prices.dormer", p.dormer),
        ];
        for (field, value) in prices {
            require_positive(field, value)?;
        }

        require_fraction("unit_prices.wrought_iron_share", p.wrought_iron_share)?;
        for value in self.repair_ratios.rendered.values() {
            require_fraction("repair_ratios.rendered", value)?;
        }
        for value in self.repair_ratios.masonry.values() {
            require_fraction("repair_ratios.masonry", value)?;
        }
        require_fraction("vat_rate", self.vat_rate)?;

        match self.cleanup {
            CleanupPolicy::Proportional { rate } => require_fraction("cleanup.rate", rate)?,
            CleanupPolicy::LumpSum { amount } => require_positive("cleanup.amount", amount)?,
        }

        Ok(())
    }

    /// Heavy-repair share for a support in a given condition
    pub fn repair_ratio(&self, support: SupportMaterial, condition: ConditionRating) -> f64 {
        match support.family() {
            SupportFamily::Rendered => self.repair_ratios.rendered.get(condition),
            SupportFamily::Masonry => self.repair_ratios.masonry.get(condition),
        }
    }

    /// Finish and unit price per m² of the primary render/paint line.
    ///
    /// `base(finish) × condition × regional × period style (when flagged)`.
    pub fn surface_unit_price(
        &self,
        support: SupportMaterial,
        condition: ConditionRating,
        period_style: bool,
    ) -> (Finish, f64) {
        let finish = select_finish(support, condition);
        let style = if period_style {
            self.coefficients.period_style
        } else {
            1.0
        };
        let price = self.finishes.get(finish)
            * self.coefficients.condition.get(condition)
            * self.coefficients.regional
            * style;
        (finish, price)
    }
}

fn require_positive(field: &str, value: f64) -> EstimateResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::invalid_input(field, value.to_string(), "Must be a positive number"))
    }
}

fn require_fraction(field: &str, value: f64) -> EstimateResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EstimateError::invalid_input(field, value.to_string(), "Must be between 0 and 1"))
    }
}
