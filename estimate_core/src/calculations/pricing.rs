//! # Pricing Rule Engine
//!
//! Maps a derived [`Geometry`], a support material, a condition rating and an
//! [`OptionsBag`] to an ordered list of priced line items.
//!
//! ## Rule Order
//!
//! 1. Site setup (lump sum)
//! 2. Primary render/paint over the treated surface
//! 3. Scaffolding, plus one level's worth of area when dormers are treated
//! 4. Protection mesh and retail frontage protection
//! 5. Heavy repair (floored by the condition heuristic), patch repair, cracks
//! 6. Windows by size class, street door
//! 7. Railings (plain and wrought-iron share), balcony railings, mesh guards
//! 8. Downpipes, band courses, flashing, vent grilles
//! 9. Dormers
//! 10. Cleanup, always last
//!
//! A rule whose rounded quantity or unit price is not positive emits nothing.
//!
//! ## Rounding
//!
//! Unit prices are fixed to the cent and quantities to 0.01 when a line is
//! created; each amount is then rounded to the cent once. The total is the
//! integer sum of the emitted amounts, so the printed lines always add up to
//! the printed total.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::geometry::{derive_geometry, GeometryInput};
//! use estimate_core::calculations::pricing::{price, LineCode};
//! use estimate_core::materials::{ConditionRating, SupportMaterial};
//! use estimate_core::options::OptionsBag;
//! use estimate_core::rates::canonical_rates;
//! use estimate_core::units::Money;
//!
//! let geometry = derive_geometry(&GeometryInput::street_frontage(5, 3.0, 15.0));
//! let mut options = OptionsBag::default();
//! options.large_windows = 3;
//!
//! let result = price(&geometry, SupportMaterial::RenderedCement, ConditionRating::Good, &options, &canonical_rates()).unwrap();
//!
//! assert_eq!(result.line(LineCode::LargeWindows).unwrap().quantity, 3.0);
//! assert_eq!(result.total, result.lines.iter().map(|l| l.amount).sum::<Money>());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::geometry::Geometry;
use crate::errors::{EstimateError, EstimateResult};
use crate::materials::{ConditionRating, Finish, SupportMaterial};
use crate::options::{DoorType, OptionsBag};
use crate::rates::{CleanupPolicy, RateTable};
use crate::units::{round_quantity, Money, Unit};

/// Cost-category bucket used to group lines. Never drives pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    SiteSetup,
    Protection,
    Scaffolding,
    RenderMasonry,
    Metalwork,
    Paintwork,
    Cleanup,
}

impl Family {
    /// Taxonomy order, used for grouped presentation
    pub const ALL: [Family; 7] = [
        Family::SiteSetup,
        Family::Protection,
        Family::Scaffolding,
        Family::RenderMasonry,
        Family::Metalwork,
        Family::Paintwork,
        Family::Cleanup,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Family::SiteSetup => "Site setup",
            Family::Protection => "Protection",
            Family::Scaffolding => "Scaffolding",
            Family::RenderMasonry => "Render & masonry",
            Family::Metalwork => "Metalwork & flashing",
            Family::Paintwork => "Paintwork",
            Family::Cleanup => "Cleanup",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Stable identifier of the rule that produced a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineCode {
    SiteSetup,
    Render,
    Scaffolding,
    ProtectionMesh,
    RetailProtection,
    HeavyRepair,
    PatchRepair,
    HairlineCracks,
    OpenCracks,
    SmallWindows,
    LargeWindows,
    EntryDoor,
    CarriageDoor,
    Railing,
    WroughtIronRailing,
    BalconyRailing,
    GalvanizedGuard,
    Downpipe,
    BandCourse,
    Flashing,
    VentGrilles,
    Dormers,
    Cleanup,
}

impl LineCode {
    /// Family every line of this rule belongs to
    pub fn family(&self) -> Family {
        match self {
            LineCode::SiteSetup => Family::SiteSetup,
            LineCode::ProtectionMesh | LineCode::RetailProtection => Family::Protection,
            LineCode::Scaffolding => Family::Scaffolding,
            LineCode::Render
            | LineCode::HeavyRepair
            | LineCode::PatchRepair
            | LineCode::HairlineCracks
            | LineCode::OpenCracks
            | LineCode::VentGrilles => Family::RenderMasonry,
            LineCode::Railing
            | LineCode::WroughtIronRailing
            | LineCode::BalconyRailing
            | LineCode::GalvanizedGuard
            | LineCode::Downpipe
            | LineCode::BandCourse
            | LineCode::Flashing => Family::Metalwork,
            LineCode::SmallWindows
            | LineCode::LargeWindows
            | LineCode::EntryDoor
            | LineCode::CarriageDoor
            | LineCode::Dormers => Family::Paintwork,
            LineCode::Cleanup => Family::Cleanup,
        }
    }
}

/// One priced row of the estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub code: LineCode,
    pub family: Family,
    pub description: String,
    /// Rounded to 0.01
    pub quantity: f64,
    pub unit: Unit,
    pub unit_price: Money,
    /// `quantity × unit_price`, rounded to the cent
    pub amount: Money,
}

/// Output of [`price`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Version of the rate table the lines were priced with
    pub rates_version: String,
    pub support: SupportMaterial,
    pub condition: ConditionRating,
    pub finish: Finish,
    /// Unit price of the primary render/paint line
    pub surface_unit_price: Money,
    pub lines: Vec<LineItem>,
    /// Exact sum of line amounts, excluding tax
    pub total: Money,
    pub vat: Money,
    pub total_incl_tax: Money,
}

impl EstimationResult {
    /// First line produced by a rule
    pub fn line(&self, code: LineCode) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.code == code)
    }

    /// Subtotal per family in taxonomy order, families without lines omitted
    pub fn family_subtotals(&self) -> Vec<(Family, Money)> {
        Family::ALL
            .iter()
            .filter_map(|family| {
                let mut lines = self.lines.iter().filter(|l| l.family == *family).peekable();
                lines.peek()?;
                Some((*family, lines.map(|l| l.amount).sum()))
            })
            .collect()
    }
}

/// Smallest quantity a priced line shows; any positive measure rounds up to it
const MIN_QUANTITY: f64 = 0.01;

/// Accumulates lines, dropping any with a non-positive quantity or price.
struct LineBuilder {
    lines: Vec<LineItem>,
}

impl LineBuilder {
    fn new() -> Self {
        LineBuilder { lines: Vec::new() }
    }

    fn push(&mut self, code: LineCode, description: impl Into<String>, quantity: f64, unit: Unit, unit_price: f64) {
        let unit_price = Money::from_major(unit_price);
        if !(quantity > 0.0) || !unit_price.is_positive() {
            return;
        }
        let quantity = round_quantity(quantity).max(MIN_QUANTITY);
        let amount = unit_price.times(quantity);
        self.lines.push(LineItem {
            code,
            family: code.family(),
            description: description.into(),
            quantity,
            unit,
            unit_price,
            amount,
        });
    }

    fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

/// Price a façade.
///
/// Fails only when the geometry breaks the caller contract (negative or
/// non-finite surface). Sparse or all-zero options are valid and simply
/// yield fewer lines.
pub fn price(
    geometry: &Geometry,
    support: SupportMaterial,
    condition: ConditionRating,
    options: &OptionsBag,
    rates: &RateTable,
) -> EstimateResult<EstimationResult> {
    validate_geometry(geometry)?;

    let surface = geometry.treated_surface_m2;
    let p = &rates.unit_prices;
    let (finish, surface_price) = rates.surface_unit_price(support, condition, options.period_style);

    let mut b = LineBuilder::new();

    b.push(LineCode::SiteSetup, "Site setup and installation", 1.0, Unit::LumpSum, p.site_setup);

    b.push(
        LineCode::Render,
        format!("{} finish on {}", finish, support.display_name().to_lowercase()),
        surface,
        Unit::SquareMeter,
        surface_price,
    );

    let scaffold_area = if options.treat_dormers && options.dormer_count > 0 {
        surface + geometry.surface_per_level_m2()
    } else {
        surface
    };
    b.push(LineCode::Scaffolding, "Scaffolding", scaffold_area, Unit::SquareMeter, p.scaffolding_m2);

    b.push(
        LineCode::ProtectionMesh,
        "Protection mesh",
        options.protection_mesh_length_m,
        Unit::LinearMeter,
        p.protection_mesh_ml,
    );
    if options.has_retail {
        b.push(
            LineCode::RetailProtection,
            "Retail frontage protection",
            options.retail_frontage_m,
            Unit::LinearMeter,
            p.retail_protection_ml,
        );
    }

    let heuristic_repair = rates.repair_ratio(support, condition) * surface;
    b.push(
        LineCode::HeavyRepair,
        "Heavy render repair",
        options.detected_heavy_repair_m2.max(heuristic_repair),
        Unit::SquareMeter,
        p.heavy_repair_m2,
    );
    b.push(
        LineCode::PatchRepair,
        "Patch repair",
        options.detected_patch_repair_m2,
        Unit::SquareMeter,
        p.patch_repair_m2,
    );
    b.push(
        LineCode::HairlineCracks,
        "Hairline crack treatment",
        options.hairline_crack_length_m,
        Unit::LinearMeter,
        p.hairline_crack_ml,
    );
    b.push(
        LineCode::OpenCracks,
        "Open crack stitching",
        options.open_crack_length_m,
        Unit::LinearMeter,
        p.open_crack_ml,
    );

    b.push(LineCode::SmallWindows, "Small windows", options.small_windows as f64, Unit::Each, p.small_window);
    b.push(LineCode::LargeWindows, "Large windows", options.large_windows as f64, Unit::Each, p.large_window);
    match options.door {
        DoorType::None => {}
        DoorType::EntryDoor => b.push(LineCode::EntryDoor, "Entry door", 1.0, Unit::Each, p.entry_door),
        DoorType::CarriageDoor => b.push(LineCode::CarriageDoor, "Carriage door", 1.0, Unit::Each, p.carriage_door),
    }

    let railing = options.railing_length_m.max(0.0);
    let wrought = railing * p.wrought_iron_share;
    b.push(LineCode::Railing, "Window railings", railing - wrought, Unit::LinearMeter, p.railing_ml);
    b.push(
        LineCode::WroughtIronRailing,
        "Wrought-iron railings",
        wrought,
        Unit::LinearMeter,
        p.wrought_iron_railing_ml,
    );
    b.push(
        LineCode::BalconyRailing,
        "Balcony railings",
        options.balcony_railing_length_m,
        Unit::LinearMeter,
        p.balcony_railing_ml,
    );
    b.push(
        LineCode::GalvanizedGuard,
        "Galvanised mesh guards",
        options.galvanized_guard_length_m,
        Unit::LinearMeter,
        p.galvanized_guard_ml,
    );

    b.push(LineCode::Downpipe, "Downpipes", options.downpipe_length_m, Unit::LinearMeter, p.downpipe_ml);
    b.push(
        LineCode::BandCourse,
        "Band courses and cornices",
        options.band_course_length_m,
        Unit::LinearMeter,
        p.band_course_ml,
    );
    b.push(LineCode::Flashing, "Zinc flashing", options.flashing_length_m, Unit::LinearMeter, p.flashing_ml);
    b.push(LineCode::VentGrilles, "Vent grilles", options.vent_grille_count as f64, Unit::Each, p.vent_grille);

    if options.treat_dormers {
        b.push(LineCode::Dormers, "Dormers", options.dormer_count as f64, Unit::Each, p.dormer);
    }

    let cleanup = match rates.cleanup {
        CleanupPolicy::Proportional { rate } => b.subtotal().scaled(rate),
        CleanupPolicy::LumpSum { amount } => Money::from_major(amount),
    };
    b.push(LineCode::Cleanup, "Cleanup and site closeout", 1.0, Unit::LumpSum, cleanup.as_major());

    let total = b.subtotal();
    let vat = total.scaled(rates.vat_rate);

    debug!(
        support = support.key(),
        condition = %condition,
        finish = %finish,
        surface_m2 = surface,
        lines = b.lines.len(),
        total = %total,
        "Priced estimate"
    );

    Ok(EstimationResult {
        rates_version: rates.version.clone(),
        support,
        condition,
        finish,
        surface_unit_price: Money::from_major(surface_price),
        lines: b.lines,
        total,
        vat,
        total_incl_tax: total + vat,
    })
}

fn validate_geometry(geometry: &Geometry) -> EstimateResult<()> {
    let fields = [
        ("treated_surface_m2", geometry.treated_surface_m2),
        ("treated_perimeter_m", geometry.treated_perimeter_m),
        ("height_m", geometry.height_m),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(EstimateError::invalid_input(
                field,
                value.to_string(),
                "Geometry quantities must be finite and non-negative",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::{derive_geometry, GeometryInput};
    use crate::rates::canonical_rates;
    use proptest::prelude::*;

    fn scenario_a() -> Geometry {
        derive_geometry(&GeometryInput::street_frontage(5, 3.0, 15.0))
    }

    fn codes(result: &EstimationResult) -> Vec<LineCode> {
        result.lines.iter().map(|l| l.code).collect()
    }

    fn price_canonical(
        geometry: &Geometry,
        support: SupportMaterial,
        condition: ConditionRating,
        options: &OptionsBag,
    ) -> EstimationResult {
        price(geometry, support, condition, options, &canonical_rates()).unwrap()
    }

    #[test]
    fn test_zero_option_floor() {
        let result = price_canonical(
            &scenario_a(),
            SupportMaterial::RenderedCement,
            ConditionRating::Good,
            &OptionsBag::default(),
        );
        assert_eq!(
            codes(&result),
            vec![LineCode::SiteSetup, LineCode::Render, LineCode::Scaffolding, LineCode::Cleanup]
        );
    }

    #[test]
    fn test_tiny_surface_keeps_mandatory_lines() {
        let geometry = derive_geometry(&GeometryInput::street_frontage(1, 0.0001, 3.0));
        assert!(geometry.treated_surface_m2 > 0.0 && geometry.treated_surface_m2 < 0.005);

        let result = price_canonical(
            &geometry,
            SupportMaterial::Plaster,
            ConditionRating::Good,
            &OptionsBag::default(),
        );
        assert_eq!(
            codes(&result),
            vec![LineCode::SiteSetup, LineCode::Render, LineCode::Scaffolding, LineCode::Cleanup]
        );
        assert_eq!(result.line(LineCode::Render).unwrap().quantity, 0.01);
        assert_eq!(result.line(LineCode::Scaffolding).unwrap().quantity, 0.01);
    }

    #[test]
    fn test_zero_option_known_amounts() {
        let result = price_canonical(
            &scenario_a(),
            SupportMaterial::RenderedCement,
            ConditionRating::Good,
            &OptionsBag::default(),
        );
        // 80 × 0.95 × 1.2 = 91.20 €/m² over 225 m²
        let render = result.line(LineCode::Render).unwrap();
        assert_eq!(render.unit_price.cents(), 9_120);
        assert_eq!(render.amount.cents(), 2_052_000);
        assert_eq!(result.line(LineCode::Scaffolding).unwrap().amount.cents(), 900_000);
        // 1 % of 900 + 20 520 + 9 000
        assert_eq!(result.line(LineCode::Cleanup).unwrap().amount.cents(), 30_420);
        assert_eq!(result.total.cents(), 90_000 + 2_052_000 + 900_000 + 30_420);
        assert_eq!(result.vat.cents(), 307_242);
        assert_eq!(result.total_incl_tax, result.total + result.vat);
    }

    #[test]
    fn test_cleanup_is_always_last() {
        let mut options = OptionsBag::default();
        options.treat_dormers = true;
        options.dormer_count = 2;
        options.flashing_length_m = 12.0;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Average, &options);
        assert_eq!(result.lines.last().unwrap().code, LineCode::Cleanup);
    }

    #[test]
    fn test_scenario_b_stone_is_cheaper_than_degraded_render() {
        let geometry = scenario_a();
        let options = OptionsBag::default();

        let stone = price_canonical(&geometry, SupportMaterial::CutStone, ConditionRating::Good, &options);
        let render = price_canonical(&geometry, SupportMaterial::RenderedCement, ConditionRating::Degraded, &options);

        assert_eq!(stone.finish, Finish::Mineral);
        assert_eq!(render.finish, Finish::Siloxane);
        assert!(stone.total < render.total);
    }

    #[test]
    fn test_scenario_c_only_large_windows() {
        let mut options = OptionsBag::default();
        options.large_windows = 3;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);

        let openings: Vec<&LineItem> = result
            .lines
            .iter()
            .filter(|l| matches!(l.code, LineCode::SmallWindows | LineCode::LargeWindows))
            .collect();
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].code, LineCode::LargeWindows);
        assert_eq!(openings[0].quantity, 3.0);
        assert_eq!(openings[0].amount.cents(), 25_500);
    }

    #[test]
    fn test_repair_floor() {
        let geometry = scenario_a();
        let mut options = OptionsBag::default();
        // Heuristic for degraded render: 15 % of 225 = 33.75 m²
        options.detected_heavy_repair_m2 = 10.0;
        let result = price_canonical(&geometry, SupportMaterial::RenderedCement, ConditionRating::Degraded, &options);
        assert_eq!(result.line(LineCode::HeavyRepair).unwrap().quantity, 33.75);

        options.detected_heavy_repair_m2 = 50.0;
        let result = price_canonical(&geometry, SupportMaterial::RenderedCement, ConditionRating::Degraded, &options);
        assert_eq!(result.line(LineCode::HeavyRepair).unwrap().quantity, 50.0);
    }

    #[test]
    fn test_detected_repair_applies_in_good_condition() {
        let mut options = OptionsBag::default();
        options.detected_heavy_repair_m2 = 4.0;
        options.detected_patch_repair_m2 = 6.5;
        let result = price_canonical(&scenario_a(), SupportMaterial::SolidBrick, ConditionRating::Good, &options);
        assert_eq!(result.line(LineCode::HeavyRepair).unwrap().amount.cents(), 18_000);
        assert_eq!(result.line(LineCode::PatchRepair).unwrap().amount.cents(), 16_250);
    }

    #[test]
    fn test_dormers_add_a_level_of_scaffolding() {
        let geometry = scenario_a();
        let mut options = OptionsBag::default();
        options.dormer_count = 3;

        let untreated = price_canonical(&geometry, SupportMaterial::Plaster, ConditionRating::Good, &options);
        assert_eq!(untreated.line(LineCode::Scaffolding).unwrap().quantity, 225.0);
        assert!(untreated.line(LineCode::Dormers).is_none());

        options.treat_dormers = true;
        let treated = price_canonical(&geometry, SupportMaterial::Plaster, ConditionRating::Good, &options);
        assert_eq!(treated.line(LineCode::Scaffolding).unwrap().quantity, 270.0);
        assert_eq!(treated.line(LineCode::Dormers).unwrap().amount.cents(), 96_000);
    }

    #[test]
    fn test_railing_split() {
        let mut options = OptionsBag::default();
        options.railing_length_m = 20.0;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);

        let plain = result.line(LineCode::Railing).unwrap();
        let wrought = result.line(LineCode::WroughtIronRailing).unwrap();
        assert_eq!(plain.quantity, 14.0);
        assert_eq!(wrought.quantity, 6.0);
        assert_eq!(plain.family, Family::Metalwork);
        assert_eq!(wrought.unit_price.cents(), 7_000);
    }

    #[test]
    fn test_retail_protection_requires_flag() {
        let mut options = OptionsBag::default();
        options.retail_frontage_m = 15.0;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);
        assert!(result.line(LineCode::RetailProtection).is_none());

        options.has_retail = true;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);
        assert_eq!(result.line(LineCode::RetailProtection).unwrap().amount.cents(), 90_000);
    }

    #[test]
    fn test_period_style_raises_surface_price() {
        let mut options = OptionsBag::default();
        let plain = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Average, &options);
        options.period_style = true;
        let styled = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Average, &options);
        assert_eq!(plain.surface_unit_price.cents(), 9_600);
        assert_eq!(styled.surface_unit_price.cents(), 11_520);
    }

    #[test]
    fn test_negative_options_are_skipped() {
        let mut options = OptionsBag::default();
        options.downpipe_length_m = -4.0;
        options.railing_length_m = -10.0;
        options.flashing_length_m = f64::NAN;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);
        assert_eq!(result.lines.len(), 4);
    }

    #[test]
    fn test_negative_surface_is_contract_violation() {
        let mut geometry = scenario_a();
        geometry.treated_surface_m2 = -1.0;
        let err = price(
            &geometry,
            SupportMaterial::Plaster,
            ConditionRating::Good,
            &OptionsBag::default(),
            &canonical_rates(),
        )
        .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_lump_sum_cleanup_fixture() {
        let rates = RateTable::from_toml_str(include_str!("../../tests/fixtures/rates_lump_sum.toml")).unwrap();
        let result = price(
            &scenario_a(),
            SupportMaterial::Plaster,
            ConditionRating::Good,
            &OptionsBag::default(),
            &rates,
        )
        .unwrap();
        let cleanup = result.lines.last().unwrap();
        assert_eq!(cleanup.code, LineCode::Cleanup);
        assert_eq!(cleanup.amount.cents(), 35_000);
        assert_eq!(result.rates_version, "1.1.0");
    }

    #[test]
    fn test_family_subtotals() {
        let mut options = OptionsBag::default();
        options.large_windows = 2;
        options.dormer_count = 1;
        options.treat_dormers = true;
        let result = price_canonical(&scenario_a(), SupportMaterial::Plaster, ConditionRating::Good, &options);

        let subtotals = result.family_subtotals();
        let families: Vec<Family> = subtotals.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            families,
            vec![
                Family::SiteSetup,
                Family::Scaffolding,
                Family::RenderMasonry,
                Family::Paintwork,
                Family::Cleanup
            ]
        );
        let paintwork = subtotals.iter().find(|(f, _)| *f == Family::Paintwork).unwrap().1;
        assert_eq!(paintwork.cents(), 2 * 8_500 + 32_000);
        assert_eq!(subtotals.iter().map(|(_, m)| *m).sum::<Money>(), result.total);
    }

    fn any_options() -> impl Strategy<Value = OptionsBag> {
        (
            (0u32..20, 0u32..20, 0.0f64..80.0, 0.0f64..30.0, 0u32..6, any::<bool>()),
            (0.0f64..60.0, 0.0f64..40.0, 0.0f64..40.0, 0u32..12, any::<bool>(), 0.0f64..30.0),
            (0.0f64..100.0, 0.0f64..50.0, 0.0f64..30.0, any::<bool>(), 0usize..3),
        )
            .prop_map(|(a, b, c)| OptionsBag {
                small_windows: a.0,
                large_windows: a.1,
                railing_length_m: a.2,
                balcony_railing_length_m: a.3,
                dormer_count: a.4,
                treat_dormers: a.5,
                downpipe_length_m: b.0,
                band_course_length_m: b.1,
                flashing_length_m: b.2,
                vent_grille_count: b.3,
                has_retail: b.4,
                retail_frontage_m: b.5,
                detected_heavy_repair_m2: c.0,
                hairline_crack_length_m: c.1,
                open_crack_length_m: c.2,
                period_style: c.3,
                door: [DoorType::None, DoorType::EntryDoor, DoorType::CarriageDoor][c.4],
                ..OptionsBag::default()
            })
    }

    fn geometry_with_surface(surface: f64) -> Geometry {
        Geometry {
            height_m: 15.0,
            treated_surface_m2: surface,
            treated_perimeter_m: surface / 15.0,
            face_count: 1,
            level_count: 5,
        }
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_lines(
            surface in 0.0f64..5000.0,
            s in 0usize..10,
            c in 0usize..3,
            options in any_options(),
        ) {
            let result = price_canonical(
                &geometry_with_surface(surface),
                SupportMaterial::ALL[s],
                ConditionRating::ALL[c],
                &options,
            );
            let sum: Money = result.lines.iter().map(|l| l.amount).sum();
            prop_assert_eq!(result.total, sum);
            prop_assert!(result.lines.iter().all(|l| l.quantity > 0.0 && l.unit_price.is_positive()));
        }

        #[test]
        fn prop_pricing_is_deterministic(
            surface in 0.0f64..5000.0,
            s in 0usize..10,
            c in 0usize..3,
            options in any_options(),
        ) {
            let geometry = geometry_with_surface(surface);
            let a = price_canonical(&geometry, SupportMaterial::ALL[s], ConditionRating::ALL[c], &options);
            let b = price_canonical(&geometry, SupportMaterial::ALL[s], ConditionRating::ALL[c], &options);
            prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        }

        #[test]
        fn prop_larger_surface_never_costs_less(
            surface in 0.0f64..5000.0,
            extra in 0.0f64..500.0,
            s in 0usize..10,
            c in 0usize..3,
            options in any_options(),
        ) {
            let small = price_canonical(&geometry_with_surface(surface), SupportMaterial::ALL[s], ConditionRating::ALL[c], &options);
            let large = price_canonical(&geometry_with_surface(surface + extra), SupportMaterial::ALL[s], ConditionRating::ALL[c], &options);
            prop_assert!(large.total >= small.total);
        }
    }
}
