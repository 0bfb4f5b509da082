//! # Wizard State Machine
//!
//! Sequences input collection through six stages in strict order:
//!
//! ```text
//! AddressSelection → DimensionCapture → ConditionCapture → OptionCapture → ContactCapture → ResultDelivery
//!        ↑                                                                                      │
//!        └────────────────────────────── start_over ────────────────────────────────────────────┘
//! ```
//!
//! - Each `submit_*` writes exactly its own slice, and only while the wizard
//!   is on that stage.
//! - [`Wizard::advance`] moves forward only when the current stage's gate holds.
//! - [`Wizard::back`] never clears anything.
//! - A different address clears dimensions, condition, options and the estimate.
//! - [`Wizard::enter`] redirects to the earliest incomplete stage instead of failing.
//! - Reaching `ResultDelivery` prices at most once per set of inputs; the
//!   cached estimate is reused until a pricing slice changes.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::geometry::GeometryInput;
//! use estimate_core::materials::{ConditionRating, SupportMaterial};
//! use estimate_core::options::OptionsBag;
//! use estimate_core::rates::canonical_rates;
//! use estimate_core::services::{BuildingContext, ContactInfo, Coordinates};
//! use estimate_core::session::{FacadeCondition, SelectedAddress};
//! use estimate_core::wizard::{Stage, Wizard};
//!
//! let mut wizard = Wizard::new(canonical_rates());
//! wizard.submit_address(
//!     SelectedAddress { label: "3 rue Daval, 75011 Paris".into(), coordinates: Coordinates::new(48.855, 2.371) },
//!     BuildingContext::default(),
//!     None,
//! ).unwrap();
//! wizard.advance().unwrap();
//! wizard.submit_dimensions(GeometryInput::street_frontage(5, 3.0, 15.0)).unwrap();
//! wizard.advance().unwrap();
//! wizard.submit_condition(FacadeCondition { support: SupportMaterial::Plaster, condition: ConditionRating::Good }).unwrap();
//! wizard.advance().unwrap();
//! wizard.submit_options(OptionsBag::default()).unwrap();
//! wizard.advance().unwrap();
//! wizard.submit_contact(ContactInfo::new("Ana", "ana@example.fr")).unwrap();
//!
//! assert_eq!(wizard.advance().unwrap(), Stage::ResultDelivery);
//! assert!(wizard.estimate().is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::geometry::{derive_geometry, BuildingKind, GeometryInput, ZoneSelection, DEFAULT_LEVEL_HEIGHT_M, DEFAULT_WIDTH_FLOOR_M};
use crate::calculations::pricing::{price, EstimationResult};
use crate::errors::{EstimateError, EstimateResult};
use crate::options::OptionsBag;
use crate::rates::RateTable;
use crate::services::{BuildingContext, ContactInfo, ImageryRef};
use crate::session::{CachedEstimate, DeliveryMark, FacadeCondition, SelectedAddress, SessionAggregate};

/// Levels assumed when the context provider gives no hint
pub const DEFAULT_LEVEL_COUNT: i32 = 5;

/// Street width assumed when the context provider gives no hint
pub const DEFAULT_STREET_WIDTH_M: f64 = 15.0;

/// Wizard stage, in collection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AddressSelection,
    DimensionCapture,
    ConditionCapture,
    OptionCapture,
    ContactCapture,
    ResultDelivery,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::AddressSelection,
        Stage::DimensionCapture,
        Stage::ConditionCapture,
        Stage::OptionCapture,
        Stage::ContactCapture,
        Stage::ResultDelivery,
    ];

    pub fn next(&self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Stage> {
        self.index().checked_sub(1).map(|i| Stage::ALL[i])
    }

    /// 1-based position, for "step 3 of 6" displays
    pub fn number(&self) -> usize {
        self.index() + 1
    }

    fn index(&self) -> usize {
        match self {
            Stage::AddressSelection => 0,
            Stage::DimensionCapture => 1,
            Stage::ConditionCapture => 2,
            Stage::OptionCapture => 3,
            Stage::ContactCapture => 4,
            Stage::ResultDelivery => 5,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::AddressSelection => "Address",
            Stage::DimensionCapture => "Dimensions",
            Stage::ConditionCapture => "Condition",
            Stage::OptionCapture => "Options",
            Stage::ContactCapture => "Contact",
            Stage::ResultDelivery => "Estimate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Drives one session through the stages
#[derive(Debug, Clone)]
pub struct Wizard {
    session: SessionAggregate,
    stage: Stage,
    rates: Arc<RateTable>,
    computations: u64,
}

impl Wizard {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Wizard {
            session: SessionAggregate::new(),
            stage: Stage::AddressSelection,
            rates,
            computations: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> &SessionAggregate {
        &self.session
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Number of geometry + pricing runs performed so far
    pub fn computation_count(&self) -> u64 {
        self.computations
    }

    /// Cached estimate, if one matches the current inputs
    pub fn estimate(&self) -> Option<&EstimationResult> {
        self.session
            .estimate
            .as_ref()
            .filter(|cached| cached.revision == self.session.pricing_revision)
            .map(|cached| &cached.result)
    }

    fn expect_stage(&self, submitted: Stage) -> EstimateResult<()> {
        if self.stage == submitted {
            Ok(())
        } else {
            Err(EstimateError::StageMismatch {
                current: self.stage,
                submitted,
            })
        }
    }

    /// Record the selected address with its context hints and imagery.
    ///
    /// A different address than the current one clears every downstream
    /// slice; resubmitting the same address keeps them.
    pub fn submit_address(
        &mut self,
        address: SelectedAddress,
        context: BuildingContext,
        imagery: Option<ImageryRef>,
    ) -> EstimateResult<()> {
        self.expect_stage(Stage::AddressSelection)?;
        address.coordinates.validate()?;

        if self.session.address.as_ref() != Some(&address) {
            if self.session.address.is_some() {
                info!(session = %self.session.id, label = %address.label, "New address, clearing downstream stages");
            }
            self.session.clear_downstream_of_address();
        }
        self.session.address = Some(address);
        self.session.context = context;
        self.session.imagery = imagery;
        self.session.touch();
        Ok(())
    }

    pub fn submit_dimensions(&mut self, dimensions: GeometryInput) -> EstimateResult<()> {
        self.expect_stage(Stage::DimensionCapture)?;
        dimensions.validate()?;
        if self.session.dimensions.as_ref() != Some(&dimensions) {
            self.session.dimensions = Some(dimensions);
            self.session.pricing_revision += 1;
        }
        self.session.touch();
        Ok(())
    }

    pub fn submit_condition(&mut self, facade: FacadeCondition) -> EstimateResult<()> {
        self.expect_stage(Stage::ConditionCapture)?;
        if self.session.facade != Some(facade) {
            self.session.facade = Some(facade);
            self.session.pricing_revision += 1;
        }
        self.session.touch();
        Ok(())
    }

    pub fn submit_options(&mut self, options: OptionsBag) -> EstimateResult<()> {
        self.expect_stage(Stage::OptionCapture)?;
        if self.session.options.as_ref() != Some(&options) {
            self.session.options = Some(options);
            self.session.pricing_revision += 1;
        }
        self.session.touch();
        Ok(())
    }

    /// Contact details do not feed pricing, so they never invalidate the estimate.
    pub fn submit_contact(&mut self, contact: ContactInfo) -> EstimateResult<()> {
        self.expect_stage(Stage::ContactCapture)?;
        contact.validate()?;
        self.session.contact = Some(contact);
        self.session.touch();
        Ok(())
    }

    /// Check the gate of a stage against the session.
    fn check_gate(&self, stage: Stage) -> EstimateResult<()> {
        let s = &self.session;
        match stage {
            Stage::AddressSelection => match &s.address {
                Some(address) => address.coordinates.validate(),
                None => Err(EstimateError::stage_incomplete(stage, "address")),
            },
            Stage::DimensionCapture => match &s.dimensions {
                Some(_) => Ok(()),
                None => Err(EstimateError::stage_incomplete(stage, "dimensions")),
            },
            Stage::ConditionCapture => match &s.facade {
                Some(_) => Ok(()),
                None => Err(EstimateError::stage_incomplete(stage, "support and condition")),
            },
            Stage::OptionCapture => match &s.options {
                Some(_) => Ok(()),
                None => Err(EstimateError::stage_incomplete(stage, "options")),
            },
            Stage::ContactCapture => match &s.contact {
                Some(contact) => contact.validate(),
                None => Err(EstimateError::stage_incomplete(stage, "contact")),
            },
            Stage::ResultDelivery => Ok(()),
        }
    }

    /// Earliest stage whose gate does not hold (`ResultDelivery` when all do)
    pub fn earliest_incomplete(&self) -> Stage {
        Stage::ALL
            .into_iter()
            .find(|stage| self.check_gate(*stage).is_err())
            .unwrap_or(Stage::ResultDelivery)
    }

    /// Move to the next stage if the current one is complete.
    pub fn advance(&mut self) -> EstimateResult<Stage> {
        let next = self.stage.next().ok_or_else(|| {
            EstimateError::invalid_transition(self.stage, "Already on the last stage; use start over")
        })?;
        self.check_gate(self.stage)?;
        if next == Stage::ResultDelivery {
            self.ensure_estimate()?;
        }
        info!(session = %self.session.id, from = %self.stage, to = %next, "Wizard advanced");
        self.stage = next;
        Ok(next)
    }

    /// Step back one stage. Data is kept; on the first stage this is a no-op.
    pub fn back(&mut self) -> Stage {
        if let Some(previous) = self.stage.previous() {
            info!(session = %self.session.id, from = %self.stage, to = %previous, "Wizard stepped back");
            self.stage = previous;
        }
        self.stage
    }

    /// Jump to a stage (e.g. from a stored link).
    ///
    /// Lands on `target` when every earlier stage is complete, otherwise on
    /// the earliest incomplete stage. Never computes with partial data.
    pub fn enter(&mut self, target: Stage) -> EstimateResult<Stage> {
        let earliest = self.earliest_incomplete();
        let landing = if target > earliest {
            warn!(
                session = %self.session.id,
                requested = %target,
                redirected = %earliest,
                "Stage entered with missing upstream data, redirecting"
            );
            earliest
        } else {
            target
        };
        if landing == Stage::ResultDelivery {
            self.ensure_estimate()?;
        }
        self.stage = landing;
        Ok(landing)
    }

    /// Clear the whole session and return to the first stage.
    ///
    /// Only available once the estimate has been delivered.
    pub fn start_over(&mut self) -> EstimateResult<()> {
        if self.stage != Stage::ResultDelivery {
            return Err(EstimateError::invalid_transition(
                self.stage,
                "Start over is only available from the estimate",
            ));
        }
        info!(session = %self.session.id, "Starting over");
        self.session.reset();
        self.stage = Stage::AddressSelection;
        Ok(())
    }

    /// Whether the current estimate still has to be sent to the current contact.
    ///
    /// False once it went out for this pricing revision and recipient, so
    /// revisiting the result stage does not send it again.
    pub fn needs_delivery(&self) -> bool {
        if self.estimate().is_none() {
            return false;
        }
        match (&self.session.delivered, &self.session.contact) {
            (_, None) => false,
            (Some(mark), Some(contact)) => {
                mark.revision != self.session.pricing_revision || mark.recipient != *contact
            }
            (None, Some(_)) => true,
        }
    }

    /// Record that the current estimate reached the current contact.
    pub fn mark_delivered(&mut self) -> EstimateResult<()> {
        if self.estimate().is_none() {
            return Err(EstimateError::stage_incomplete(Stage::ResultDelivery, "estimate"));
        }
        let recipient = self
            .session
            .contact
            .clone()
            .ok_or_else(|| EstimateError::stage_incomplete(Stage::ContactCapture, "contact"))?;
        info!(session = %self.session.id, revision = self.session.pricing_revision, "Estimate delivered");
        self.session.delivered = Some(DeliveryMark {
            revision: self.session.pricing_revision,
            recipient,
        });
        self.session.touch();
        Ok(())
    }

    /// Reuse the cached estimate when nothing changed, otherwise derive and price.
    fn ensure_estimate(&mut self) -> EstimateResult<&EstimationResult> {
        let revision = self.session.pricing_revision;
        let fresh = matches!(&self.session.estimate, Some(cached) if cached.revision == revision);

        if !fresh {
            let dimensions = self
                .session
                .dimensions
                .as_ref()
                .ok_or_else(|| EstimateError::stage_incomplete(Stage::DimensionCapture, "dimensions"))?;
            let facade = self
                .session
                .facade
                .ok_or_else(|| EstimateError::stage_incomplete(Stage::ConditionCapture, "support and condition"))?;
            let options = self
                .session
                .options
                .as_ref()
                .ok_or_else(|| EstimateError::stage_incomplete(Stage::OptionCapture, "options"))?;

            let geometry = derive_geometry(dimensions);
            let result = price(&geometry, facade.support, facade.condition, options, &self.rates)?;
            self.computations += 1;
            info!(
                session = %self.session.id,
                revision,
                total = %result.total,
                "Estimate computed"
            );
            self.session.estimate = Some(CachedEstimate {
                revision,
                geometry,
                result,
            });
        }

        self.session
            .estimate
            .as_ref()
            .map(|cached| &cached.result)
            .ok_or_else(|| EstimateError::Internal {
                message: "estimate missing after computation".to_string(),
            })
    }

    /// Dimensions to pre-fill the dimension stage with: the stored ones, or
    /// context hints over defaults.
    pub fn suggested_dimensions(&self) -> GeometryInput {
        if let Some(dimensions) = &self.session.dimensions {
            return dimensions.clone();
        }
        suggest_dimensions(&self.session.context)
    }

    /// Options to pre-fill the option stage with: the stored ones, or
    /// suggestions from the context and confirmed dimensions.
    pub fn suggested_options(&self) -> OptionsBag {
        if let Some(options) = &self.session.options {
            return options.clone();
        }
        let dimensions = self.suggested_dimensions();
        OptionsBag::suggested(&self.session.context, &dimensions)
    }
}

/// Dimensions from context hints, falling back to defaults per field.
pub fn suggest_dimensions(context: &BuildingContext) -> GeometryInput {
    let positive = |v: Option<f64>| v.filter(|w| w.is_finite() && *w > 0.0);
    GeometryInput {
        kind: BuildingKind::Attached,
        level_count: context.level_count_hint.filter(|n| *n > 0).unwrap_or(DEFAULT_LEVEL_COUNT),
        level_height_m: DEFAULT_LEVEL_HEIGHT_M,
        street_width_m: positive(context.frontage_length_hint_m).unwrap_or(DEFAULT_STREET_WIDTH_M),
        rear_width_m: positive(context.rear_frontage_hint_m),
        depth_m: positive(context.depth_hint_m),
        treat_side_wall: false,
        zones: ZoneSelection::Street,
        width_floor_m: DEFAULT_WIDTH_FLOOR_M,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConditionRating, SupportMaterial};
    use crate::rates::canonical_rates;
    use crate::services::Coordinates;

    fn daval() -> SelectedAddress {
        SelectedAddress {
            label: "3 rue Daval, 75011 Paris".to_string(),
            coordinates: Coordinates::new(48.855, 2.371),
        }
    }

    fn oberkampf() -> SelectedAddress {
        SelectedAddress {
            label: "12 rue Oberkampf, 75011 Paris".to_string(),
            coordinates: Coordinates::new(48.864, 2.370),
        }
    }

    fn plaster_good() -> FacadeCondition {
        FacadeCondition {
            support: SupportMaterial::Plaster,
            condition: ConditionRating::Good,
        }
    }

    /// Walk a fresh wizard all the way to the estimate.
    fn completed() -> Wizard {
        let mut w = Wizard::new(canonical_rates());
        w.submit_address(daval(), BuildingContext::default(), None).unwrap();
        w.advance().unwrap();
        w.submit_dimensions(GeometryInput::street_frontage(5, 3.0, 15.0)).unwrap();
        w.advance().unwrap();
        w.submit_condition(plaster_good()).unwrap();
        w.advance().unwrap();
        w.submit_options(OptionsBag::default()).unwrap();
        w.advance().unwrap();
        w.submit_contact(ContactInfo::new("Ana", "ana@example.fr")).unwrap();
        w.advance().unwrap();
        w
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::AddressSelection.next(), Some(Stage::DimensionCapture));
        assert_eq!(Stage::ResultDelivery.next(), None);
        assert_eq!(Stage::AddressSelection.previous(), None);
        assert_eq!(Stage::ContactCapture.number(), 5);
    }

    #[test]
    fn test_full_walk_computes_once() {
        let w = completed();
        assert_eq!(w.stage(), Stage::ResultDelivery);
        assert_eq!(w.computation_count(), 1);
        assert!(w.estimate().is_some());
    }

    #[test]
    fn test_advance_requires_gate() {
        let mut w = Wizard::new(canonical_rates());
        let err = w.advance().unwrap_err();
        assert_eq!(err.error_code(), "STAGE_INCOMPLETE");
        assert_eq!(w.stage(), Stage::AddressSelection);
    }

    #[test]
    fn test_submit_on_wrong_stage_is_rejected() {
        let mut w = Wizard::new(canonical_rates());
        let err = w.submit_condition(plaster_good()).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::StageMismatch {
                current: Stage::AddressSelection,
                submitted: Stage::ConditionCapture
            }
        ));
    }

    #[test]
    fn test_invalid_contact_is_rejected() {
        let mut w = completed();
        w.back();
        assert_eq!(w.stage(), Stage::ContactCapture);
        assert!(w.submit_contact(ContactInfo::new("Ana", "not-an-email")).is_err());
        assert_eq!(w.session().contact().unwrap().email, "ana@example.fr");
    }

    #[test]
    fn test_back_keeps_data() {
        let mut w = completed();
        for _ in 0..10 {
            w.back();
        }
        assert_eq!(w.stage(), Stage::AddressSelection);
        assert!(w.session().dimensions().is_some());
        assert!(w.session().facade().is_some());
        assert!(w.session().options().is_some());
        assert!(w.session().contact().is_some());
    }

    #[test]
    fn test_scenario_d_new_address_clears_downstream() {
        let mut w = completed();
        for _ in 0..5 {
            w.back();
        }
        w.submit_address(oberkampf(), BuildingContext::default(), None).unwrap();

        let s = w.session();
        assert_eq!(s.address().unwrap(), &oberkampf());
        assert!(s.dimensions().is_none());
        assert!(s.facade().is_none());
        assert!(s.options().is_none());
        assert!(s.estimate().is_none());
        assert!(w.estimate().is_none());
    }

    #[test]
    fn test_same_address_keeps_downstream() {
        let mut w = completed();
        for _ in 0..5 {
            w.back();
        }
        w.submit_address(daval(), BuildingContext::default(), None).unwrap();
        assert!(w.session().dimensions().is_some());
        assert_eq!(w.enter(Stage::ResultDelivery).unwrap(), Stage::ResultDelivery);
        assert_eq!(w.computation_count(), 1);
    }

    #[test]
    fn test_reentering_result_reuses_cache() {
        let mut w = completed();
        w.back();
        w.advance().unwrap();
        w.enter(Stage::ResultDelivery).unwrap();
        assert_eq!(w.computation_count(), 1);
    }

    #[test]
    fn test_upstream_change_forces_recompute() {
        let mut w = completed();
        let before = w.estimate().unwrap().total;

        w.enter(Stage::OptionCapture).unwrap();
        let mut options = OptionsBag::default();
        options.large_windows = 4;
        w.submit_options(options).unwrap();
        assert!(w.estimate().is_none());

        w.advance().unwrap();
        w.advance().unwrap();
        assert_eq!(w.computation_count(), 2);
        assert!(w.estimate().unwrap().total > before);
    }

    #[test]
    fn test_identical_resubmission_keeps_cache() {
        let mut w = completed();
        w.enter(Stage::ConditionCapture).unwrap();
        w.submit_condition(plaster_good()).unwrap();
        assert!(w.estimate().is_some());
        w.enter(Stage::ResultDelivery).unwrap();
        assert_eq!(w.computation_count(), 1);
    }

    #[test]
    fn test_contact_change_keeps_estimate() {
        let mut w = completed();
        w.back();
        w.submit_contact(ContactInfo::new("Bo", "bo@example.fr")).unwrap();
        w.advance().unwrap();
        assert_eq!(w.computation_count(), 1);
    }

    #[test]
    fn test_delivery_is_once_per_estimate_and_recipient() {
        let mut w = completed();
        assert!(w.needs_delivery());
        w.mark_delivered().unwrap();
        assert!(!w.needs_delivery());

        // Same contact confirmed again: nothing new to send
        w.back();
        w.submit_contact(ContactInfo::new("Ana", "ana@example.fr")).unwrap();
        w.advance().unwrap();
        assert!(!w.needs_delivery());

        // New recipient
        w.back();
        w.submit_contact(ContactInfo::new("Bo", "bo@example.fr")).unwrap();
        w.advance().unwrap();
        assert!(w.needs_delivery());
        w.mark_delivered().unwrap();

        // New estimate
        w.back();
        w.back();
        let mut options = OptionsBag::default();
        options.large_windows = 2;
        w.submit_options(options).unwrap();
        w.advance().unwrap();
        w.advance().unwrap();
        assert_eq!(w.computation_count(), 2);
        assert!(w.needs_delivery());
    }

    #[test]
    fn test_mark_delivered_requires_estimate() {
        let mut w = Wizard::new(canonical_rates());
        assert!(!w.needs_delivery());
        assert!(w.mark_delivered().is_err());
    }

    #[test]
    fn test_start_over_forgets_delivery() {
        let mut w = completed();
        w.mark_delivered().unwrap();
        w.start_over().unwrap();
        assert!(w.session().delivered().is_none());
    }

    #[test]
    fn test_enter_redirects_to_earliest_incomplete() {
        let mut w = Wizard::new(canonical_rates());
        assert_eq!(w.enter(Stage::ResultDelivery).unwrap(), Stage::AddressSelection);

        w.submit_address(daval(), BuildingContext::default(), None).unwrap();
        assert_eq!(w.enter(Stage::OptionCapture).unwrap(), Stage::DimensionCapture);
        assert_eq!(w.computation_count(), 0);
    }

    #[test]
    fn test_start_over_only_from_result() {
        let mut w = Wizard::new(canonical_rates());
        assert_eq!(w.start_over().unwrap_err().error_code(), "INVALID_TRANSITION");

        let mut w = completed();
        let id = w.session().id();
        w.start_over().unwrap();
        assert_eq!(w.stage(), Stage::AddressSelection);
        assert_eq!(w.session().id(), id);
        assert!(w.session().address().is_none());
        assert!(w.session().contact().is_none());
        assert!(w.estimate().is_none());
    }

    #[test]
    fn test_advance_past_last_stage() {
        let mut w = completed();
        assert!(w.advance().is_err());
    }

    #[test]
    fn test_suggestions_follow_context() {
        let context = BuildingContext {
            level_count_hint: Some(7),
            frontage_length_hint_m: Some(12.0),
            has_ground_floor_retail: Some(true),
            ..BuildingContext::default()
        };
        let mut w = Wizard::new(canonical_rates());
        w.submit_address(daval(), context, None).unwrap();

        let dims = w.suggested_dimensions();
        assert_eq!(dims.level_count, 7);
        assert_eq!(dims.street_width_m, 12.0);
        assert_eq!(dims.level_height_m, DEFAULT_LEVEL_HEIGHT_M);

        let options = w.suggested_options();
        assert!(options.has_retail);
        assert_eq!(options.retail_frontage_m, 12.0);
    }

    #[test]
    fn test_default_suggestions() {
        let dims = suggest_dimensions(&BuildingContext::default());
        assert_eq!(dims.level_count, DEFAULT_LEVEL_COUNT);
        assert_eq!(dims.street_width_m, DEFAULT_STREET_WIDTH_M);
        assert_eq!(dims.zones, ZoneSelection::Street);
    }
}
