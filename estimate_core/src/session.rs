//! # Session Aggregate
//!
//! The per-user state the wizard accumulates, one slice per stage, and the
//! in-process store that keys wizards by session id.
//!
//! ## Structure
//!
//! ```text
//! SessionAggregate
//! ├── id: Uuid
//! ├── meta: SessionMetadata (schema version, timestamps)
//! ├── address: SelectedAddress (+ context hints, imagery)
//! ├── dimensions: GeometryInput
//! ├── facade: FacadeCondition
//! ├── options: OptionsBag
//! ├── contact: ContactInfo
//! ├── estimate: CachedEstimate (tagged with the pricing revision it was computed at)
//! ├── delivered: DeliveryMark (what was last sent, and to whom)
//! └── pricing_revision: u64
//! ```
//!
//! Nothing here is durable; a session lives as long as its process.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::geometry::{Geometry, GeometryInput};
use crate::calculations::pricing::EstimationResult;
use crate::materials::{ConditionRating, SupportMaterial};
use crate::options::OptionsBag;
use crate::rates::canonical_rates;
use crate::services::{BuildingContext, ContactInfo, Coordinates, ImageryRef};
use crate::wizard::Wizard;

/// Schema version of serialized sessions and reports
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Address chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAddress {
    pub label: String,
    pub coordinates: Coordinates,
}

/// Support material and condition confirmed on the condition stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacadeCondition {
    pub support: SupportMaterial,
    pub condition: ConditionRating,
}

/// Last computed estimate and the inputs it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEstimate {
    /// `pricing_revision` at computation time
    pub revision: u64,
    pub geometry: Geometry,
    pub result: EstimationResult,
}

/// Estimate revision and recipient of the last successful delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMark {
    pub revision: u64,
    pub recipient: ContactInfo,
}

/// Session metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub version: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Everything collected for one user.
///
/// Fields are private to the crate; the wizard is the only writer, so the
/// invalidation rules cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAggregate {
    pub(crate) id: Uuid,
    pub(crate) meta: SessionMetadata,
    pub(crate) address: Option<SelectedAddress>,
    pub(crate) context: BuildingContext,
    pub(crate) imagery: Option<ImageryRef>,
    pub(crate) dimensions: Option<GeometryInput>,
    pub(crate) facade: Option<FacadeCondition>,
    pub(crate) options: Option<OptionsBag>,
    pub(crate) contact: Option<ContactInfo>,
    pub(crate) estimate: Option<CachedEstimate>,
    #[serde(default)]
    pub(crate) delivered: Option<DeliveryMark>,
    /// Bumped whenever a slice that feeds pricing actually changes
    pub(crate) pricing_revision: u64,
}

impl SessionAggregate {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Utc::now();
        SessionAggregate {
            id,
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            address: None,
            context: BuildingContext::default(),
            imagery: None,
            dimensions: None,
            facade: None,
            options: None,
            contact: None,
            estimate: None,
            delivered: None,
            pricing_revision: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn meta(&self) -> &SessionMetadata {
        &self.meta
    }

    pub fn address(&self) -> Option<&SelectedAddress> {
        self.address.as_ref()
    }

    pub fn context(&self) -> &BuildingContext {
        &self.context
    }

    pub fn imagery(&self) -> Option<&ImageryRef> {
        self.imagery.as_ref()
    }

    pub fn dimensions(&self) -> Option<&GeometryInput> {
        self.dimensions.as_ref()
    }

    pub fn facade(&self) -> Option<&FacadeCondition> {
        self.facade.as_ref()
    }

    pub fn options(&self) -> Option<&OptionsBag> {
        self.options.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }

    pub fn estimate(&self) -> Option<&CachedEstimate> {
        self.estimate.as_ref()
    }

    pub fn delivered(&self) -> Option<&DeliveryMark> {
        self.delivered.as_ref()
    }

    pub fn pricing_revision(&self) -> u64 {
        self.pricing_revision
    }

    /// Update the modified timestamp.
    pub(crate) fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Drop every slice downstream of the address.
    pub(crate) fn clear_downstream_of_address(&mut self) {
        self.dimensions = None;
        self.facade = None;
        self.options = None;
        self.estimate = None;
        self.pricing_revision += 1;
        self.touch();
    }

    /// Reset to an empty session, keeping only the id.
    pub(crate) fn reset(&mut self) {
        let revision = self.pricing_revision + 1;
        *self = SessionAggregate::with_id(self.id);
        self.pricing_revision = revision;
    }
}

impl Default for SessionAggregate {
    fn default() -> Self {
        SessionAggregate::new()
    }
}

/// In-process wizards keyed by session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Wizard>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Start a new session priced with the canonical rate table.
    pub fn create(&mut self) -> Uuid {
        let wizard = Wizard::new(canonical_rates());
        let id = wizard.session().id();
        self.sessions.insert(id, wizard);
        id
    }

    /// Register an existing wizard (e.g. one built with a custom rate table).
    pub fn insert(&mut self, wizard: Wizard) -> Uuid {
        let id = wizard.session().id();
        self.sessions.insert(id, wizard);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&Wizard> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Wizard> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Wizard> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Stage;

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionAggregate::new();
        assert!(session.address().is_none());
        assert!(session.estimate().is_none());
        assert_eq!(session.pricing_revision(), 0);
        assert_eq!(session.meta().version, SCHEMA_VERSION);
    }

    #[test]
    fn test_reset_keeps_id_and_bumps_revision() {
        let mut session = SessionAggregate::new();
        let id = session.id();
        session.contact = Some(ContactInfo::new("Ana", "ana@example.fr"));
        session.reset();
        assert_eq!(session.id(), id);
        assert!(session.contact().is_none());
        assert_eq!(session.pricing_revision(), 1);
    }

    #[test]
    fn test_session_serialization() {
        let mut session = SessionAggregate::new();
        session.address = Some(SelectedAddress {
            label: "3 rue Daval, 75011 Paris".to_string(),
            coordinates: Coordinates::new(48.855, 2.371),
        });
        let json = serde_json::to_string(&session).unwrap();
        let back: SessionAggregate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_store_create_get_remove() {
        let mut store = SessionStore::new();
        assert!(store.is_empty());

        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&a).unwrap().stage(), Stage::AddressSelection);

        assert!(store.get_mut(&b).is_some());
        assert!(store.remove(&a).is_some());
        assert!(store.get(&a).is_none());
        assert_eq!(store.len(), 1);
    }
}
