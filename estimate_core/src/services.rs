//! # External Collaborators
//!
//! Boundary types and traits for the services the wizard consults: address
//! search, building context, street-level imagery and delivery of the
//! finished estimate.
//!
//! Implementations live outside the engine (HTTP clients in the CLI, the
//! file outbox in [`crate::file_io`]). The free functions in this module
//! wrap every call and degrade failures to a default value, so a slow or
//! broken service never blocks the wizard and never reaches the session:
//!
//! | Call | On failure |
//! |------|------------|
//! | [`search_addresses`] | empty candidate list |
//! | [`building_context`] | empty hint bag |
//! | [`street_imagery`] | generic fallback image |
//! | [`deliver_estimate`] | [`DeliveryOutcome`] carrying a warning for the user |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::pricing::EstimationResult;
use crate::errors::{EstimateError, EstimateResult, ServiceError};

/// Queries shorter than this (after trimming) are not sent to the resolver
pub const MIN_QUERY_CHARS: usize = 3;

/// Shown when no street-level frame is available
pub const FALLBACK_IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/9/9b/Rue_des_%C3%89coles_-_Paris_V_%28FR75%29_-_2021-07-31_-_1.jpg";

/// WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates { latitude, longitude }
    }

    pub fn validate(&self) -> EstimateResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EstimateError::invalid_input(
                "latitude",
                self.latitude.to_string(),
                "Latitude must be between -90 and 90",
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EstimateError::invalid_input(
                "longitude",
                self.longitude.to_string(),
                "Longitude must be between -180 and 180",
            ));
        }
        Ok(())
    }
}

/// One match for a free-text address query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub label: String,
    pub coordinates: Coordinates,
}

/// Best-effort hints about the building at an address.
///
/// Every field is optional; absence means "use the wizard's own default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingContext {
    pub level_count_hint: Option<i32>,
    pub frontage_length_hint_m: Option<f64>,
    pub rear_frontage_hint_m: Option<f64>,
    pub depth_hint_m: Option<f64>,
    pub has_ground_floor_retail: Option<bool>,
    pub period_style_suspected: Option<bool>,
}

/// Embeddable street-level frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryRef {
    pub url: String,
    /// Generic placeholder rather than a frame of this building
    pub is_fallback: bool,
}

impl ImageryRef {
    pub fn fallback() -> Self {
        ImageryRef {
            url: FALLBACK_IMAGE_URL.to_string(),
            is_fallback: true,
        }
    }
}

/// How to reach the person asking for the estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Desired start of works, in months from now
    #[serde(default)]
    pub lead_time_months: Option<u32>,
    #[serde(default)]
    pub urgent: bool,
}

impl ContactInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        ContactInfo {
            name: name.into(),
            email: email.into(),
            ..ContactInfo::default()
        }
    }

    /// The e-mail address must be syntactically valid; everything else is free.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.email.trim().is_empty() {
            return Err(EstimateError::missing_field("email"));
        }
        if !is_valid_email(&self.email) {
            return Err(EstimateError::invalid_input(
                "email",
                &self.email,
                "Not a valid e-mail address",
            ));
        }
        Ok(())
    }
}

/// `local@domain.tld`, no whitespace, one `@`, a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}

/// Everything a delivery service needs to send one estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub recipient: ContactInfo,
    pub address_label: String,
    pub result: EstimationResult,
    /// Rendered PDF, when rendering succeeded
    #[serde(skip)]
    pub document: Option<Vec<u8>>,
    /// Plain-text body
    pub message: String,
}

impl DeliveryRequest {
    pub fn new(
        recipient: ContactInfo,
        address_label: impl Into<String>,
        result: EstimationResult,
        document: Option<Vec<u8>>,
    ) -> Self {
        let address_label = address_label.into();
        let message = delivery_message(&recipient, &address_label, &result);
        DeliveryRequest {
            recipient,
            address_label,
            result,
            document,
            message,
        }
    }
}

fn delivery_message(recipient: &ContactInfo, address_label: &str, result: &EstimationResult) -> String {
    let greeting = if recipient.name.trim().is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", recipient.name.trim())
    };
    let mut body = format!(
        "{greeting}\n\n\
         Here is the indicative estimate for the façade renovation at {address_label}.\n\n\
         Total excl. tax: {}\n\
         Total incl. tax: {}\n\
         Finish: {} on {}\n\n",
        result.total.display_fr(),
        result.total_incl_tax.display_fr(),
        result.finish,
        result.support.display_name().to_lowercase(),
    );
    if recipient.urgent {
        body.push_str("You flagged this request as urgent; we will get back to you first.\n\n");
    }
    body.push_str("These figures are indicative and do not constitute a quotation.\n");
    body
}

/// Result of a delivery attempt. The estimate stays valid either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    /// Shown to the user when delivery failed
    pub warning: Option<String>,
}

/// Free-text address search
pub trait AddressResolver {
    fn search(&self, query: &str) -> Result<Vec<AddressCandidate>, ServiceError>;
}

/// Building hints from a geographic database
pub trait ContextProvider {
    fn lookup(&self, at: Coordinates) -> Result<BuildingContext, ServiceError>;
}

/// Street-level imagery
pub trait ImageryProvider {
    fn frame(&self, at: Coordinates, bearing_deg: Option<f64>) -> Result<ImageryRef, ServiceError>;
}

/// Sends the finished estimate to the requester
pub trait DeliveryService {
    fn deliver(&self, request: &DeliveryRequest) -> Result<(), ServiceError>;
}

/// Search for addresses, degrading to an empty list.
pub fn search_addresses(resolver: &dyn AddressResolver, query: &str) -> Vec<AddressCandidate> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    match resolver.search(query) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(service = e.service(), error = %e, "Address search failed, returning no candidates");
            Vec::new()
        }
    }
}

/// Look up building hints, degrading to an empty hint bag.
pub fn building_context(provider: &dyn ContextProvider, at: Coordinates) -> BuildingContext {
    provider.lookup(at).unwrap_or_else(|e| {
        warn!(service = e.service(), error = %e, "Building context unavailable, using defaults");
        BuildingContext::default()
    })
}

/// Fetch a street-level frame, degrading to the generic image.
pub fn street_imagery(provider: &dyn ImageryProvider, at: Coordinates, bearing_deg: Option<f64>) -> ImageryRef {
    provider.frame(at, bearing_deg).unwrap_or_else(|e| {
        warn!(service = e.service(), error = %e, "Imagery unavailable, using fallback image");
        ImageryRef::fallback()
    })
}

/// Deliver an estimate and report the outcome instead of failing.
pub fn deliver_estimate(service: &dyn DeliveryService, request: &DeliveryRequest) -> DeliveryOutcome {
    match service.deliver(request) {
        Ok(()) => DeliveryOutcome {
            delivered: true,
            warning: None,
        },
        Err(e) => {
            warn!(service = e.service(), error = %e, "Delivery failed");
            DeliveryOutcome {
                delivered: false,
                warning: Some(format!(
                    "We could not send a copy to {} ({}). Your estimate is still shown above.",
                    request.recipient.email, e
                )),
            }
        }
    }
}

/// Context provider used when no geographic database is reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl ContextProvider for NoContext {
    fn lookup(&self, _at: Coordinates) -> Result<BuildingContext, ServiceError> {
        Ok(BuildingContext::default())
    }
}

/// Imagery provider that always yields the generic image
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackImagery;

impl ImageryProvider for FallbackImagery {
    fn frame(&self, _at: Coordinates, _bearing_deg: Option<f64>) -> Result<ImageryRef, ServiceError> {
        Ok(ImageryRef::fallback())
    }
}
