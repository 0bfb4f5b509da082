//! # estimate_core - Façade Renovation Estimation Engine
//!
//! `estimate_core` is the computational heart of Ravel: it turns a handful of
//! building measurements and condition flags into an itemized, indicative
//! cost estimate, and sequences the collection of those inputs through a
//! fixed set of wizard stages. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless engine**: geometry derivation and pricing are pure functions
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Exact money**: amounts are integer cents; lines always add up to the total
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::calculations::{derive_geometry, price, GeometryInput};
//! use estimate_core::materials::{ConditionRating, SupportMaterial};
//! use estimate_core::options::OptionsBag;
//! use estimate_core::rates::canonical_rates;
//!
//! let geometry = derive_geometry(&GeometryInput::street_frontage(5, 3.0, 15.0));
//! let result = price(
//!     &geometry,
//!     SupportMaterial::CutStone,
//!     ConditionRating::Good,
//!     &OptionsBag::default(),
//!     &canonical_rates(),
//! ).unwrap();
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Geometry deriver and pricing rule engine
//! - [`materials`] - Support materials, condition ratings, finish selection
//! - [`options`] - Typed options bag with zero defaults
//! - [`rates`] - Versioned rate tables (coefficients and unit prices)
//! - [`wizard`] - Stage sequencing, gating and invalidation
//! - [`session`] - Session aggregate and in-process session store
//! - [`services`] - External collaborator boundaries and their fallbacks
//! - [`units`] - Money and quantity units
//! - [`errors`] - Structured error types
//! - [`file_io`] - Report export with atomic writes, file outbox
//! - [`pdf`] - PDF rendering of an estimate

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod options;
pub mod pdf;
pub mod rates;
pub mod services;
pub mod session;
pub mod units;
pub mod wizard;

// Re-export commonly used types at crate root for convenience
pub use calculations::{derive_geometry, price, EstimationResult, Geometry, GeometryInput, LineItem};
pub use errors::{EstimateError, EstimateResult, ServiceError};
pub use file_io::{load_report, save_report, EstimateReport, FileOutbox};
pub use rates::{canonical_rates, RateTable};
pub use session::{SessionAggregate, SessionStore};
pub use wizard::{Stage, Wizard};
