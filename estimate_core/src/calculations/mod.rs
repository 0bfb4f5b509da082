//! # Estimation Engine
//!
//! The two pure computations behind every estimate. Each follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - a derived value or `*Result` (JSON-serializable)
//! - a free function from one to the other, with no I/O and no shared state
//!
//! ## Available Calculations
//!
//! - [`geometry`] - Building dimensions to treated height, perimeter and surface
//! - [`pricing`] - Geometry, support, condition and options to priced line items

pub mod geometry;
pub mod pricing;

pub use geometry::{derive_geometry, BuildingKind, Geometry, GeometryInput, ZoneSelection};
pub use pricing::{price, EstimationResult, Family, LineCode, LineItem};
