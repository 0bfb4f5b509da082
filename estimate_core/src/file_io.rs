//! # File I/O Module
//!
//! Estimate export and the file-based delivery outbox:
//! - **Atomic writes**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: reports carry a schema version checked on load
//! - **Outbox**: a [`DeliveryService`] that drops each delivery into a directory
//!
//! ## File Format
//!
//! Reports are pretty-printed JSON (`.json`). An outbox delivery is three
//! files sharing a stem (timestamp, short random id, recipient slug): the
//! request as JSON, the message as `.txt` and, when one was rendered, the PDF.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::file_io::{load_report, save_report, EstimateReport};
//! use std::path::Path;
//!
//! # fn demo(report: EstimateReport) -> estimate_core::errors::EstimateResult<()> {
//! save_report(&report, Path::new("estimate.json"))?;
//! let loaded = load_report(Path::new("estimate.json"))?;
//! assert_eq!(loaded.result.total, report.result.total);
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculations::geometry::{Geometry, GeometryInput};
use crate::calculations::pricing::EstimationResult;
use crate::errors::{EstimateError, EstimateResult, ServiceError};
use crate::options::OptionsBag;
use crate::services::{DeliveryRequest, DeliveryService};
use crate::session::{FacadeCondition, SelectedAddress, SCHEMA_VERSION};
use crate::wizard::{Stage, Wizard};

/// A finished estimate with the inputs it was priced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub session_id: Option<Uuid>,
    pub address: Option<SelectedAddress>,
    pub dimensions: GeometryInput,
    pub geometry: Geometry,
    pub facade: FacadeCondition,
    pub options: OptionsBag,
    pub result: EstimationResult,
    pub generated_at: DateTime<Utc>,
}

impl EstimateReport {
    pub fn new(
        address: Option<SelectedAddress>,
        dimensions: GeometryInput,
        geometry: Geometry,
        facade: FacadeCondition,
        options: OptionsBag,
        result: EstimationResult,
    ) -> Self {
        EstimateReport {
            version: SCHEMA_VERSION.to_string(),
            session_id: None,
            address,
            dimensions,
            geometry,
            facade,
            options,
            result,
            generated_at: Utc::now(),
        }
    }

    /// Snapshot the current estimate of a wizard.
    ///
    /// Fails with `StageIncomplete` when no up-to-date estimate exists.
    pub fn from_wizard(wizard: &Wizard) -> EstimateResult<Self> {
        let session = wizard.session();
        let result = wizard
            .estimate()
            .cloned()
            .ok_or_else(|| EstimateError::stage_incomplete(Stage::ResultDelivery, "estimate"))?;
        let geometry = session
            .estimate()
            .map(|cached| cached.geometry.clone())
            .ok_or_else(|| EstimateError::stage_incomplete(Stage::ResultDelivery, "estimate"))?;
        let dimensions = session
            .dimensions()
            .cloned()
            .ok_or_else(|| EstimateError::stage_incomplete(Stage::DimensionCapture, "dimensions"))?;
        let facade = session
            .facade()
            .copied()
            .ok_or_else(|| EstimateError::stage_incomplete(Stage::ConditionCapture, "support and condition"))?;

        let mut report = EstimateReport::new(
            session.address().cloned(),
            dimensions,
            geometry,
            facade,
            session.options().cloned().unwrap_or_default(),
            result,
        );
        report.session_id = Some(session.id());
        Ok(report)
    }

    pub fn address_label(&self) -> &str {
        self.address
            .as_ref()
            .map(|a| a.label.as_str())
            .unwrap_or("Address not given")
    }
}

/// Write bytes to `path` through a sibling temp file and a rename.
///
/// The target is either the old content or the complete new content, never
/// a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> EstimateResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        EstimateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Save a report as pretty JSON with atomic write semantics.
pub fn save_report(report: &EstimateReport, path: &Path) -> EstimateResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| EstimateError::serialization(e.to_string()))?;
    write_atomic(path, json.as_bytes())
}

/// Load a report, rejecting incompatible schema versions.
///
/// # Returns
///
/// * `Ok(EstimateReport)` - Successfully loaded report
/// * `Err(EstimateError::VersionMismatch)` - File version is incompatible
/// * `Err(EstimateError::SerializationError)` - Invalid JSON
/// * `Err(EstimateError::FileError)` - I/O error
pub fn load_report(path: &Path) -> EstimateResult<EstimateReport> {
    let contents = fs::read_to_string(path)
        .map_err(|e| EstimateError::file_error("read", path.display().to_string(), e.to_string()))?;

    let report: EstimateReport = serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&report.version)?;
    Ok(report)
}

/// Validate that a file version is compatible with the current schema.
///
/// Major must match; while on 0.x a newer minor is rejected as well.
fn validate_version(file_version: &str) -> EstimateResult<()> {
    let mismatch = || EstimateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let file = Version::parse(file_version).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|_| mismatch())?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

/// Delivery service that writes each delivery into a local directory.
#[derive(Debug, Clone)]
pub struct FileOutbox {
    dir: PathBuf,
}

impl FileOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileOutbox { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one delivery and return the paths written.
    pub fn write(&self, request: &DeliveryRequest) -> EstimateResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| EstimateError::file_error("create outbox", self.dir.display().to_string(), e.to_string()))?;

        let nonce = Uuid::new_v4().simple().to_string();
        let stem = format!(
            "{}-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S%.3f"),
            &nonce[..8],
            slug(&request.recipient.email)
        );
        let mut written = Vec::new();

        let json = serde_json::to_string_pretty(request).map_err(|e| EstimateError::serialization(e.to_string()))?;
        let json_path = self.dir.join(format!("{stem}.json"));
        write_atomic(&json_path, json.as_bytes())?;
        written.push(json_path);

        let txt_path = self.dir.join(format!("{stem}.txt"));
        write_atomic(&txt_path, request.message.as_bytes())?;
        written.push(txt_path);

        if let Some(document) = &request.document {
            let pdf_path = self.dir.join(format!("{stem}.pdf"));
            write_atomic(&pdf_path, document)?;
            written.push(pdf_path);
        }

        info!(outbox = %self.dir.display(), files = written.len(), "Delivery written to outbox");
        Ok(written)
    }
}

impl DeliveryService for FileOutbox {
    fn deliver(&self, request: &DeliveryRequest) -> Result<(), ServiceError> {
        self.write(request).map(|_| ()).map_err(|e| ServiceError::Unavailable {
            service: "outbox".to_string(),
            reason: e.to_string(),
        })
    }
}

/// File-name-safe form of an arbitrary string
fn slug(s: &str) -> String {
    let slug: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "estimate".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::derive_geometry;
    use crate::calculations::pricing::price;
    use crate::materials::{ConditionRating, SupportMaterial};
    use crate::rates::canonical_rates;
    use crate::services::{deliver_estimate, BuildingContext, ContactInfo, Coordinates};
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("ravel_test_{}_{}", name, Uuid::new_v4()))
    }

    fn sample_report() -> EstimateReport {
        let dimensions = GeometryInput::street_frontage(5, 3.0, 15.0);
        let geometry = derive_geometry(&dimensions);
        let facade = FacadeCondition {
            support: SupportMaterial::CutStone,
            condition: ConditionRating::Average,
        };
        let options = OptionsBag::default();
        let result = price(&geometry, facade.support, facade.condition, &options, &canonical_rates()).unwrap();
        EstimateReport::new(
            Some(SelectedAddress {
                label: "3 rue Daval, 75011 Paris".to_string(),
                coordinates: Coordinates::new(48.855, 2.371),
            }),
            dimensions,
            geometry,
            facade,
            options,
            result,
        )
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip.json");
        let report = sample_report();
        save_report(&report, &path).unwrap();

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.address_label(), "3 rue Daval, 75011 Paris");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic.json");
        save_report(&sample_report(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_incompatible_version() {
        let path = temp_path("version.json");
        let mut report = sample_report();
        report.version = "1.0.0".to_string();
        save_report(&report, &path).unwrap();

        assert!(matches!(load_report(&path), Err(EstimateError::VersionMismatch { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_report(&temp_path("missing.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_report_from_incomplete_wizard_fails() {
        let wizard = Wizard::new(canonical_rates());
        let err = EstimateReport::from_wizard(&wizard).unwrap_err();
        assert_eq!(err.error_code(), "STAGE_INCOMPLETE");
    }

    #[test]
    fn test_report_from_completed_wizard() {
        let mut w = Wizard::new(canonical_rates());
        let address = SelectedAddress {
            label: "3 rue Daval, 75011 Paris".to_string(),
            coordinates: Coordinates::new(48.855, 2.371),
        };
        w.submit_address(address, BuildingContext::default(), None).unwrap();
        w.advance().unwrap();
        w.submit_dimensions(GeometryInput::street_frontage(5, 3.0, 15.0)).unwrap();
        w.advance().unwrap();
        w.submit_condition(FacadeCondition {
            support: SupportMaterial::Plaster,
            condition: ConditionRating::Good,
        })
        .unwrap();
        w.advance().unwrap();
        w.submit_options(OptionsBag::default()).unwrap();
        w.advance().unwrap();
        w.submit_contact(ContactInfo::new("Ana", "ana@example.fr")).unwrap();
        w.advance().unwrap();

        let report = EstimateReport::from_wizard(&w).unwrap();
        assert_eq!(report.session_id, Some(w.session().id()));
        assert_eq!(report.geometry.treated_surface_m2, 225.0);
        assert_eq!(Some(&report.result), w.estimate());
    }

    #[test]
    fn test_outbox_writes_delivery_files() {
        let dir = temp_path("outbox");
        let outbox = FileOutbox::new(&dir);
        let report = sample_report();
        let request = DeliveryRequest::new(
            ContactInfo::new("Ana", "ana@example.fr"),
            report.address_label(),
            report.result.clone(),
            Some(b"%PDF-1.7 test".to_vec()),
        );

        let outcome = deliver_estimate(&outbox, &request);
        assert!(outcome.delivered);

        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 3);
        assert!(names.iter().any(|n| n.ends_with("ana-example-fr.pdf")));
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_outbox_keeps_back_to_back_deliveries_apart() {
        let dir = temp_path("outbox-burst");
        let outbox = FileOutbox::new(&dir);
        let request = DeliveryRequest::new(
            ContactInfo::new("Ana", "ana@example.fr"),
            "3 rue Daval",
            sample_report().result,
            Some(b"%PDF-1.7 test".to_vec()),
        );

        let first = outbox.write(&request).unwrap();
        let second = outbox.write(&request).unwrap();
        assert!(first.iter().all(|path| !second.contains(path)));
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 6);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_outbox_failure_degrades_to_warning() {
        let blocker = temp_path("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let outbox = FileOutbox::new(blocker.join("sub"));
        let request = DeliveryRequest::new(
            ContactInfo::new("Ana", "ana@example.fr"),
            "3 rue Daval",
            sample_report().result,
            None,
        );

        let outcome = deliver_estimate(&outbox, &request);
        assert!(!outcome.delivered);
        assert!(outcome.warning.is_some());

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Ana@Example.fr"), "ana-example-fr");
        assert_eq!(slug("@@"), "estimate");
    }
}
