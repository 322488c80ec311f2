//! Package validation: required entries and manifest schema.
//!
//! Validation only reads the archive. Nothing is written until a package
//! has passed both this step and conflict resolution.

use std::collections::BTreeSet;

use maploader_protocol::MapManifest;
use maploader_protocol::constants::{MAX_MANIFEST_BYTES, REQUIRED_MANIFEST_FIELDS};
use serde_json::Value;
use tracing::debug;

use crate::archive::{ArchiveEntry, EntryKind, PackageArchive, classify_entry, is_safe_relative_path};
use crate::error::{Category, PackageError, ValidationError};

/// Result of scanning an archive's entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageScan {
    /// Required categories seen.
    pub found: BTreeSet<Category>,
    /// Whether a thumbnail image is bundled.
    pub has_thumbnail: bool,
    /// Position of the manifest entry in the scanned list.
    pub manifest: Option<usize>,
}

impl PackageScan {
    /// Required categories not seen, in reporting order.
    pub fn missing(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| !self.found.contains(c))
            .collect()
    }

    fn is_complete(&self) -> bool {
        self.found.len() == Category::ALL.len()
    }
}

/// A package that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPackage {
    pub manifest: MapManifest,
    pub has_thumbnail: bool,
}

/// Scans entries once, recording required categories and the thumbnail.
///
/// Stops early once every category and a thumbnail have been seen.
pub fn scan_entries(entries: &[ArchiveEntry]) -> PackageScan {
    let mut scan = PackageScan::default();

    for (position, entry) in entries.iter().enumerate() {
        let kind = classify_entry(&entry.path);
        if kind == EntryKind::Manifest {
            scan.manifest = Some(position);
        }
        if kind == EntryKind::Thumbnail {
            scan.has_thumbnail = true;
        }
        if let Some(category) = kind.category() {
            scan.found.insert(category);
        }

        if scan.is_complete() && scan.has_thumbnail {
            break;
        }
    }

    scan
}

/// Parses manifest bytes and checks the required fields.
pub fn parse_manifest(bytes: &[u8]) -> Result<MapManifest, ValidationError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ValidationError::ManifestParse(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(ValidationError::ManifestParse(
            "expected a JSON object".into(),
        ));
    };

    let missing: Vec<&'static str> = REQUIRED_MANIFEST_FIELDS
        .into_iter()
        .filter(|field| !object.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::ManifestSchema(missing));
    }

    let manifest: MapManifest =
        serde_json::from_value(value).map_err(|e| ValidationError::ManifestParse(e.to_string()))?;

    if manifest.code.contains(['/', '\\'])
        || matches!(manifest.code.as_str(), "." | "..")
        || !is_safe_relative_path(&manifest.code)
    {
        return Err(ValidationError::InvalidCode(manifest.code));
    }

    Ok(manifest)
}

/// Validates a package: required entries, then the manifest.
pub fn validate(archive: &PackageArchive) -> Result<ValidatedPackage, PackageError> {
    let entries = archive.entries();
    let scan = scan_entries(entries);

    if !scan.is_complete() {
        let missing = scan.missing();
        debug!(?missing, archive = %archive.path().display(), "package incomplete");
        return Err(ValidationError::MissingContent(missing).into());
    }

    // A complete scan always saw the manifest.
    let Some(position) = scan.manifest else {
        return Err(ValidationError::MissingContent(vec![Category::Manifest]).into());
    };
    let bytes = archive.read_entry(&entries[position], MAX_MANIFEST_BYTES)?;
    let manifest = parse_manifest(&bytes)?;

    debug!(code = %manifest.code, thumbnail = scan.has_thumbnail, "package validated");
    Ok(ValidatedPackage {
        manifest,
        has_thumbnail: scan.has_thumbnail,
    })
}
