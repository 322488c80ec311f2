//! Map code conflict checks against loaded maps and the vanilla catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ConflictError, PackageError};

/// Built-in maps shipped with the game, keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VanillaCatalog {
    codes: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    cities: BTreeMap<String, serde_yaml::Value>,
}

impl VanillaCatalog {
    /// Loads the catalog from the game's `latest-cities.yml`.
    ///
    /// A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self, PackageError> {
        if !path.exists() {
            warn!(path = %path.display(), "vanilla catalog not found, assuming no vanilla maps");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses catalog YAML with a top-level `cities` mapping.
    pub fn from_yaml(content: &str) -> Result<Self, PackageError> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| PackageError::Catalog(e.to_string()))?;
        Ok(Self {
            codes: file.cities.into_keys().collect(),
        })
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Receives non-blocking notices meant for the user.
pub trait AdvisorySink: Send + Sync {
    fn advise(&self, title: &str, message: &str);
}

/// Advisory sink that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAdvisory;

impl AdvisorySink for LogAdvisory {
    fn advise(&self, title: &str, message: &str) {
        warn!(title, "{message}");
    }
}

/// Decides whether a map code may be installed.
///
/// Codes are compared case-sensitively.
pub struct ConflictResolver<'a> {
    catalog: &'a VanillaCatalog,
    advisory: &'a dyn AdvisorySink,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(catalog: &'a VanillaCatalog, advisory: &'a dyn AdvisorySink) -> Self {
        Self { catalog, advisory }
    }

    /// Checks `code` against the caller's loaded codes, then the catalog.
    pub fn check(&self, code: &str, loaded: &[String]) -> Result<(), ConflictError> {
        info!(code, "checking map code against loaded and vanilla maps");

        if loaded.iter().any(|c| c == code) {
            return Err(ConflictError::AlreadyLoaded(code.to_string()));
        }

        if self.catalog.contains(code) {
            self.advisory.advise(
                "Map already exists",
                &format!(
                    "A vanilla map with the code {code} already exists, and will not be overwritten. \
                     If you really want to install this, you can do so manually yourself, \
                     but know that you may brick the vanilla map."
                ),
            );
            return Err(ConflictError::VanillaCollision(code.to_string()));
        }

        Ok(())
    }
}
