//! Map package pipeline: read, validate, check for conflicts, route.
//!
//! # Pipeline
//!
//! 1. **Open**: read the archive's entry list ([`PackageArchive`])
//! 2. **Validate**: required entries present, manifest well-formed
//! 3. **Resolve conflicts**: code not loaded and not a vanilla map
//! 4. **Route**: stream every entry to its destination concurrently
//!
//! Steps 1–3 never touch the filesystem beyond reading the archive.

pub mod archive;
pub mod conflict;
pub mod error;
pub mod router;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{ArchiveEntry, EntryKind, PackageArchive, classify_entry};
pub use conflict::{AdvisorySink, ConflictResolver, LogAdvisory, VanillaCatalog};
pub use error::{Category, ConflictError, PackageError, ValidationError};
pub use router::{Destinations, RouteReport, RoutedFile, RoutedKind, route_entries};
pub use validator::{PackageScan, ValidatedPackage, parse_manifest, scan_entries, validate};
