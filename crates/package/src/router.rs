//! Streams package entries to their install destinations.
//!
//! Routing policy, by entry kind:
//!
//! | kind | destination | encoding |
//! |---|---|---|
//! | manifest | not written | |
//! | tile archive | `<tiles>/<code>.<ext>` | verbatim |
//! | thumbnail | `<thumbnails>/<code>.svg` | verbatim |
//! | data (`.json`, `.geojson`) | `<map_dir>/<path>.gz` | gzip |
//!
//! Each entry is written by its own blocking task reading through its own
//! archive handle. [`route_entries`] returns only after every task has
//! settled.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use maploader_protocol::constants::{COMPRESSED_SUFFIX, THUMBNAIL_EXT};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::archive::{ArchiveEntry, EntryKind, PackageArchive, classify_entry, copy_entry, is_safe_relative_path};
use crate::error::PackageError;

/// Install roots for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// `<appDataRoot>/cities/data/<code>`.
    pub map_dir: PathBuf,
    /// Shared tile cache.
    pub tiles_dir: PathBuf,
    /// Public thumbnail directory.
    pub thumbnails_dir: PathBuf,
}

/// How a routed entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedKind {
    TileArchive,
    Thumbnail,
    CompressedData,
}

/// One file written by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedFile {
    pub entry: String,
    pub kind: RoutedKind,
    pub destination: PathBuf,
    pub bytes_read: u64,
}

/// Every file written for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteReport {
    pub files: Vec<RoutedFile>,
}

impl RouteReport {
    pub fn count(&self, kind: RoutedKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }

    pub fn destinations(&self, kind: RoutedKind) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(move |f| f.kind == kind)
            .map(|f| f.destination.as_path())
    }
}

#[derive(Debug, Clone)]
struct RoutePlan {
    index: usize,
    entry: String,
    kind: RoutedKind,
    destination: PathBuf,
}

/// Decides a destination for every entry that gets written.
fn plan_routes(entries: &[ArchiveEntry], code: &str, dest: &Destinations) -> Vec<RoutePlan> {
    let mut plans = Vec::new();
    let mut tile_planned = false;
    let mut thumbnail_planned = false;
    let mut data_planned = BTreeSet::new();

    for entry in entries {
        let (kind, destination) = match classify_entry(&entry.path) {
            EntryKind::Manifest | EntryKind::Ignored => continue,
            EntryKind::TileArchive => {
                if tile_planned {
                    warn!(entry = %entry.path, "extra tile archive skipped");
                    continue;
                }
                tile_planned = true;
                let ext = Path::new(&entry.path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                (
                    RoutedKind::TileArchive,
                    dest.tiles_dir.join(format!("{code}.{ext}")),
                )
            }
            EntryKind::Thumbnail => {
                if thumbnail_planned {
                    warn!(entry = %entry.path, "extra thumbnail skipped");
                    continue;
                }
                thumbnail_planned = true;
                (
                    RoutedKind::Thumbnail,
                    dest.thumbnails_dir.join(format!("{code}.{THUMBNAIL_EXT}")),
                )
            }
            EntryKind::RequiredData(_) | EntryKind::Data => {
                if !is_safe_relative_path(&entry.path) {
                    warn!(entry = %entry.path, "entry path escapes map directory, skipped");
                    continue;
                }
                let destination = dest
                    .map_dir
                    .join(format!("{}{COMPRESSED_SUFFIX}", entry.path));
                if !data_planned.insert(destination.clone()) {
                    warn!(entry = %entry.path, "duplicate data entry skipped");
                    continue;
                }
                (RoutedKind::CompressedData, destination)
            }
        };

        plans.push(RoutePlan {
            index: entry.index,
            entry: entry.path.clone(),
            kind,
            destination,
        });
    }

    plans
}

/// Writes every routed entry of `archive` for map `code`.
///
/// Writes run concurrently. The call resolves once all of them have
/// finished; if any failed, the first error is returned.
pub async fn route_entries(
    archive: &PackageArchive,
    code: &str,
    dest: &Destinations,
) -> Result<RouteReport, PackageError> {
    let plans = plan_routes(archive.entries(), code, dest);
    info!(code, files = plans.len(), "routing package entries");

    let mut tasks = JoinSet::new();
    for plan in plans {
        let archive_path = archive.path().to_path_buf();
        tasks.spawn_blocking(move || write_routed(&archive_path, plan));
    }

    let mut report = RouteReport::default();
    let mut first_error: Option<PackageError> = None;

    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|e| Err(PackageError::Task(e.to_string())));
        match result {
            Ok(file) => {
                debug!(entry = %file.entry, dest = %file.destination.display(), "finished writing");
                report.files.push(file);
            }
            Err(e) => {
                error!(code, error = %e, "failed to write package entry");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

fn write_routed(archive_path: &Path, plan: RoutePlan) -> Result<RoutedFile, PackageError> {
    if let Some(parent) = plan.destination.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = BufWriter::new(File::create(&plan.destination)?);
    let bytes_read = match plan.kind {
        RoutedKind::CompressedData => {
            let mut encoder = GzEncoder::new(file, Compression::default());
            let copied = copy_entry(archive_path, plan.index, &mut encoder)?;
            encoder.finish()?.flush()?;
            copied
        }
        RoutedKind::TileArchive | RoutedKind::Thumbnail => {
            let mut writer = file;
            let copied = copy_entry(archive_path, plan.index, &mut writer)?;
            writer.flush()?;
            copied
        }
    };

    Ok(RoutedFile {
        entry: plan.entry,
        kind: plan.kind,
        destination: plan.destination,
        bytes_read,
    })
}
