//! Map package archive access and entry classification.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};

use maploader_protocol::constants::{
    BUILDINGS_INDEX_ENTRY, DEMAND_DATA_ENTRY, MANIFEST_ENTRY, ROADS_ENTRY,
    RUNWAYS_TAXIWAYS_ENTRY, THUMBNAIL_EXT, TILE_ARCHIVE_EXT,
};
use zip::ZipArchive;

use crate::error::{Category, PackageError, ValidationError};

/// A file inside a map package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position in the archive's central directory.
    pub index: usize,
    /// Relative path with `/` separators.
    pub path: String,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// What an entry is, judged by its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Manifest,
    /// One of the four required data files.
    RequiredData(Category),
    TileArchive,
    Thumbnail,
    /// Any other `.json` / `.geojson` file.
    Data,
    Ignored,
}

impl EntryKind {
    /// Required category this entry satisfies, if any.
    pub fn category(self) -> Option<Category> {
        match self {
            EntryKind::Manifest => Some(Category::Manifest),
            EntryKind::RequiredData(category) => Some(category),
            EntryKind::TileArchive => Some(Category::Tiles),
            EntryKind::Thumbnail | EntryKind::Data | EntryKind::Ignored => None,
        }
    }
}

/// Classifies an entry path.
pub fn classify_entry(path: &str) -> EntryKind {
    match path {
        MANIFEST_ENTRY => return EntryKind::Manifest,
        ROADS_ENTRY => return EntryKind::RequiredData(Category::Roads),
        RUNWAYS_TAXIWAYS_ENTRY => return EntryKind::RequiredData(Category::RunwaysTaxiways),
        DEMAND_DATA_ENTRY => return EntryKind::RequiredData(Category::DemandData),
        BUILDINGS_INDEX_ENTRY => return EntryKind::RequiredData(Category::BuildingsIndex),
        _ => {}
    }

    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(TILE_ARCHIVE_EXT) => EntryKind::TileArchive,
        Some(THUMBNAIL_EXT) => EntryKind::Thumbnail,
        Some("json" | "geojson") => EntryKind::Data,
        _ => EntryKind::Ignored,
    }
}

/// Returns `true` if `path` stays inside the directory it is joined to.
///
/// Rejects empty and absolute paths, `..` components and drive prefixes.
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// A map package on disk.
///
/// Only the entry list is held in memory. Entry contents are streamed on
/// demand through a fresh archive handle, so several entries can be read
/// concurrently.
#[derive(Debug, Clone)]
pub struct PackageArchive {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl PackageArchive {
    /// Reads the entry list of the archive at `path`.
    pub fn open(path: &Path) -> Result<Self, PackageError> {
        let mut archive = open_zip(path)?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().replace('\\', "/");
            if name.is_empty() {
                continue;
            }
            entries.push(ArchiveEntry {
                index,
                path: name,
                size: entry.size(),
            });
        }

        tracing::debug!(
            archive = %path.display(),
            entries = entries.len(),
            "opened map package"
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Reads an entry into memory, refusing more than `limit` bytes.
    ///
    /// The limit applies to the bytes actually decompressed, not only to
    /// the size the archive declares.
    pub fn read_entry(&self, entry: &ArchiveEntry, limit: u64) -> Result<Vec<u8>, PackageError> {
        let too_large = || ValidationError::EntryTooLarge {
            entry: entry.path.clone(),
            limit,
        };
        if entry.size > limit {
            return Err(too_large().into());
        }

        let mut archive = open_zip(&self.path)?;
        let file = archive.by_index(entry.index)?;
        let mut buf = Vec::new();
        file.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
        if buf.len() as u64 > limit {
            return Err(too_large().into());
        }
        Ok(buf)
    }
}

/// Streams entry `index` of the archive at `archive_path` into `writer`.
///
/// Returns the number of bytes copied.
pub(crate) fn copy_entry<W: Write>(
    archive_path: &Path,
    index: usize,
    writer: &mut W,
) -> Result<u64, PackageError> {
    let mut archive = open_zip(archive_path)?;
    let mut entry = archive.by_index(index)?;
    let copied = std::io::copy(&mut entry, writer)?;
    Ok(copied)
}

fn open_zip(path: &Path) -> Result<ZipArchive<BufReader<File>>, PackageError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}
