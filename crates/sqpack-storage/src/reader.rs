//! Read-only access to a file set

use crate::config::ArchiveConfig;
use crate::{FileSetPaths, Result};
use sqpack_formats::block::{BlockError, FileInfoHeader, decode_with_header};
use sqpack_formats::index::{IndexFile, IndexKind, IndexTable, Location};
use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type DataHandle = Arc<Mutex<File>>;

/// Reader over both hash tables of a file set
///
/// Both tables are loaded at open time and never change afterwards. Data
/// files are opened lazily, at most once each, behind a lock so concurrent
/// reads never race on the handle cache.
#[derive(Debug)]
pub struct ArchiveReader {
    paths: FileSetPaths,
    preferred: IndexKind,
    index: IndexTable,
    index2: IndexTable,
    data_file_count: u32,
    handles: Mutex<HashMap<u8, DataHandle>>,
}

impl ArchiveReader {
    /// Open the file set at `prefix` with the default configuration
    pub async fn open(prefix: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(prefix, &ArchiveConfig::default()).await
    }

    /// Open the file set at `prefix`
    pub async fn open_with_config(prefix: impl AsRef<Path>, config: &ArchiveConfig) -> Result<Self> {
        let paths = FileSetPaths::new(prefix);
        info!("Opening archive {}", paths.prefix().display());

        let index = Self::load_table(&paths, IndexKind::Index).await?;
        let index2 = Self::load_table(&paths, IndexKind::Index2).await?;
        let data_file_count = index.header.data_file_count;

        if index.table.len() != index2.table.len() {
            warn!(
                "Index tables disagree: {} entries in .index, {} in .index2",
                index.table.len(),
                index2.table.len()
            );
        }

        info!(
            "Opened archive {} with {} files in {} data files",
            paths.prefix().display(),
            index.table.len(),
            data_file_count
        );

        Ok(Self {
            paths,
            preferred: config.preferred_index,
            index: index.table,
            index2: index2.table,
            data_file_count,
            handles: Mutex::new(HashMap::new()),
        })
    }

    async fn load_table(paths: &FileSetPaths, kind: IndexKind) -> Result<IndexFile> {
        let path = paths.index(kind);
        let bytes = tokio::fs::read(&path).await?;
        let file = IndexFile::parse(&bytes, kind)?;
        debug!(
            "Loaded {} entries from {}",
            file.table.len(),
            path.display()
        );
        if file.table.duplicate_count() > 0 {
            warn!(
                "{} duplicate hash entries in {}; later entries win",
                file.table.duplicate_count(),
                path.display()
            );
        }
        Ok(file)
    }

    fn table(&self, kind: IndexKind) -> &IndexTable {
        match kind {
            IndexKind::Index => &self.index,
            IndexKind::Index2 => &self.index2,
        }
    }

    /// Location of `path` in the given table
    pub fn locate(&self, path: &str, kind: IndexKind) -> Result<Option<Location>> {
        let key = kind.key_for(path)?;
        Ok(self.table(kind).get(key))
    }

    /// Whether `path` is present in the preferred table
    pub fn has_file(&self, path: &str) -> Result<bool> {
        self.has_file_via(path, self.preferred)
    }

    /// Whether `path` is present in the given table
    pub fn has_file_via(&self, path: &str, kind: IndexKind) -> Result<bool> {
        Ok(self.locate(path, kind)?.is_some())
    }

    /// Read and decode `path` using the preferred table
    pub async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.read_file_via(path, self.preferred).await
    }

    /// Read and decode `path` using the given table
    ///
    /// Returns `Ok(None)` when the path is absent.
    pub async fn read_file_via(&self, path: &str, kind: IndexKind) -> Result<Option<Vec<u8>>> {
        let Some(location) = self.locate(path, kind)? else {
            debug!("{path} not found in .{}", kind.extension());
            return Ok(None);
        };
        debug!("Reading {path} from {location}");
        self.read_at(location).await.map(Some)
    }

    /// Read and decode the record stored at `location`
    pub async fn read_at(&self, location: Location) -> Result<Vec<u8>> {
        let handle = self.data_handle(location.data_file_id).await?;
        let (header, record) = {
            let mut file = handle.lock().await;
            let file_len = file.metadata().await?.len();
            let available = file_len.saturating_sub(location.offset) as usize;
            let check = |needed: usize| {
                if needed > available {
                    Err(BlockError::Truncated {
                        expected: needed,
                        actual: available,
                    })
                } else {
                    Ok(())
                }
            };

            file.seek(SeekFrom::Start(location.offset)).await?;
            let mut size_field = [0u8; 4];
            check(size_field.len())?;
            file.read_exact(&mut size_field).await?;
            let header_size = FileInfoHeader::peek_header_size(&size_field)? as usize;
            check(header_size)?;

            let mut record = vec![0u8; header_size.max(size_field.len())];
            record[..4].copy_from_slice(&size_field);
            file.read_exact(&mut record[4..]).await?;
            let header = FileInfoHeader::from_bytes(&record)?;

            check(header.record_size())?;
            record.resize(header.record_size(), 0);
            file.read_exact(&mut record[header_size..]).await?;
            (header, record)
        };
        Ok(decode_with_header(&header, &record)?)
    }

    async fn data_handle(&self, data_file_id: u8) -> Result<DataHandle> {
        let mut handles = self.handles.lock().await;
        if let Some(handle) = handles.get(&data_file_id) {
            return Ok(Arc::clone(handle));
        }

        let path = self.paths.data(data_file_id);
        debug!("Opening data file {}", path.display());
        let handle = Arc::new(Mutex::new(File::open(&path).await?));
        handles.insert(data_file_id, Arc::clone(&handle));
        Ok(handle)
    }

    /// Number of entries in the given table
    pub fn file_count(&self, kind: IndexKind) -> usize {
        self.table(kind).len()
    }

    /// Number of data files recorded in the index header
    pub const fn data_file_count(&self) -> u32 {
        self.data_file_count
    }

    /// Path prefix of the file set
    pub fn prefix(&self) -> &Path {
        self.paths.prefix()
    }

    /// Release every open data file handle
    pub async fn close(self) -> Result<()> {
        let handles = self.handles.into_inner();
        info!(
            "Closing archive {} ({} data files open)",
            self.paths.prefix().display(),
            handles.len()
        );
        drop(handles);
        Ok(())
    }
}
