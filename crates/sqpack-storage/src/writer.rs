//! Append-only writer producing a complete file set

use crate::config::ArchiveConfig;
use crate::{FileSetPaths, Result, StorageError};
use sqpack_formats::block::StoredFileBuilder;
use sqpack_formats::container::{
    BuildStamp, CONTAINER_HEADER_SIZE, ContainerHeader, DataHeader, FileKind, PREAMBLE_SIZE,
};
use sqpack_formats::index::{
    IndexFile, IndexKind, IndexTable, Location, MAX_DATA_FILE_ID, STORED_FILE_ALIGNMENT,
};
use sqpack_hash::Sha1Digest;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Description of one finished data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileSummary {
    /// Data file id
    pub id: u8,
    /// File path
    pub path: PathBuf,
    /// Total file size, preamble included
    pub size: u64,
    /// Hex SHA-1 of the payload after the preamble
    pub payload_sha1: String,
}

/// What [`ArchiveWriter::close`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Number of stored files
    pub file_count: usize,
    /// Finished data files in id order
    pub data_files: Vec<DataFileSummary>,
}

impl ArchiveSummary {
    /// Number of data files written
    pub fn data_file_count(&self) -> usize {
        self.data_files.len()
    }
}

#[derive(Debug)]
struct ActiveDataFile {
    id: u8,
    path: PathBuf,
    file: File,
    position: u64,
    digest: Sha1Digest,
}

/// Single-writer producer of a file set
///
/// Records are appended to the active data file in call order. `add_file`
/// takes `&mut self`, so calls on one writer are never concurrent.
#[derive(Debug)]
pub struct ArchiveWriter {
    paths: FileSetPaths,
    config: ArchiveConfig,
    stamp: BuildStamp,
    builder: StoredFileBuilder,
    index: IndexTable,
    index2: IndexTable,
    active: ActiveDataFile,
    finished: Vec<DataFileSummary>,
    bytes_written: u64,
}

impl ArchiveWriter {
    /// Create a new file set at `prefix`, truncating existing files
    pub async fn create(prefix: impl AsRef<Path>, config: ArchiveConfig) -> Result<Self> {
        config.validate()?;
        let paths = FileSetPaths::new(prefix);
        if let Some(parent) = paths.prefix().parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stamp = config.stamp();
        let builder = StoredFileBuilder::new().with_compression_level(config.compression_level)?;
        let active = Self::start_data_file(&paths, &config, stamp, 0).await?;

        info!("Creating archive {}", paths.prefix().display());
        Ok(Self {
            paths,
            config,
            stamp,
            builder,
            index: IndexTable::new(IndexKind::Index),
            index2: IndexTable::new(IndexKind::Index2),
            active,
            finished: Vec::new(),
            bytes_written: 0,
        })
    }

    async fn start_data_file(
        paths: &FileSetPaths,
        config: &ArchiveConfig,
        stamp: BuildStamp,
        id: u8,
    ) -> Result<ActiveDataFile> {
        let path = paths.data(id);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await?;

        let container = ContainerHeader::new(FileKind::Data, config.platform, stamp);
        file.write_all(&container.to_bytes()?).await?;
        file.write_all(&DataHeader::placeholder(id).to_bytes()?).await?;

        info!("Created data file {}", path.display());
        Ok(ActiveDataFile {
            id,
            path,
            file,
            position: PREAMBLE_SIZE as u64,
            digest: Sha1Digest::new(),
        })
    }

    async fn finish_data_file(&mut self) -> Result<()> {
        let active = &mut self.active;
        let payload_size = active.position - PREAMBLE_SIZE as u64;
        let field = active.digest.field();
        let header = DataHeader::new(active.id, payload_size, field);

        active
            .file
            .seek(SeekFrom::Start(CONTAINER_HEADER_SIZE as u64))
            .await?;
        active.file.write_all(&header.to_bytes()?).await?;
        active.file.flush().await?;
        active.file.sync_all().await?;

        if active.position > self.config.max_data_file_size {
            warn!(
                "Data file {} is {} bytes, above the configured {} bytes",
                active.path.display(),
                active.position,
                self.config.max_data_file_size
            );
        }
        debug!(
            "Finished data file {} ({} payload bytes)",
            active.path.display(),
            payload_size
        );

        self.finished.push(DataFileSummary {
            id: active.id,
            path: active.path.clone(),
            size: active.position,
            payload_sha1: hex::encode(&field[..20]),
        });
        Ok(())
    }

    async fn roll_over(&mut self) -> Result<()> {
        let next = self.active.id + 1;
        if next > MAX_DATA_FILE_ID {
            return Err(StorageError::DataFileLimit {
                max: usize::from(MAX_DATA_FILE_ID) + 1,
            });
        }
        self.finish_data_file().await?;
        self.active = Self::start_data_file(&self.paths, &self.config, self.stamp, next).await?;
        Ok(())
    }

    /// Compress `data` and store it under `path`
    ///
    /// The path is entered into both hash tables. Adding a path twice fails
    /// with [`StorageError::DuplicatePath`].
    pub async fn add_file(&mut self, path: &str, data: &[u8]) -> Result<Location> {
        let key = IndexKind::Index.key_for(path)?;
        let key2 = IndexKind::Index2.key_for(path)?;
        if self.index.contains(key) || self.index2.contains(key2) {
            return Err(StorageError::DuplicatePath(path.to_string()));
        }

        let record = self.builder.build(data)?;
        let length = record.len() as u64;
        let has_payload = self.active.position > PREAMBLE_SIZE as u64;
        if has_payload && self.active.position + length > self.config.max_data_file_size {
            self.roll_over().await?;
        }

        let offset = self.active.position;
        if offset % STORED_FILE_ALIGNMENT != 0 || length % STORED_FILE_ALIGNMENT != 0 {
            return Err(StorageError::Misaligned {
                offset,
                length: record.len(),
            });
        }
        let location = Location::new(self.active.id, offset);
        location.pack()?;

        self.active.file.write_all(&record).await?;
        self.active.digest.update(&record);
        self.active.position += length;
        self.bytes_written += length;

        self.index.insert(key, location)?;
        self.index2.insert(key2, location)?;
        debug!(
            "Stored {path} ({} bytes, {} on disk) at {location}",
            data.len(),
            length
        );
        Ok(location)
    }

    /// Whether `path` has already been added
    pub fn has_file(&self, path: &str) -> Result<bool> {
        let key2 = IndexKind::Index2.key_for(path)?;
        Ok(self.index2.contains(key2))
    }

    /// Number of files added so far
    pub fn file_count(&self) -> usize {
        self.index2.len()
    }

    /// Record bytes appended across all data files
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Id of the data file currently receiving records
    pub const fn active_data_file(&self) -> u8 {
        self.active.id
    }

    /// Finalize the data files and write both index files
    pub async fn close(mut self) -> Result<ArchiveSummary> {
        self.finish_data_file().await?;
        let data_file_count = self.finished.len() as u32;
        let file_count = self.file_count();

        for table in [self.index, self.index2] {
            let kind = table.kind();
            let file = IndexFile::new(table, data_file_count, self.config.platform, self.stamp);
            let path = self.paths.index(kind);
            tokio::fs::write(&path, file.to_bytes()?).await?;
            debug!("Wrote {}", path.display());
        }

        info!(
            "Closed archive {}: {} files in {} data files",
            self.paths.prefix().display(),
            file_count,
            data_file_count
        );
        Ok(ArchiveSummary {
            file_count,
            data_files: self.finished,
        })
    }
}
