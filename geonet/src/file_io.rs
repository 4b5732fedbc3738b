//! Shared binary file plumbing
//!
//! Every network file is a 60-byte preamble, a native `u64` record count
//! and a body. Station and measurement files carry a metadata block at
//! the start of the body; ASL and AML files carry records only.

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use geonet_core::format::constants::{COUNT_SIZE, PREAMBLE_SIZE};
use geonet_core::{
    validate_record_region, BinaryMetadata, BinaryRecord, FilePreamble, StorageBackend,
};
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bytes of one opened file
enum FileBytes {
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
    #[cfg_attr(feature = "mmap", allow(dead_code))]
    Owned(Vec<u8>),
}

impl StorageBackend for FileBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            FileBytes::Mapped(map) => &map[..],
            FileBytes::Owned(bytes) => &bytes[..],
        }
    }
}

/// Read-only handle on one network file
pub struct NetworkFile {
    pub path: PathBuf,
    pub preamble: FilePreamble,
    /// Count declared after the preamble
    pub record_count: u64,
    data: FileBytes,
}

impl NetworkFile {
    /// Offset of the body
    pub const BODY_OFFSET: usize = PREAMBLE_SIZE + COUNT_SIZE;

    /// Open a file and validate its preamble
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file =
            File::open(&path).map_err(|e| Error::io(&path, "Failed to open file", e))?;
        let len = file
            .metadata()
            .map_err(|e| Error::io(&path, "Failed to read file metadata", e))?
            .len();
        if len < Self::BODY_OFFSET as u64 {
            return Err(Error::format(
                &path,
                format!("file is {len} bytes, shorter than the {} byte header", Self::BODY_OFFSET),
            ));
        }

        let data = Self::read_bytes(&path, &file)?;
        let bytes = data.as_slice();
        let preamble =
            FilePreamble::from_bytes(bytes).map_err(|e| Error::record(&path, e))?;
        let declared = data
            .range(PREAMBLE_SIZE, COUNT_SIZE)
            .ok_or_else(|| Error::format(&path, "missing record count"))?;
        let mut count = [0u8; COUNT_SIZE];
        count.copy_from_slice(declared);
        let record_count = u64::from_ne_bytes(count);

        debug!(path = %path.display(), record_count, "Opened network file");

        Ok(Self {
            path,
            preamble,
            record_count,
            data,
        })
    }

    #[cfg(feature = "mmap")]
    fn read_bytes(path: &Path, file: &File) -> Result<FileBytes> {
        // SAFETY: the map is read-only and lives as long as this handle
        let map = unsafe { Mmap::map(file) }
            .map_err(|e| Error::io(path, "Failed to memory map file", e))?;
        Ok(FileBytes::Mapped(map))
    }

    #[cfg(not(feature = "mmap"))]
    fn read_bytes(path: &Path, mut file: &File) -> Result<FileBytes> {
        use std::io::Read;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::io(path, "Failed to read file", e))?;
        Ok(FileBytes::Owned(bytes))
    }

    /// Bytes following the record count
    pub fn body(&self) -> &[u8] {
        &self.data.as_slice()[Self::BODY_OFFSET..]
    }

    /// Decode exactly `record_count` records from `bytes`
    ///
    /// Fails if `bytes` is shorter or longer than the declared count implies.
    pub fn decode_records<T: BinaryRecord>(&self, bytes: &[u8]) -> Result<Vec<T>> {
        let region = validate_record_region::<T>(bytes.len(), self.record_count).map_err(|e| {
            Error::format(
                &self.path,
                format!(
                    "{e}: {} {} records declared, {} bytes present",
                    self.record_count,
                    T::KIND,
                    bytes.len()
                ),
            )
        })?;
        Ok(bytemuck::pod_collect_to_vec::<u8, T>(&bytes[..region]))
    }

    /// Decode the metadata block at the start of the body, then the records
    pub fn decode_with_metadata<T: BinaryRecord>(&self) -> Result<(Vec<T>, BinaryMetadata)> {
        let (metadata, consumed) =
            BinaryMetadata::from_bytes(self.body()).map_err(|e| Error::record(&self.path, e))?;
        if metadata.record_count != self.record_count {
            return Err(Error::format(
                &self.path,
                format!(
                    "metadata declares {} records, file declares {}",
                    metadata.record_count, self.record_count
                ),
            ));
        }
        let records = self.decode_records::<T>(&self.body()[consumed..])?;
        Ok((records, metadata))
    }
}

/// Buffered writer producing one network file
pub struct NetworkFileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl NetworkFileWriter {
    /// Create the file and write its preamble and record count
    pub fn create<P: AsRef<Path>>(path: P, config: &CodecConfig, record_count: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file =
            File::create(&path).map_err(|e| Error::io(&path, "Failed to create file", e))?;
        let mut writer = Self {
            path,
            writer: BufWriter::new(file),
        };
        writer.write_bytes(&config.preamble().to_bytes())?;
        writer.write_bytes(&record_count.to_ne_bytes())?;
        Ok(writer)
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| Error::io(&self.path, "Failed to write file", e))
    }

    /// Write records in native layout
    pub fn write_records<'a, T: BinaryRecord + 'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a T>,
    ) -> Result<()> {
        for record in records {
            self.write_bytes(bytemuck::bytes_of(record))?;
        }
        Ok(())
    }

    /// Flush buffered output to disk
    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io(&self.path, "Failed to flush file", e))
    }
}

/// Load a file of bare records
pub fn load_records<T: BinaryRecord, P: AsRef<Path>>(path: P) -> Result<(FilePreamble, Vec<T>)> {
    let file = NetworkFile::open(path)?;
    let records = file.decode_records::<T>(file.body())?;
    Ok((file.preamble, records))
}

/// Write the `Some` entries of `records` as a file of bare records
///
/// Returns the number of records written.
pub fn write_records<T: BinaryRecord, P: AsRef<Path>>(
    path: P,
    records: &[Option<T>],
    config: &CodecConfig,
) -> Result<usize> {
    let count = records.iter().flatten().count();
    let mut writer = NetworkFileWriter::create(path, config, count as u64)?;
    writer.write_records(records.iter().flatten())?;
    writer.finish()?;
    Ok(count)
}

/// Load a file carrying a metadata block
pub fn load_with_metadata<T: BinaryRecord, P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<T>, BinaryMetadata)> {
    NetworkFile::open(path)?.decode_with_metadata()
}

/// Write a file carrying a metadata block
///
/// The stored metadata record count is the number of records written.
pub fn write_with_metadata<T: BinaryRecord, P: AsRef<Path>>(
    path: P,
    records: &[Option<T>],
    metadata: &BinaryMetadata,
    config: &CodecConfig,
) -> Result<usize> {
    let count = records.iter().flatten().count();
    let metadata = BinaryMetadata {
        record_count: count as u64,
        ..metadata.clone()
    };

    let mut writer = NetworkFileWriter::create(path, config, count as u64)?;
    writer.write_bytes(&metadata.to_bytes())?;
    writer.write_records(records.iter().flatten())?;
    writer.finish()?;
    Ok(count)
}
