//! File-backed store for requests no in-memory tier can satisfy.
//!
//! A [`VirtualStore`] keeps its elements on secondary storage and only holds
//! one element's worth of marshalling scratch in memory. Two layouts exist:
//!
//! - **Positional**, for fixed-width unit families: the file is a flat run of
//!   `size × unit_count` encoded units with no header, so slot `i` lives at
//!   byte `i × unit_count × width`. These files can be created at a chosen
//!   path and reopened later given the slot count.
//! - **Logged**, for text unit families (string, big-integer text,
//!   big-decimal text), whose encodings vary in length: an in-memory
//!   directory maps each written slot to its span in the file. A rewrite
//!   that fits the slot's existing span is written in place; one that grows
//!   is appended and the old span becomes dead space.
//!
//! Slots that were never written read back as the zero element in both
//! layouts.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use hoard_core::{check_index, Element, IndexedStore, StorageError, StorageKind, Unit};
use indexmap::IndexMap;
use tracing::debug;

use crate::array::check_footprint;
use crate::config::StorageConfig;

/// Location of one logged element inside the backing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RecordSpan {
    offset: u64,
    len: u32,
    /// Bytes reserved at `offset`; never less than `len`.
    capacity: u32,
}

#[derive(Clone, Debug)]
enum Layout {
    Positional {
        /// Encoded bytes per element.
        element_bytes: u64,
    },
    Logged {
        directory: IndexMap<u64, RecordSpan>,
        /// End of the last appended record.
        end: u64,
    },
}

/// Elements stored in a file on secondary storage.
pub struct VirtualStore<T: Element> {
    file: File,
    /// Path of a named backing file; `None` for anonymous temp files.
    path: Option<PathBuf>,
    /// Where duplicates create their temp files.
    scratch_dir: Option<PathBuf>,
    layout: Layout,
    size: u64,
    unit_count: usize,
    units: Vec<T::Unit>,
    bytes: Vec<u8>,
    _element: PhantomData<fn() -> T>,
}

fn temp_file(dir: Option<&Path>) -> io::Result<File> {
    match dir {
        Some(dir) => tempfile::tempfile_in(dir),
        None => tempfile::tempfile(),
    }
}

/// Encoded bytes per element and total file length for positional layouts,
/// `None` for text unit families.
fn positional_len<T: Element>(
    n: u64,
    unit_count: usize,
) -> Result<Option<(u64, u64)>, StorageError> {
    let Some(width) = <T::Unit as Unit>::ENCODED_WIDTH else {
        return Ok(None);
    };
    let element_bytes = unit_count as u64 * width as u64;
    let total = n.checked_mul(element_bytes).ok_or(StorageError::Oversized {
        requested_units: n as u128 * unit_count as u128,
        ceiling: u64::MAX / (width as u64).max(1),
    })?;
    Ok(Some((element_bytes, total)))
}

impl<T: Element> VirtualStore<T> {
    /// Create a store of `n` zero-valued slots in an anonymous temp file.
    ///
    /// The file lives in `config.virtual_dir` (or the system temp dir) and is
    /// removed by the OS when the store is dropped.
    pub fn create(prototype: &T, n: u64, config: &StorageConfig) -> Result<Self, StorageError> {
        let dir = config.virtual_dir.as_deref();
        let file = temp_file(dir)?;
        let unit_kind = <T::Unit as Unit>::KIND;
        debug!(elements = n, %unit_kind, "virtual store created");
        Self::with_file(file, None, dir.map(Path::to_path_buf), prototype, n, true)
    }

    /// Create (or truncate) a persistent positional store at `path`.
    ///
    /// Only fixed-width unit families can be persisted; text families fail
    /// with [`StorageError::InvalidArgument`].
    pub fn create_at(path: impl AsRef<Path>, prototype: &T, n: u64) -> Result<Self, StorageError> {
        let path = path.as_ref();
        Self::require_positional()?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        debug!(path = %path.display(), elements = n, "virtual store file created");
        Self::with_file(file, Some(path.to_path_buf()), parent_dir(path), prototype, n, true)
    }

    /// Reopen a positional store previously written with [`VirtualStore::create_at`].
    ///
    /// The file carries no header, so the slot count `n` and the prototype's
    /// shape must be supplied again; the file length must match them exactly.
    pub fn open(path: impl AsRef<Path>, prototype: &T, n: u64) -> Result<Self, StorageError> {
        let path = path.as_ref();
        Self::require_positional()?;
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let expected =
            positional_len::<T>(n, prototype.unit_count())?.map_or(0, |(_, total)| total);
        let actual = file.metadata()?.len();
        if actual != expected {
            return Err(StorageError::invalid(format!(
                "{} holds {actual} bytes, {n} elements need {expected}",
                path.display()
            )));
        }
        debug!(path = %path.display(), elements = n, "virtual store file reopened");
        Self::with_file(file, Some(path.to_path_buf()), parent_dir(path), prototype, n, false)
    }

    fn require_positional() -> Result<(), StorageError> {
        let kind = <T::Unit as Unit>::KIND;
        if kind.is_fixed_width() {
            Ok(())
        } else {
            Err(StorageError::invalid(format!(
                "{kind} units have no fixed width and cannot be persisted positionally"
            )))
        }
    }

    fn with_file(
        file: File,
        path: Option<PathBuf>,
        scratch_dir: Option<PathBuf>,
        prototype: &T,
        n: u64,
        size_file: bool,
    ) -> Result<Self, StorageError> {
        let unit_count = prototype.unit_count();
        let layout = match positional_len::<T>(n, unit_count)? {
            Some((element_bytes, total)) => {
                if size_file {
                    file.set_len(total)?;
                }
                Layout::Positional { element_bytes }
            }
            None => Layout::Logged {
                directory: IndexMap::new(),
                end: 0,
            },
        };
        Ok(Self {
            file,
            path,
            scratch_dir,
            layout,
            size: n,
            unit_count,
            units: vec![T::Unit::default(); unit_count],
            bytes: Vec::new(),
            _element: PhantomData,
        })
    }

    /// Path of the backing file, if it is a named one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Units per element.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Current length of the backing file in bytes.
    pub fn file_bytes(&self) -> Result<u64, StorageError> {
        Ok(self.file.metadata()?.len())
    }

    /// Flush file contents and metadata to disk.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Decode `self.bytes` into `self.units`.
    fn decode_units(&mut self) -> Result<(), StorageError> {
        let mut at = 0;
        for unit in self.units.iter_mut() {
            let (value, used) = T::Unit::decode(&self.bytes[at..])?;
            *unit = value;
            at += used;
        }
        Ok(())
    }

    /// Encode `self.units` into `self.bytes`.
    fn encode_units(&mut self) -> Result<(), StorageError> {
        self.bytes.clear();
        for unit in &self.units {
            unit.encode(&mut self.bytes)?;
        }
        Ok(())
    }

    fn read_span(&mut self, offset: u64, len: usize) -> Result<(), StorageError> {
        self.bytes.resize(len, 0);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut self.bytes)?;
        Ok(())
    }

    fn write_at(&mut self, offset: u64) -> Result<(), StorageError> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&self.bytes)?;
        Ok(())
    }
}

fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

impl<T: Element> IndexedStore<T> for VirtualStore<T> {
    fn size(&self) -> u64 {
        self.size
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Virtual
    }

    fn access_with_one_thread(&self) -> bool {
        true
    }

    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let span = match &self.layout {
            Layout::Positional { element_bytes } => {
                Some((index * element_bytes, *element_bytes as usize))
            }
            Layout::Logged { directory, .. } => directory
                .get(&index)
                .map(|span| (span.offset, span.len as usize)),
        };
        match span {
            Some((offset, len)) => {
                self.read_span(offset, len)?;
                self.decode_units()?;
            }
            None => self.units.fill(T::Unit::default()),
        }
        out.from_units(&self.units, 0);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        check_footprint(index, value, self.unit_count)?;
        value.to_units(&mut self.units, 0);
        self.encode_units()?;
        let len = u32::try_from(self.bytes.len()).map_err(|_| {
            StorageError::invalid(format!(
                "encoded element of {} bytes exceeds the 4 GiB record limit",
                self.bytes.len()
            ))
        })?;
        let (offset, capacity) = match &self.layout {
            Layout::Positional { element_bytes } => (index * element_bytes, len),
            Layout::Logged { directory, end } => match directory.get(&index) {
                Some(old) if len <= old.capacity => (old.offset, old.capacity),
                _ => (*end, len),
            },
        };
        self.write_at(offset)?;
        if let Layout::Logged { directory, end } = &mut self.layout {
            directory.insert(
                index,
                RecordSpan {
                    offset,
                    len,
                    capacity,
                },
            );
            if offset == *end {
                *end += len as u64;
            }
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError> {
        let mut copy = temp_file(self.scratch_dir.as_deref())?;
        let mut source = &self.file;
        source.seek(SeekFrom::Start(0))?;
        io::copy(&mut source, &mut copy)?;
        debug!(elements = self.size, "virtual store duplicated");
        Ok(Box::new(Self {
            file: copy,
            path: None,
            scratch_dir: self.scratch_dir.clone(),
            layout: self.layout.clone(),
            size: self.size,
            unit_count: self.unit_count,
            units: vec![T::Unit::default(); self.unit_count],
            bytes: Vec::new(),
            _element: PhantomData,
        }))
    }
}
