use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;
use zip::read::ZipFile;

use crate::error::{FinderError, Result};

/// Largest entry that will be read into memory. Class and source files are
/// far below this.
pub const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// A zip-compatible container (jar, war, ear, zip) opened read-only.
///
/// The file is memory mapped and released when the value (or the
/// [`Entries`] it turns into) is dropped.
pub struct Container {
    archive: ZipArchive<Cursor<Mmap>>,
}

impl Container {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: The mapping is read-only and owned by the archive reader;
        // the archive is never modified while a search holds it.
        let mmap = unsafe { Mmap::map(&file)? };
        let archive = ZipArchive::new(Cursor::new(mmap))?;
        Ok(Self { archive })
    }

    /// Consumes the container; the entries can be walked exactly once.
    pub fn entries(self) -> Entries {
        Entries {
            archive: self.archive,
            next: 0,
        }
    }
}

/// Walks a container's entries in central-directory order.
///
/// Each entry borrows the archive, so this is a lending iterator driven
/// with `while let Some(entry) = entries.next_entry()`.
pub struct Entries {
    archive: ZipArchive<Cursor<Mmap>>,
    next: usize,
}

impl Entries {
    pub fn next_entry(&mut self) -> Option<Result<Entry<'_>>> {
        if self.next >= self.archive.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(
            self.archive
                .by_index(index)
                .map(|file| Entry { file })
                .map_err(Into::into),
        )
    }
}

pub struct Entry<'a> {
    file: ZipFile<'a>,
}

impl Entry<'_> {
    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn is_dir(&self) -> bool {
        self.file.is_dir()
    }

    /// Reads the whole entry. The size recorded in the archive is only
    /// checked against [`MAX_ENTRY_BYTES`], never used to pre-allocate, and
    /// the read itself stops one byte past the limit.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let declared = self.file.size();
        if declared > MAX_ENTRY_BYTES {
            return Err(self.too_large(declared));
        }

        let mut buf = Vec::new();
        (&mut self.file)
            .take(MAX_ENTRY_BYTES + 1)
            .read_to_end(&mut buf)?;
        if buf.len() as u64 > MAX_ENTRY_BYTES {
            return Err(self.too_large(buf.len() as u64));
        }
        Ok(buf)
    }

    fn too_large(&self, size: u64) -> FinderError {
        FinderError::EntryTooLarge {
            name: self.file.name().to_string(),
            size,
            limit: MAX_ENTRY_BYTES,
        }
    }

    pub fn read_text(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
