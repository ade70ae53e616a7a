//! Byte sources that hand out independent read cursors
//!
//! Every pass over a log opens its own cursor. Nothing is shared between
//! cursors, so passes can run in any order or on separate threads.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

/// A seekable byte source that can be scanned any number of times
pub trait ByteSource {
    /// Cursor type for one pass
    type Cursor<'a>: Read + Seek
    where
        Self: 'a;

    /// Open a fresh cursor positioned at offset 0
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be opened
    fn open(&self) -> io::Result<Self::Cursor<'_>>;

    /// Total length in bytes
    ///
    /// # Errors
    ///
    /// Returns error if the length cannot be determined
    fn byte_len(&self) -> io::Result<u64>;
}

impl ByteSource for [u8] {
    type Cursor<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Cursor<'_>> {
        Ok(Cursor::new(self))
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ByteSource for Vec<u8> {
    type Cursor<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Cursor<'_>> {
        Ok(Cursor::new(self.as_slice()))
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    type Cursor<'a> = S::Cursor<'a> where Self: 'a;

    fn open(&self) -> io::Result<Self::Cursor<'_>> {
        (**self).open()
    }

    fn byte_len(&self) -> io::Result<u64> {
        (**self).byte_len()
    }
}

/// A log file on disk, reopened for every pass
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path` without touching the filesystem
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    type Cursor<'a> = BufReader<File>;

    fn open(&self) -> io::Result<Self::Cursor<'_>> {
        Ok(BufReader::new(File::open(&self.path)?))
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

/// A memory-mapped log file; passes are cursors over the mapping
pub struct MappedFile {
    _file: File,
    mmap: Mmap,
}

impl MappedFile {
    /// Map an existing file read-only
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or mapped
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        // The producer never rewrites a finished log in place.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { _file: file, mmap })
    }

    /// Mapped bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }
}

impl ByteSource for MappedFile {
    type Cursor<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Cursor<'_>> {
        Ok(Cursor::new(&self.mmap[..]))
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.mmap.len() as u64)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input
///
/// Returns the number of bytes read; less than `buf.len()` means the
/// source ended.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
