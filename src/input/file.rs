//! File-backed double-buffer input source (spec §4.A).
//!
//! Grounded on `peglib`'s `FileReader.h`, which opens the file once,
//! records its size up front via `std::filesystem::file_size`, and reads
//! through an `std::ifstream`. This crate reads bytes — the natural
//! element type for a file stream — and keeps exactly two buffers
//! resident, flipping between them before falling back to a seek + bulk
//! read, per spec §4.A's three-step dereference algorithm.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{InputSource, Position};
use crate::error::{Error, Result};

/// `{path, buffer_size_in_elements}` from spec §6's file source
/// configuration shape.
#[derive(Debug, Clone)]
pub struct FileSourceConfig {
    pub path: PathBuf,
    pub buffer_size_in_elements: usize,
}

struct Buffer {
    /// Absolute element index this buffer's first byte covers.
    from: usize,
    /// Absolute element index one past this buffer's last byte.
    to: usize,
    data: Vec<u8>,
}

impl Buffer {
    fn empty() -> Self {
        Buffer { from: 0, to: 0, data: Vec::new() }
    }

    fn covers(&self, i: usize) -> bool {
        i >= self.from && i < self.to
    }

    fn get(&self, i: usize) -> Option<u8> {
        self.covers(i).then(|| self.data[i - self.from])
    }
}

/// Double-buffered view over a file, element = byte.
pub struct FileSource {
    file: File,
    path: PathBuf,
    total_len: usize,
    bufsize: usize,
    buffers: [Buffer; 2],
    current: usize,
}

impl FileSource {
    pub fn open(config: FileSourceConfig) -> Result<Self> {
        if config.buffer_size_in_elements == 0 {
            return Err(Error::ZeroBufferSize);
        }
        Self::open_path(&config.path, config.buffer_size_in_elements)
    }

    fn open_path(path: &Path, buffer_size_in_elements: usize) -> Result<Self> {
        // "Buffer size is rounded up to a multiple of the element size"
        // (spec §4.A) — with byte elements the element size is 1, so the
        // requested size is already aligned.
        let bufsize = buffer_size_in_elements;
        let mut file = File::open(path).map_err(|source| Error::FileSource {
            path: path.to_path_buf(),
            source,
        })?;
        let total_len = file
            .metadata()
            .map_err(|source| Error::FileSource { path: path.to_path_buf(), source })?
            .len() as usize;

        let mut source = FileSource {
            file,
            path: path.to_path_buf(),
            total_len,
            bufsize,
            buffers: [Buffer::empty(), Buffer::empty()],
            current: 0,
        };
        source.fill(0, 0)?;
        Ok(source)
    }

    /// Re-reads buffer slot `slot` starting at the bucket containing `pos`.
    fn fill(&mut self, slot: usize, pos: usize) -> Result<()> {
        let bucket_start = (pos / self.bufsize) * self.bufsize;
        let want = self.bufsize.min(self.total_len.saturating_sub(bucket_start));
        let mut data = vec![0u8; want];
        if want > 0 {
            self.file
                .seek(SeekFrom::Start(bucket_start as u64))
                .map_err(|source| Error::FileSource { path: self.path.clone(), source })?;
            // A short read is treated as "no element" for whatever
            // positions it failed to cover (spec §7): we size `data` down
            // to what was actually read rather than erroring.
            let n = self
                .file
                .read(&mut data)
                .map_err(|source| Error::FileSource { path: self.path.clone(), source })?;
            data.truncate(n);
        }
        let to = bucket_start + data.len();
        self.buffers[slot] = Buffer { from: bucket_start, to, data };
        Ok(())
    }
}

impl InputSource<u8> for FileSource {
    fn len(&self) -> usize {
        self.total_len
    }

    fn dereference(&mut self, pos: Position) -> Option<u8> {
        if pos >= self.total_len {
            return None;
        }
        if let Some(b) = self.buffers[self.current].get(pos) {
            return Some(b);
        }
        let other = 1 - self.current;
        if let Some(b) = self.buffers[other].get(pos) {
            self.current = other;
            return Some(b);
        }
        // Neither buffer covers `pos`: re-read the inactive buffer.
        if self.fill(other, pos).is_err() {
            return None;
        }
        self.current = other;
        self.buffers[self.current].get(pos)
    }

    fn release_before(&mut self, boundary: Position) {
        for buf in &mut self.buffers {
            if buf.to <= boundary {
                *buf = Buffer::empty();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("create temp file");
        f.write_all(contents).expect("write temp file");
        f
    }

    #[test]
    fn dereferences_across_buffer_boundaries() {
        let contents: Vec<u8> = (0..50u8).collect();
        let tmp = write_temp(&contents);
        let mut src = FileSource::open(FileSourceConfig {
            path: tmp.path().to_path_buf(),
            buffer_size_in_elements: 8,
        })
        .unwrap();

        assert_eq!(src.len(), 50);
        for i in 0..50usize {
            assert_eq!(src.dereference(i), Some(i as u8));
        }
        assert_eq!(src.dereference(50), None);
    }

    #[test]
    fn flips_back_to_a_previously_seen_buffer_without_rereading() {
        let contents: Vec<u8> = (0..32u8).collect();
        let tmp = write_temp(&contents);
        let mut src = FileSource::open(FileSourceConfig {
            path: tmp.path().to_path_buf(),
            buffer_size_in_elements: 8,
        })
        .unwrap();

        assert_eq!(src.dereference(20), Some(20));
        assert_eq!(src.dereference(2), Some(2));
        assert_eq!(src.dereference(20), Some(20));
    }

    #[test]
    fn release_before_drops_fully_committed_buffers() {
        let contents: Vec<u8> = (0..32u8).collect();
        let tmp = write_temp(&contents);
        let mut src = FileSource::open(FileSourceConfig {
            path: tmp.path().to_path_buf(),
            buffer_size_in_elements: 8,
        })
        .unwrap();

        src.dereference(2);
        src.release_before(8);
        assert!(!src.buffers[src.current].covers(2));
        // Still readable — release only discards the resident buffer,
        // not the backing file.
        assert_eq!(src.dereference(2), Some(2));
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let tmp = write_temp(b"abc");
        let err = FileSource::open(FileSourceConfig {
            path: tmp.path().to_path_buf(),
            buffer_size_in_elements: 0,
        })
        .unwrap_err();
        assert!(matches!(err, Error::ZeroBufferSize));
    }
}
