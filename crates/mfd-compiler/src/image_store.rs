//! Content-addressed PNG storage: §4.7 step 8. Identical rasters across
//! layers or devices are written once and every later reference reuses the
//! first file's name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Write-once image store, keyed by the SHA-256 of the encoded PNG bytes.
pub struct UniqueImageStore {
    directory: PathBuf,
    by_hash: HashMap<[u8; 32], PathBuf>,
    written: usize,
}

impl UniqueImageStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory, by_hash: HashMap::new(), written: 0 })
    }

    /// Add a PNG image under a suggested filename (collisions within one
    /// content hash reuse the first write; collisions across different
    /// content get a `_n` suffix). Returns the filename actually used,
    /// relative to the store's directory.
    pub fn add_image(&mut self, png_bytes: &[u8], suggested_name: &str) -> Result<PathBuf> {
        let hash: [u8; 32] = Sha256::digest(png_bytes).into();
        if let Some(existing) = self.by_hash.get(&hash) {
            return Ok(existing.clone());
        }

        let mut name = PathBuf::from(suggested_name);
        let mut count = 0;
        while self.directory.join(&name).exists() {
            count += 1;
            name = unique_path(suggested_name, count);
        }

        std::fs::write(self.directory.join(&name), png_bytes)?;
        self.by_hash.insert(hash, name.clone());
        self.written += 1;
        Ok(name)
    }

    /// How many distinct images were actually written to disk.
    pub fn written_count(&self) -> usize {
        self.written
    }
}

/// A flat, non-deduplicating store: every call writes a new file, named
/// uniquely by an incrementing counter rather than by content hash. Used
/// when the print program opts out of image minimization.
pub struct FlatImageStore {
    directory: PathBuf,
    count: usize,
}

impl FlatImageStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory, count: 0 })
    }

    /// Write `png_bytes` under a name derived from `suggested_name`,
    /// always as a new file.
    pub fn add_image(&mut self, png_bytes: &[u8], suggested_name: &str) -> Result<PathBuf> {
        let name = unique_path(suggested_name, self.count as u32);
        std::fs::write(self.directory.join(&name), png_bytes)?;
        self.count += 1;
        Ok(name)
    }

    /// How many images were written.
    pub fn written_count(&self) -> usize {
        self.count
    }
}

fn unique_path(stem: &str, count: u32) -> PathBuf {
    let path = Path::new(stem);
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
    let stem_only = path.file_stem().and_then(|s| s.to_str()).unwrap_or(stem);
    PathBuf::from(format!("{stem_only}_{count}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_are_written_once() {
        let dir = tempdir();
        let mut store = UniqueImageStore::open(&dir).unwrap();
        let a = store.add_image(b"same bytes", "slice.png").unwrap();
        let b = store.add_image(b"same bytes", "other_name.png").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.written_count(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn distinct_bytes_under_the_same_name_get_a_suffix() {
        let dir = tempdir();
        let mut store = UniqueImageStore::open(&dir).unwrap();
        let a = store.add_image(b"first", "slice.png").unwrap();
        let b = store.add_image(b"second", "slice.png").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.written_count(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    fn tempdir() -> PathBuf {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let mut p = std::env::temp_dir();
        p.push(format!("mfd-compiler-test-{}", COUNTER.fetch_add(1, Ordering::Relaxed)));
        p
    }
}
