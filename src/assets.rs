//! Resource-loading collaborator.
//!
//! Sounds are created from byte ranges handed over by an [AssetSource]. The
//! descriptor model mirrors the engine's packed-asset layout: a clip is a
//! {data, start, length} triple, where `start`/`length` locate the range in
//! the backing file. A failed open aborts sound setup.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SoundError;

/// An opened audio clip: the raw bytes of one asset plus the byte range it
/// occupied in its backing file.
///
/// Clips are cheap to clone; hosts keep their own reference to the data.
#[derive(Debug, Clone)]
pub struct AssetClip {
    data: Arc<[u8]>,
    start: u64,
    length: u64,
}

impl AssetClip {
    /// Wrap a byte buffer as a standalone clip (start 0, full length).
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let length = data.len() as u64;
        Self {
            data: data.into(),
            start: 0,
            length,
        }
    }

    /// Wrap a byte buffer that was cut out of a larger file.
    pub fn from_range(data: Vec<u8>, start: u64) -> Self {
        let length = data.len() as u64;
        Self {
            data: data.into(),
            start,
            length,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Offset of the clip in its backing file.
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn length(&self) -> u64 {
        self.length
    }
}

/// Trait implemented by the engine's resource loaders.
pub trait AssetSource {
    /// Open the asset at `path`, returning its bytes.
    ///
    /// Errors abort sound setup; the caller logs and gives up on the sound.
    fn open(&self, path: &str) -> Result<AssetClip, SoundError>;
}

/// Filesystem-backed asset source rooted at a directory.
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read a `{start, length}` slice out of a pack file, the descriptor
    /// shape the mobile asset manager hands out.
    pub fn open_range(&self, path: &str, start: u64, length: u64) -> Result<AssetClip, SoundError> {
        let full = self.root.join(path);
        let mut file = fs::File::open(&full).map_err(|_| open_error(&full))?;
        file.seek(SeekFrom::Start(start))
            .map_err(|_| open_error(&full))?;
        let mut data = vec![0u8; length as usize];
        file.read_exact(&mut data).map_err(|_| open_error(&full))?;
        Ok(AssetClip::from_range(data, start))
    }
}

impl AssetSource for FsAssets {
    fn open(&self, path: &str) -> Result<AssetClip, SoundError> {
        let full = self.root.join(path);
        let data = fs::read(&full).map_err(|_| open_error(&full))?;
        Ok(AssetClip::from_bytes(data))
    }
}

fn open_error(path: &Path) -> SoundError {
    SoundError::ResourceOpenFailed {
        path: path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beep.raw"), b"0123456789").unwrap();

        let assets = FsAssets::new(dir.path());
        let clip = assets.open("beep.raw").unwrap();
        assert_eq!(clip.bytes(), b"0123456789");
        assert_eq!(clip.start(), 0);
        assert_eq!(clip.length(), 10);
    }

    #[test]
    fn open_range_cuts_the_descriptor_slice() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("sounds.pack")).unwrap();
        file.write_all(b"HEADERpayloadTRAILER").unwrap();

        let assets = FsAssets::new(dir.path());
        let clip = assets.open_range("sounds.pack", 6, 7).unwrap();
        assert_eq!(clip.bytes(), b"payload");
        assert_eq!(clip.start(), 6);
        assert_eq!(clip.length(), 7);
    }

    #[test]
    fn missing_file_reports_resource_open() {
        let dir = tempfile::tempdir().unwrap();
        let assets = FsAssets::new(dir.path());
        match assets.open("no_such.ogg") {
            Err(SoundError::ResourceOpenFailed { path }) => {
                assert!(path.contains("no_such.ogg"));
            }
            other => panic!("expected ResourceOpenFailed, got {:?}", other),
        }
    }

    #[test]
    fn range_past_end_reports_resource_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("short.pack"), b"abc").unwrap();

        let assets = FsAssets::new(dir.path());
        assert!(assets.open_range("short.pack", 1, 16).is_err());
    }
}
