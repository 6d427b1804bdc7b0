//! Collaborator seams for page and image retrieval.
//!
//! Retrieval is not the pipeline's job. These traits let callers plug in
//! whatever fetches bytes; the filesystem implementations cover local
//! mirrors of the site.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Supplies raw page bytes by location.
pub trait PageSource: Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Supplies raw image bytes for a resolved image reference.
///
/// One attempt per image: the linearizer omits the block on error and
/// never retries.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, source: &Url) -> Result<Vec<u8>>;
}

/// Reads pages from files, relative to an optional root directory.
#[derive(Debug, Clone, Default)]
pub struct FsPageSource {
    root: Option<PathBuf>,
}

impl FsPageSource {
    /// Resolve locations as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn path_for(&self, location: &str) -> PathBuf {
        match &self.root {
            Some(root) if Path::new(location).is_relative() => root.join(location),
            _ => PathBuf::from(location),
        }
    }
}

impl PageSource for FsPageSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.path_for(location);
        fs::read(&path).map_err(|e| Error::Fetch {
            location: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Serves images from a local mirror directory.
///
/// An image URL maps to the file named after its last path segment, so
/// `https://img.pokemondb.net/artwork/venusaur.jpg` is read from
/// `<dir>/venusaur.jpg`.
#[derive(Debug, Clone)]
pub struct DirImageSource {
    dir: PathBuf,
}

impl DirImageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageSource for DirImageSource {
    fn fetch(&self, source: &Url) -> Result<Vec<u8>> {
        let name = source
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Fetch {
                location: source.to_string(),
                reason: "no file name in image URL".to_string(),
            })?;

        fs::read(self.dir.join(name)).map_err(|e| Error::Fetch {
            location: source.to_string(),
            reason: e.to_string(),
        })
    }
}
