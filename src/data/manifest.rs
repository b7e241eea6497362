use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sprite_name::SpriteName;

pub static MANIFEST_FILENAME: &str = "atlas-manifest.toml";

/// Describes the pages produced by the last successful pack, and where every
/// image ended up on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Digest of the config settings the atlas was laid out with.
    #[serde(default)]
    pub config_hash: Option<String>,

    #[serde(default)]
    pub pages: Vec<PageManifest>,

    #[serde(default)]
    pub sprites: BTreeMap<SpriteName, SpriteManifest>,
}

impl Manifest {
    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ManifestError> {
        let file_path = folder_path.as_ref().join(MANIFEST_FILENAME);

        let contents = fs_err::read(&file_path).map_err(|source| ManifestError::Io {
            file_path: file_path.clone(),
            source,
        })?;

        toml::from_slice(&contents).map_err(|source| ManifestError::DeserializeToml {
            file_path,
            source,
        })
    }

    pub fn write_to_folder<P: AsRef<Path>>(&self, folder_path: P) -> Result<(), ManifestError> {
        let file_path = folder_path.as_ref().join(MANIFEST_FILENAME);

        let serialized = toml::to_string_pretty(self)?;
        fs_err::write(&file_path, serialized).map_err(|source| ManifestError::Io {
            file_path: file_path.clone(),
            source,
        })?;

        log::trace!("Saved manifest to {}", file_path.display());

        Ok(())
    }

    /// Whether this manifest was produced from exactly the given images and
    /// layout settings, meaning packing again would produce the same pages.
    pub fn is_up_to_date(&self, config_hash: &str, hashes: &BTreeMap<SpriteName, String>) -> bool {
        if self.config_hash.as_deref() != Some(config_hash) {
            return false;
        }

        self.sprites.len() == hashes.len()
            && self
                .sprites
                .iter()
                .all(|(name, sprite)| hashes.get(name) == Some(&sprite.hash))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageManifest {
    /// File name of the page, relative to the manifest.
    pub file: String,

    pub size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpriteManifest {
    /// The hexadecimal encoded blake3 hash of the source image.
    pub hash: String,

    /// Index into the manifest's pages. Missing for images with no pixels,
    /// which aren't placed anywhere.
    pub page: Option<usize>,

    /// The portion of the page that contains this image.
    pub slice: Option<ImageSlice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlice {
    pub min: (u32, u32),
    pub max: (u32, u32),
}

impl From<splitpack::Region> for ImageSlice {
    fn from(region: splitpack::Region) -> Self {
        ImageSlice {
            min: region.min(),
            max: region.max(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{source} in {}", .file_path.display())]
    DeserializeToml {
        file_path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    SerializeToml {
        #[from]
        source: toml::ser::Error,
    },

    #[error("{source}")]
    Io {
        file_path: PathBuf,
        source: io::Error,
    },
}

impl ManifestError {
    pub fn is_not_found(&self) -> bool {
        match self {
            ManifestError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::path::Path;

    fn name(path: &str) -> SpriteName {
        SpriteName::from_paths(Path::new(""), Path::new(path)).unwrap()
    }

    fn manifest() -> Manifest {
        let mut sprites = BTreeMap::new();
        sprites.insert(
            name("a.png"),
            SpriteManifest {
                hash: String::from("aaaa"),
                page: Some(0),
                slice: Some(ImageSlice {
                    min: (0, 0),
                    max: (16, 16),
                }),
            },
        );
        sprites.insert(
            name("blank.png"),
            SpriteManifest {
                hash: String::from("bbbb"),
                page: None,
                slice: None,
            },
        );

        Manifest {
            config_hash: Some(String::from("cccc")),
            pages: vec![PageManifest {
                file: String::from("page-0.png"),
                size: (128, 128),
            }],
            sprites,
        }
    }

    fn hashes(entries: &[(&str, &str)]) -> BTreeMap<SpriteName, String> {
        entries
            .iter()
            .map(|(path, hash)| (name(path), String::from(*hash)))
            .collect()
    }

    #[test]
    fn toml_layout() {
        let serialized = toml::to_string_pretty(&manifest()).unwrap();
        let parsed: Manifest = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed, manifest());
        assert!(serialized.contains("config-hash"));
    }

    #[test]
    fn up_to_date() {
        let current = hashes(&[("a.png", "aaaa"), ("blank.png", "bbbb")]);
        assert!(manifest().is_up_to_date("cccc", &current));
    }

    #[test]
    fn stale_when_anything_changes() {
        let manifest = manifest();

        let edited = hashes(&[("a.png", "ffff"), ("blank.png", "bbbb")]);
        assert!(!manifest.is_up_to_date("cccc", &edited));

        let added = hashes(&[("a.png", "aaaa"), ("blank.png", "bbbb"), ("c.png", "cccc")]);
        assert!(!manifest.is_up_to_date("cccc", &added));

        let removed = hashes(&[("a.png", "aaaa")]);
        assert!(!manifest.is_up_to_date("cccc", &removed));

        let current = hashes(&[("a.png", "aaaa"), ("blank.png", "bbbb")]);
        assert!(!manifest.is_up_to_date("dddd", &current));
        assert!(!Manifest::default().is_up_to_date("cccc", &current));
    }
}
