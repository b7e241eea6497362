use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use splitpack::{ItemOrder, PagePacker};
use thiserror::Error;

use crate::glob::Glob;

pub static CONFIG_FILENAME: &str = "atlaser.toml";

/// Configuration for an atlas, contained in an atlaser.toml file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// The name of the atlas, used in logging.
    pub name: String,

    /// The size that pages start out at before growing to fit more images.
    #[serde(default = "default_min_page_size")]
    pub min_page_size: (u32, u32),

    /// The largest a page may get. Images that don't fit on a page this size
    /// are put onto additional pages.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: (u32, u32),

    /// Transparent pixels to leave around every image, which keeps texture
    /// filtering from sampling neighboring images.
    #[serde(default)]
    pub padding: u32,

    /// The order images are placed in.
    #[serde(default)]
    pub order: SortOrder,

    /// The folder pages and the manifest are written to, relative to this
    /// config file.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// File name prefix for pages. Pages are named `<page-name>-<index>.png`.
    #[serde(default = "default_page_name")]
    pub page_name: String,

    /// The images to pack.
    #[serde(default)]
    pub inputs: Vec<InputConfig>,

    /// The path that this config came from. Paths from this config should be
    /// relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Config {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs_err::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let file_path = folder_path.as_ref().join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs_err::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let mut config: Self =
            toml::from_slice(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_owned(),
                source,
            })?;
        config.file_path = path.to_owned();

        Ok(config)
    }

    /// The path that paths in this Config should be considered relative to.
    pub fn folder(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn output_folder(&self) -> PathBuf {
        self.folder().join(&self.output)
    }

    pub fn page_file_name(&self, index: usize) -> String {
        format!("{}-{}.png", self.page_name, index)
    }

    pub fn packer(&self) -> PagePacker {
        PagePacker::new()
            .min_size(self.min_page_size)
            .max_size(self.max_page_size)
            .padding(self.padding)
            .order(self.order.into())
    }

    /// A digest of every setting that affects where images end up. If this
    /// changes, the atlas has to be rebuilt even if no image did.
    pub fn layout_hash(&self) -> String {
        let layout = format!(
            "{:?} {:?} {} {:?} {}",
            self.min_page_size, self.max_page_size, self.padding, self.order, self.page_name
        );

        blake3::hash(layout.as_bytes()).to_hex().to_string()
    }
}

fn default_min_page_size() -> (u32, u32) {
    (128, 128)
}

fn default_max_page_size() -> (u32, u32) {
    (1024, 1024)
}

fn default_output() -> PathBuf {
    PathBuf::from("atlas")
}

fn default_page_name() -> String {
    String::from("page")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct InputConfig {
    /// A glob that will match all images that belong in this atlas.
    pub glob: Glob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Pack images in the order they were found.
    Insertion,

    /// Pack the tallest images first. Usually gives the densest pages.
    HeightDescending,

    /// Pack the largest images first.
    AreaDescending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::HeightDescending
    }
}

impl From<SortOrder> for ItemOrder {
    fn from(order: SortOrder) -> ItemOrder {
        match order {
            SortOrder::Insertion => ItemOrder::Insertion,
            SortOrder::HeightDescending => ItemOrder::HeightDescending,
            SortOrder::AreaDescending => ItemOrder::AreaDescending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<SortOrder, Self::Err> {
        match value {
            "insertion" => Ok(SortOrder::Insertion),
            "height-descending" => Ok(SortOrder::HeightDescending),
            "area-descending" => Ok(SortOrder::AreaDescending),

            _ => Err(String::from(
                "Invalid order. Valid options are 'insertion', 'height-descending' and 'area-descending'.",
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{source} in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{source}")]
    Io { path: PathBuf, source: io::Error },
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
