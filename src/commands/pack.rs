use std::{
    collections::BTreeMap,
    env,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::{
    data::{Config, ImageSlice, Manifest, PageManifest, SpriteManifest},
    image::Image,
    layout::{self, Atlas},
    options::PackOptions,
    sprite_name::SpriteName,
};

pub use self::error::Error as PackCommandError;
use self::error::Error;

pub fn pack(options: PackOptions) -> Result<(), Error> {
    let fuzzy_config_path = match options.config {
        Some(path) => path,
        None => env::current_dir().map_err(|source| Error::CurrentDir { source })?,
    };

    pack_atlas(&fuzzy_config_path, options.force)?;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackOutcome {
    /// Nothing changed since the last pack, so nothing was written.
    UpToDate,

    /// Pages and manifest were written.
    Packed { pages: usize },
}

fn pack_atlas(fuzzy_config_path: &Path, force: bool) -> Result<PackOutcome, Error> {
    let mut session = PackSession::new(fuzzy_config_path)?;

    session.discover_inputs()?;
    session.hash_inputs()?;

    if !force && session.is_up_to_date() {
        log::info!(
            "Atlas \"{}\" is up to date, nothing to do",
            session.config.name
        );
        return Ok(PackOutcome::UpToDate);
    }

    session.decode_inputs()?;
    let atlas = session.lay_out()?;
    session.write_pages(&atlas)?;
    session.write_manifest(&atlas)?;

    Ok(PackOutcome::Packed {
        pages: atlas.pages.len(),
    })
}

/// A pack session holds all of the state for a single run of the
/// 'atlaser pack' command.
#[derive(Debug)]
struct PackSession {
    config: Config,

    /// The manifest left behind by the previous pack, or an empty one.
    original_manifest: Manifest,

    /// All of the inputs discovered so far.
    inputs: BTreeMap<SpriteName, PackInput>,
}

#[derive(Debug)]
struct PackInput {
    path: PathBuf,
    contents: Vec<u8>,
    hash: String,
    image: Option<Image>,
}

impl PackSession {
    fn new(fuzzy_config_path: &Path) -> Result<Self, Error> {
        log::trace!("Starting new pack session");

        let config = Config::read_from_folder_or_file(fuzzy_config_path)?;

        log::trace!("Starting from config \"{}\"", config.name);

        let original_manifest = match Manifest::read_from_folder(config.output_folder()) {
            Ok(manifest) => manifest,
            Err(err) if err.is_not_found() => Manifest::default(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            config,
            original_manifest,
            inputs: BTreeMap::new(),
        })
    }

    /// Find all images matched by the config's input globs.
    fn discover_inputs(&mut self) -> Result<(), Error> {
        let config_path = self.config.folder();

        for input_config in &self.config.inputs {
            let base_path = config_path.join(input_config.glob.base_dir());

            if !base_path.exists() {
                log::warn!(
                    "Nothing to search for '{}', {} does not exist",
                    input_config.glob,
                    base_path.display()
                );
                continue;
            }

            log::trace!(
                "Searching for inputs in '{}' matching '{}'",
                base_path.display(),
                input_config.glob,
            );

            for entry in WalkDir::new(&base_path) {
                let entry = entry?;

                if !entry.file_type().is_file() {
                    continue;
                }

                let name = match SpriteName::from_paths(config_path, entry.path()) {
                    Some(name) => name,
                    None => continue,
                };

                if !input_config.glob.is_match(name.as_ref()) {
                    continue;
                }

                log::trace!("Found input {}", name);

                let path = entry.into_path();
                if self.inputs.contains_key(&name) {
                    return Err(Error::OverlappingGlobs { path });
                }

                self.inputs.insert(
                    name,
                    PackInput {
                        path,
                        contents: Vec::new(),
                        hash: String::new(),
                        image: None,
                    },
                );
            }
        }

        if self.inputs.is_empty() {
            log::warn!("No images were found for atlas \"{}\"", self.config.name);
        }

        Ok(())
    }

    fn hash_inputs(&mut self) -> Result<(), Error> {
        for input in self.inputs.values_mut() {
            input.contents = fs_err::read(&input.path)?;
            input.hash = blake3::hash(&input.contents).to_hex().to_string();
        }

        Ok(())
    }

    /// True if the previous pack used the same images and layout settings,
    /// and every page it wrote is still on disk.
    fn is_up_to_date(&self) -> bool {
        let output_folder = self.config.output_folder();
        let pages_exist = self
            .original_manifest
            .pages
            .iter()
            .all(|page| output_folder.join(&page.file).is_file());

        if !pages_exist {
            log::debug!("Pages from the last pack are missing");
            return false;
        }

        let hashes = self
            .inputs
            .iter()
            .map(|(name, input)| (name.clone(), input.hash.clone()))
            .collect();

        self.original_manifest
            .is_up_to_date(&self.config.layout_hash(), &hashes)
    }

    fn decode_inputs(&mut self) -> Result<(), Error> {
        let progress = ProgressBar::new(self.inputs.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar().template("Decoding images {bar:40} {pos}/{len} {msg}"),
        );

        for (name, input) in &mut self.inputs {
            progress.set_message(name.to_string());

            let image =
                Image::decode_png(input.contents.as_slice()).map_err(|source| Error::Image {
                    path: input.path.clone(),
                    source,
                })?;

            input.image = Some(image);
            input.contents = Vec::new();
            progress.inc(1);
        }

        progress.finish_and_clear();

        Ok(())
    }

    fn lay_out(&self) -> Result<Atlas, Error> {
        let sprites = self.inputs.iter().filter_map(|(name, input)| {
            input
                .image
                .as_ref()
                .map(|image| (name.clone(), image.size()))
        });

        let atlas = layout::lay_out(&self.config.packer(), self.config.padding, sprites)?;

        log::info!(
            "Packed {} images into {} pages",
            self.inputs.len(),
            atlas.pages.len()
        );

        Ok(atlas)
    }

    fn write_pages(&self, atlas: &Atlas) -> Result<(), Error> {
        let output_folder = self.config.output_folder();
        fs_err::create_dir_all(&output_folder)?;

        let images: BTreeMap<&SpriteName, &Image> = self
            .inputs
            .iter()
            .filter_map(|(name, input)| input.image.as_ref().map(|image| (name, image)))
            .collect();

        let page_files: Vec<String> = (0..atlas.pages.len())
            .map(|index| self.config.page_file_name(index))
            .collect();

        for (page, page_file) in atlas.pages.iter().zip(&page_files) {
            let page_path = output_folder.join(page_file);
            let page_image = page.render(&images).map_err(|source| Error::Image {
                path: page_path.clone(),
                source,
            })?;

            let file = BufWriter::new(fs_err::File::create(&page_path)?);
            page_image
                .encode_png(file)
                .map_err(|source| Error::Image {
                    path: page_path.clone(),
                    source,
                })?;

            log::info!(
                "Wrote {} ({}x{}, {:.0}% used)",
                page_path.display(),
                page.size.0,
                page.size.1,
                page.occupancy() * 100.0
            );
        }

        // Pages from a previous pack that this one no longer produces.
        let stale_pages = self
            .original_manifest
            .pages
            .iter()
            .filter(|page| !page_files.contains(&page.file));

        for stale in stale_pages {
            let stale_path = output_folder.join(&stale.file);

            match fs_err::remove_file(&stale_path) {
                Ok(()) => log::info!("Removed old page {}", stale_path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    fn write_manifest(&self, atlas: &Atlas) -> Result<(), Error> {
        let mut manifest = Manifest {
            config_hash: Some(self.config.layout_hash()),
            pages: Vec::new(),
            sprites: BTreeMap::new(),
        };

        for (index, page) in atlas.pages.iter().enumerate() {
            manifest.pages.push(PageManifest {
                file: self.config.page_file_name(index),
                size: page.size,
            });

            for (name, region) in &page.sprites {
                manifest.sprites.insert(
                    name.clone(),
                    SpriteManifest {
                        hash: self.inputs[name].hash.clone(),
                        page: Some(index),
                        slice: Some(ImageSlice::from(*region)),
                    },
                );
            }
        }

        for name in &atlas.empty {
            manifest.sprites.insert(
                name.clone(),
                SpriteManifest {
                    hash: self.inputs[name].hash.clone(),
                    page: None,
                    slice: None,
                },
            );
        }

        manifest.write_to_folder(self.config.output_folder())?;

        Ok(())
    }
}

mod error {
    use std::{io, path::PathBuf};

    use thiserror::Error;

    use crate::{
        data::{ConfigError, ManifestError},
        image::ImageError,
        layout::LayoutError,
    };

    #[derive(Debug, Error)]
    pub enum Error {
        #[error(transparent)]
        Config(#[from] ConfigError),

        #[error(transparent)]
        Manifest(#[from] ManifestError),

        #[error(transparent)]
        Layout(#[from] LayoutError),

        #[error(transparent)]
        Io(#[from] io::Error),

        #[error("Image error in {}: {source}", .path.display())]
        Image { path: PathBuf, source: ImageError },

        #[error("couldn't get the current directory of the process")]
        CurrentDir { source: io::Error },

        #[error(transparent)]
        WalkDir(#[from] walkdir::Error),

        #[error("Path {} was described by more than one glob", .path.display())]
        OverlappingGlobs { path: PathBuf },
    }
}
