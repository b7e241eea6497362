use std::{
    env, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use walkdir::WalkDir;

use crate::{
    image::{self, ImageError},
    layout::{self, Atlas, LayoutError},
    options::FitOptions,
    sprite_name::SpriteName,
};

/// Lays out a set of PNG files without writing anything, then reports how
/// many pages it took and how full they are.
pub fn fit(options: FitOptions) -> Result<(), FitError> {
    let paths = if options.paths.is_empty() {
        vec![env::current_dir().map_err(|source| FitError::CurrentDir { source })?]
    } else {
        options.paths.clone()
    };

    let mut sprites = Vec::new();
    for path in &paths {
        collect_images(path, &mut sprites)?;
    }

    log::debug!("Found {} images", sprites.len());

    let packer = splitpack::PagePacker::new()
        .min_size(options.min_size)
        .max_size(options.max_size)
        .padding(options.padding)
        .order(options.order.into());

    let atlas = layout::lay_out(&packer, options.padding, sprites)?;

    if options.json {
        let report = FitReport::from(&atlas);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&atlas);
    }

    Ok(())
}

fn collect_images(path: &Path, sprites: &mut Vec<(SpriteName, (u32, u32))>) -> Result<(), FitError> {
    let meta = fs_err::metadata(path)?;

    if meta.is_file() {
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        return add_image(root, path, sprites);
    }

    for entry in WalkDir::new(path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = entry?;

        if entry.file_type().is_file() && is_png(entry.path()) {
            add_image(path, entry.path(), sprites)?;
        }
    }

    Ok(())
}

fn add_image(
    root: &Path,
    path: &Path,
    sprites: &mut Vec<(SpriteName, (u32, u32))>,
) -> Result<(), FitError> {
    let name = match SpriteName::from_paths(root, path) {
        Some(name) => name,
        None => return Ok(()),
    };

    let file = fs_err::File::open(path)?;
    let size = image::read_png_size(file).map_err(|source| FitError::Image {
        path: path.to_owned(),
        source,
    })?;

    log::trace!("{} is {}x{}", name, size.0, size.1);
    sprites.push((name, size));

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
}

fn print_summary(atlas: &Atlas) {
    for (index, page) in atlas.pages.iter().enumerate() {
        println!(
            "page {}: {}x{}, {} images, {:.1}% used",
            index,
            page.size.0,
            page.size.1,
            page.sprites.len(),
            page.occupancy() * 100.0
        );
    }

    if !atlas.empty.is_empty() {
        println!("{} empty images were left out", atlas.empty.len());
    }
}

#[derive(Debug, Serialize)]
struct FitReport {
    pages: Vec<PageReport>,
    empty: Vec<SpriteName>,
}

#[derive(Debug, Serialize)]
struct PageReport {
    size: (u32, u32),
    occupancy: f64,
    sprites: Vec<SpriteReport>,
}

#[derive(Debug, Serialize)]
struct SpriteReport {
    name: SpriteName,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl From<&Atlas> for FitReport {
    fn from(atlas: &Atlas) -> Self {
        let pages = atlas
            .pages
            .iter()
            .map(|page| PageReport {
                size: page.size,
                occupancy: page.occupancy(),
                sprites: page
                    .sprites
                    .iter()
                    .map(|(name, region)| SpriteReport {
                        name: name.clone(),
                        x: region.x,
                        y: region.y,
                        width: region.width,
                        height: region.height,
                    })
                    .collect(),
            })
            .collect();

        FitReport {
            pages,
            empty: atlas.empty.clone(),
        }
    }
}

/// Parses sizes written like `256x128`. A single number means a square.
pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|err| format!("invalid size '{}': {}", value, err))
    };

    match value.split(|c| c == 'x' || c == 'X').collect::<Vec<_>>().as_slice() {
        [side] => {
            let side = parse(side)?;
            Ok((side, side))
        }
        [width, height] => Ok((parse(width)?, parse(height)?)),
        _ => Err(format!(
            "invalid size '{}', expected something like 256x256",
            value
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error("couldn't read {}: {source}", .path.display())]
    Image { path: PathBuf, source: ImageError },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("couldn't get the current directory of the process")]
    CurrentDir { source: io::Error },
}

#[cfg(test)]
mod test {
    use super::*;

    use splitpack::{PagePacker, Region};

    use crate::image::Image;

    #[test]
    fn parse_sizes() {
        assert_eq!(parse_size("256x128"), Ok((256, 128)));
        assert_eq!(parse_size("64"), Ok((64, 64)));
        assert_eq!(parse_size("32X16"), Ok((32, 16)));
        assert!(parse_size("x").is_err());
        assert!(parse_size("1x2x3").is_err());
        assert!(parse_size("-4x4").is_err());
    }

    #[test]
    fn png_extension() {
        assert!(is_png(Path::new("a/b.png")));
        assert!(is_png(Path::new("B.PNG")));
        assert!(!is_png(Path::new("b.jpg")));
        assert!(!is_png(Path::new("png")));
    }

    #[test]
    fn report_lists_every_sprite() {
        let name = |path: &str| SpriteName::from_paths(Path::new(""), Path::new(path)).unwrap();
        let packer = PagePacker::new().min_size((32, 32)).max_size((32, 32));

        let atlas = layout::lay_out(
            &packer,
            0,
            vec![(name("a.png"), (32, 16)), (name("b.png"), (0, 4))],
        )
        .unwrap();

        let report = FitReport::from(&atlas);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].sprites[0].name, name("a.png"));
        assert_eq!(report.pages[0].sprites[0].height, 16);
        assert_eq!(report.empty, vec![name("b.png")]);
        assert!((report.pages[0].occupancy - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sizes_come_from_png_headers() {
        let dir = env::temp_dir().join(format!("atlaser-fit-{}", std::process::id()));
        fs_err::create_dir_all(dir.join("icons")).unwrap();

        for (file, size) in &[("icons/big.png", (20, 10)), ("icons/small.png", (4, 4))] {
            let mut encoded = Vec::new();
            Image::new_empty_rgba8(*size)
                .unwrap()
                .encode_png(&mut encoded)
                .unwrap();
            fs_err::write(dir.join(file), encoded).unwrap();
        }
        fs_err::write(dir.join("icons/notes.txt"), "not an image").unwrap();

        let mut sprites = Vec::new();
        collect_images(&dir, &mut sprites).unwrap();

        let names: Vec<_> = sprites.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["icons/big.png", "icons/small.png"]);
        assert_eq!(sprites[0].1, (20, 10));

        let packer = PagePacker::new().min_size((32, 32)).max_size((32, 32));
        let atlas = layout::lay_out(&packer, 0, sprites).unwrap();
        assert_eq!(atlas.pages[0].sprites[0].1, Region::new(0, 0, 20, 10));

        fs_err::remove_dir_all(&dir).unwrap();
    }
}
