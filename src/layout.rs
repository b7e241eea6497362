//! Turns a set of named images into atlas pages.

use std::collections::BTreeMap;

use splitpack::{InputItem, PackError, PagePacker, Region};
use thiserror::Error;

use crate::{
    image::{Image, ImageError},
    sprite_name::SpriteName,
};

/// Where every sprite goes, page by page.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub pages: Vec<Page>,

    /// Sprites with no pixels. They're still part of the atlas, but take up
    /// no space on any page.
    pub empty: Vec<SpriteName>,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub size: (u32, u32),
    pub sprites: Vec<(SpriteName, Region)>,
}

impl Page {
    pub fn occupancy(&self) -> f64 {
        let used: u64 = self.sprites.iter().map(|(_, region)| region.area()).sum();
        used as f64 / (u64::from(self.size.0) * u64::from(self.size.1)) as f64
    }

    /// Copies every sprite's pixels into a new image the size of the page.
    /// Space between sprites is left transparent.
    pub fn render(&self, images: &BTreeMap<&SpriteName, &Image>) -> Result<Image, ImageError> {
        let mut page = Image::new_empty_rgba8(self.size)?;

        for (name, region) in &self.sprites {
            match images.get(name) {
                Some(image) => page.blit(image, *region),
                None => log::warn!("No pixels for sprite {}, leaving it blank", name),
            }
        }

        Ok(page)
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(
        "Image {name} is {}x{}, which doesn't fit on the largest page allowed ({}x{}) once {padding}px of padding is added on every side",
        .size.0,
        .size.1,
        .max_size.0,
        .max_size.1
    )]
    TooLarge {
        name: SpriteName,
        size: (u32, u32),
        padding: u32,
        max_size: (u32, u32),
    },

    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Lays out sprites of the given sizes. `padding` must match the padding the
/// packer was configured with; it's only used for error messages.
pub fn lay_out<I>(packer: &PagePacker, padding: u32, sprites: I) -> Result<Atlas, LayoutError>
where
    I: IntoIterator<Item = (SpriteName, (u32, u32))>,
{
    let sprites: Vec<_> = sprites.into_iter().collect();
    let items = sprites
        .iter()
        .enumerate()
        .map(|(index, (_, size))| InputItem::new(index, *size));

    let output = match packer.pack(items) {
        Ok(output) => output,
        Err(PackError::ItemTooLarge {
            index, max_size, ..
        }) => {
            let (name, size) = sprites[index].clone();

            return Err(LayoutError::TooLarge {
                name,
                size,
                padding,
                max_size,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let (buckets, empty_items) = output.into_parts();

    let pages = buckets
        .into_iter()
        .map(|bucket| Page {
            size: bucket.size(),
            sprites: bucket
                .items()
                .iter()
                .map(|item| (sprites[*item.key()].0.clone(), item.region()))
                .collect(),
        })
        .collect();

    let empty = empty_items
        .into_iter()
        .map(|index| sprites[index].0.clone())
        .collect();

    Ok(Atlas { pages, empty })
}

#[cfg(test)]
mod test {
    use super::*;

    use std::path::Path;

    use crate::image::Pixel;

    fn name(path: &str) -> SpriteName {
        SpriteName::from_paths(Path::new(""), Path::new(path)).unwrap()
    }

    #[test]
    fn names_follow_their_sprites() {
        let packer = PagePacker::new().min_size((64, 64)).max_size((64, 64));
        let atlas = lay_out(
            &packer,
            0,
            vec![
                (name("small.png"), (16, 16)),
                (name("blank.png"), (0, 0)),
                (name("tall.png"), (16, 64)),
            ],
        )
        .unwrap();

        assert_eq!(atlas.empty, vec![name("blank.png")]);
        assert_eq!(atlas.pages.len(), 1);

        let page = &atlas.pages[0];
        assert_eq!(page.sprites[0], (name("tall.png"), Region::new(0, 0, 16, 64)));
        assert_eq!(page.sprites[1], (name("small.png"), Region::new(16, 0, 16, 16)));
    }

    #[test]
    fn oversize_names_the_image() {
        let packer = PagePacker::new()
            .min_size((32, 32))
            .max_size((32, 32))
            .padding(1);
        let err = lay_out(
            &packer,
            1,
            vec![(name("ok.png"), (8, 8)), (name("huge.png"), (31, 8))],
        )
        .unwrap_err();

        match err {
            LayoutError::TooLarge { name: huge, size, .. } => {
                assert_eq!(huge, name("huge.png"));
                assert_eq!(size, (31, 8));
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn render_copies_pixels() {
        let page = Page {
            size: (4, 2),
            sprites: vec![(name("a.png"), Region::new(2, 0, 2, 2))],
        };

        let pixels = Image::new_rgba8((2, 2), vec![255; 16]);
        let a = name("a.png");
        let mut images = BTreeMap::new();
        images.insert(&a, &pixels);

        let rendered = page.render(&images).unwrap();

        assert_eq!(rendered.size(), (4, 2));
        assert_eq!(rendered.get_pixel((0, 0)), Pixel::new(0, 0, 0, 0));
        assert_eq!(rendered.get_pixel((3, 1)), Pixel::new(255, 255, 255, 255));
        assert!((page.occupancy() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn oversized_page_fails_to_render() {
        let page = Page {
            size: (u32::MAX, u32::MAX),
            sprites: Vec::new(),
        };

        match page.render(&BTreeMap::new()) {
            Err(ImageError::TooLarge { size }) => assert_eq!(size, (u32::MAX, u32::MAX)),
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }
}
