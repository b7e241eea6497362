//! RGBA8 pixel buffers, PNG reading and writing, and copying images into atlas
//! pages.

use std::{
    convert::TryFrom,
    io::{Read, Write},
};

use splitpack::Region;
use thiserror::Error;

const STRIDE: u32 = 4;

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[cfg(test)]
impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode(#[from] png::DecodingError),

    #[error(transparent)]
    Encode(#[from] png::EncodingError),

    #[error("a {}x{} image is too large to hold in memory", .size.0, .size.1)]
    TooLarge { size: (u32, u32) },

    #[error("{color_type:?} images with {bit_depth:?} bit depth aren't supported")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

/// Reads just enough of a PNG to learn its dimensions.
pub fn read_png_size<R: Read>(input: R) -> Result<(u32, u32), ImageError> {
    let (info, _) = png::Decoder::new(input).read_info()?;

    Ok((info.width, info.height))
}

/// Bytes needed to store an RGBA8 image of the given size, or `None` if that
/// doesn't fit in memory.
fn buffer_len(size: (u32, u32)) -> Option<usize> {
    let len = u64::from(size.0)
        .checked_mul(u64::from(size.1))?
        .checked_mul(u64::from(STRIDE))?;

    usize::try_from(len).ok()
}

/// An image stored as tightly packed rows of 8-bit RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();

        assert_eq!(buffer_len(size), Some(data.len()));

        Self { size, data }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Result<Self, ImageError> {
        let len = buffer_len(size).ok_or(ImageError::TooLarge { size })?;

        Ok(Self::new_rgba8(size, vec![0; len]))
    }

    /// Reads a PNG, converting any 8-bit or 16-bit grayscale, RGB or indexed
    /// image to RGBA8 along the way.
    pub fn decode_png<R: Read>(input: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );

        let (info, mut reader) = decoder.read_info()?;

        let mut raw = vec![0; info.buffer_size()];
        reader.next_frame(&mut raw)?;

        if info.bit_depth != png::BitDepth::Eight {
            return Err(ImageError::UnsupportedFormat {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }

        let data = match info.color_type {
            png::ColorType::RGBA => raw,
            png::ColorType::RGB => raw
                .chunks_exact(3)
                .flat_map(|rgb| vec![rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => raw
                .chunks_exact(2)
                .flat_map(|ga| vec![ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            png::ColorType::Grayscale => raw.iter().flat_map(|&g| vec![g, g, g, 255]).collect(),
            color_type => {
                return Err(ImageError::UnsupportedFormat {
                    color_type,
                    bit_depth: info.bit_depth,
                })
            }
        };

        Ok(Self::new_rgba8((info.width, info.height), data))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);
        encoder.set_color(png::ColorType::RGBA);
        encoder.set_depth(png::BitDepth::Eight);

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies all of `other` into this image with its top-left corner at the
    /// region's position. The region must be the size of `other` and lie
    /// within this image.
    pub fn blit(&mut self, other: &Image, region: Region) {
        assert_eq!(region.size(), other.size);
        assert!(Region::new(0, 0, self.size.0, self.size.1).contains(&region));

        if region.is_empty() {
            return;
        }

        let stride = STRIDE as usize;
        let other_rows = other.data.chunks_exact(other.size.0 as usize * stride);

        for (other_y, other_row) in other_rows.enumerate() {
            let self_y = region.y as usize + other_y;
            let start_px = region.x as usize + self.size.0 as usize * self_y;

            let start_in_bytes = stride * start_px;
            let end_in_bytes = start_in_bytes + other_row.len();

            self.data[start_in_bytes..end_in_bytes].copy_from_slice(other_row);
        }
    }

    #[cfg(test)]
    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        let start = self.offset(pos);

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    #[cfg(test)]
    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        let start = self.offset(pos);

        self.data[start..start + 4].copy_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
    }

    #[cfg(test)]
    fn offset(&self, pos: (u32, u32)) -> usize {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        STRIDE as usize * (pos.0 as usize + pos.1 as usize * self.size.0 as usize)
    }
}
