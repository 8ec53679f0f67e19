//! Owned interleaved RGB frame, 8 bits per channel.
//!
//! This is the pipeline's Frame: one is produced per stage and never mutated
//! after it is handed on. Channel order is R, G, B (as decoded by `image`).
use super::traits::ImageView;
use super::u8::GrayImageU8;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImageU8 {
    /// Black frame of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap interleaved RGB bytes; the length must equal `width * height * 3`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, Error> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|px| [px[0], px[1], px[2]])
    }

    /// Single-channel plane computed per pixel.
    pub fn to_plane<F>(&self, mut f: F) -> GrayImageU8
    where
        F: FnMut([u8; 3]) -> u8,
    {
        let data: Vec<u8> = self.pixels().map(&mut f).collect();
        // Length is width * height by construction.
        GrayImageU8::from_raw(self.width, self.height, data)
            .unwrap_or_else(|_| GrayImageU8::new(self.width, self.height))
    }

    /// Zero every pixel whose mask value is 0.
    pub fn masked(&self, mask: &GrayImageU8) -> RgbImageU8 {
        debug_assert_eq!(self.dimensions(), mask.dimensions());
        let mut data = Vec::with_capacity(self.data.len());
        for (px, &m) in self.data.chunks_exact(3).zip(mask.data().iter()) {
            if m != 0 {
                data.extend_from_slice(px);
            } else {
                data.extend_from_slice(&[0, 0, 0]);
            }
        }
        RgbImageU8 {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .unwrap_or_else(|| image::RgbImage::new(self.width as u32, self.height as u32))
    }

    pub fn from_image(img: image::RgbImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}
