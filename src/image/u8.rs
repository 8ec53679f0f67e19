//! Owned single-channel 8-bit plane.
//!
//! Masks and edge maps use the binary convention `0` = off, `255` = on.
use super::traits::{ImageView, ImageViewMut};
use crate::error::Error;

/// Owned, tightly packed single-channel 8-bit plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Zero-filled plane of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap raw row-major bytes; the length must equal `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, Error> {
        let expected = width * height;
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Number of non-zero pixels.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Pixel-wise AND of two planes of identical size.
    pub fn and(&self, other: &GrayImageU8) -> GrayImageU8 {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a & b)
            .collect();
        GrayImageU8 {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Pixel-wise OR of two planes of identical size.
    pub fn or(&self, other: &GrayImageU8) -> GrayImageU8 {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a | b)
            .collect();
        GrayImageU8 {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .unwrap_or_else(|| image::GrayImage::new(self.width as u32, self.height as u32))
    }

    pub fn from_image(img: image::GrayImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl ImageView for GrayImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = GrayImageU8::from_raw(4, 3, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn and_or_are_pixelwise() {
        let a = GrayImageU8::from_raw(2, 1, vec![255, 0]).unwrap();
        let b = GrayImageU8::from_raw(2, 1, vec![255, 255]).unwrap();
        assert_eq!(a.and(&b).data(), &[255, 0]);
        assert_eq!(a.or(&b).data(), &[255, 255]);
        assert_eq!(a.count_nonzero(), 1);
    }
}
