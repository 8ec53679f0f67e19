//! Names for the buffers exchanged between stages.

use crate::image::{GrayImageU8, RgbImageU8};

/// Color frame, R,G,B interleaved.
pub type Frame = RgbImageU8;

/// Binary edge map: 0 = no edge, 255 = edge.
pub type EdgeMap = GrayImageU8;
