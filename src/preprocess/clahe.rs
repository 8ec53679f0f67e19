//! Contrast-limited adaptive histogram equalization (CLAHE) on an 8-bit plane.
//!
//! The plane is split into a `tiles.0 × tiles.1` grid. Each tile gets a
//! clipped, redistributed histogram turned into a lookup table; every output
//! pixel bilinearly blends the LUTs of the four nearest tile centres.
//!
//! When the plane size is not a multiple of the grid, tile histograms read
//! a reflect-101 extension of the plane so every tile has the same area.
use crate::error::Error;
use crate::filters::{map_index, BorderMode};
use crate::image::{GrayImageU8, ImageView, ImageViewMut};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheOptions {
    /// Clip limit relative to a uniform histogram (1.0 = no amplification).
    pub clip_limit: f32,
    /// Tile grid as (columns, rows).
    pub tiles: (usize, usize),
}

impl Default for ClaheOptions {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles: (8, 8),
        }
    }
}

impl ClaheOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.tiles.0 == 0 || self.tiles.1 == 0 {
            return Err(Error::InvalidParams(format!(
                "CLAHE tile grid must be non-empty, got {:?}",
                self.tiles
            )));
        }
        if !(self.clip_limit.is_finite() && self.clip_limit >= 0.0) {
            return Err(Error::InvalidParams(format!(
                "CLAHE clip limit must be a non-negative number, got {}",
                self.clip_limit
            )));
        }
        Ok(())
    }
}

struct TileGeometry {
    tile_w: usize,
    tile_h: usize,
    cols: usize,
    rows: usize,
}

impl TileGeometry {
    /// Grid of `cols x rows` tiles covering a `w x h` plane; edge tiles may
    /// extend past the border.
    fn for_plane(w: usize, h: usize, (cols, rows): (usize, usize)) -> Self {
        Self {
            tile_w: w.div_ceil(cols),
            tile_h: h.div_ceil(rows),
            cols,
            rows,
        }
    }

    fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    fn area(&self) -> usize {
        self.tile_w * self.tile_h
    }
}

fn tile_histogram(src: &GrayImageU8, geo: &TileGeometry, tx: usize, ty: usize) -> [u32; BINS] {
    let (w, h) = src.dimensions();
    let mut hist = [0u32; BINS];
    let x0 = tx * geo.tile_w;
    let y0 = ty * geo.tile_h;
    for dy in 0..geo.tile_h {
        let y = map_index((y0 + dy) as isize, h, BorderMode::Reflect101);
        let row = src.row(y);
        for dx in 0..geo.tile_w {
            let x = x0 + dx;
            let v = if x < w {
                row[x]
            } else {
                row[map_index(x as isize, w, BorderMode::Reflect101)]
            };
            hist[v as usize] += 1;
        }
    }
    hist
}

fn clip_histogram(hist: &mut [u32; BINS], clip: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    let batch = excess / BINS as u32;
    let mut residual = excess - batch * BINS as u32;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (BINS / residual as usize).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn tile_lut(src: &GrayImageU8, geo: &TileGeometry, clip: u32, tile: usize) -> [u8; BINS] {
    let tx = tile % geo.cols;
    let ty = tile / geo.cols;
    let mut hist = tile_histogram(src, geo, tx, ty);
    clip_histogram(&mut hist, clip);

    let scale = (BINS - 1) as f32 / geo.area() as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0u32;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply CLAHE to `src`. Degenerate inputs (empty plane or empty grid) are
/// returned unchanged.
pub fn clahe(src: &GrayImageU8, options: &ClaheOptions) -> GrayImageU8 {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 || options.tiles.0 == 0 || options.tiles.1 == 0 {
        return src.clone();
    }

    let geo = TileGeometry::for_plane(w, h, options.tiles);
    let clip = if options.clip_limit > 0.0 {
        ((options.clip_limit * geo.area() as f32 / BINS as f32) as u32).max(1)
    } else {
        // No limit: a bin can never exceed the tile area.
        geo.area() as u32
    };

    let luts: Vec<[u8; BINS]> = (0..geo.tile_count())
        .into_par_iter()
        .map(|tile| tile_lut(src, &geo, clip, tile))
        .collect();

    let inv_tw = 1.0 / geo.tile_w as f32;
    let inv_th = 1.0 / geo.tile_h as f32;
    let cols = geo.cols;
    let mut out = GrayImageU8::new(w, h);
    for y in 0..h {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(geo.rows as isize - 1) as usize;
        let ty1 = ty1.max(0) as usize;

        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..w {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let tx2 = (tx1 + 1).min(geo.cols as isize - 1) as usize;
            let tx1 = tx1.max(0) as usize;

            let v = src_row[x] as usize;
            let top = luts[ty1 * cols + tx1][v] as f32 * (1.0 - xa)
                + luts[ty1 * cols + tx2][v] as f32 * xa;
            let bottom = luts[ty2 * cols + tx1][v] as f32 * (1.0 - xa)
                + luts[ty2 * cols + tx2][v] as f32 * xa;
            let value = top * (1.0 - ya) + bottom * ya;
            dst_row[x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize, lo: u8, hi: u8) -> GrayImageU8 {
        let mut img = GrayImageU8::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let t = x as f32 / (w - 1) as f32;
                img.set(x, y, (lo as f32 + t * (hi - lo) as f32).round() as u8);
            }
        }
        img
    }

    #[test]
    fn tile_grid_covers_plane() {
        let geo = TileGeometry::for_plane(640, 480, (8, 8));
        assert_eq!((geo.tile_w, geo.tile_h), (80, 60));
        assert_eq!(geo.tile_count(), 64);

        let geo = TileGeometry::for_plane(641, 479, (3, 2));
        assert_eq!((geo.tile_w, geo.tile_h), (214, 240));
        assert_eq!(geo.tile_count(), 6);
        assert!(geo.tile_w * geo.cols >= 641 && geo.tile_h * geo.rows >= 479);
    }

    #[test]
    fn non_square_grid_keeps_uniform_plane_level() {
        let options = ClaheOptions {
            tiles: (4, 2),
            ..ClaheOptions::default()
        };
        let out = clahe(&GrayImageU8::filled(90, 50, 255), &options);
        assert_eq!(out.dimensions(), (90, 50));
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn clip_redistributes_excess() {
        let mut hist = [0u32; BINS];
        hist[10] = 1000;
        clip_histogram(&mut hist, 100);
        let total: u32 = hist.iter().sum();
        assert_eq!(total, 1000);
        assert!(hist[10] <= 100 + 4);
    }

    #[test]
    fn stretches_low_contrast_plane() {
        let src = ramp(256, 256, 100, 130);
        let options = ClaheOptions {
            clip_limit: 40.0,
            ..ClaheOptions::default()
        };
        let out = clahe(&src, &options);
        let min_out = *out.data().iter().min().unwrap();
        let max_out = *out.data().iter().max().unwrap();
        assert!(
            max_out - min_out > 60,
            "expected a wider range than 100..130, got {min_out}..{max_out}"
        );
    }

    #[test]
    fn uniform_planes_stay_near_their_level() {
        let black = GrayImageU8::new(256, 256);
        let out = clahe(&black, &ClaheOptions::default());
        assert!(out.data().iter().all(|&v| v <= 4));
        let white = GrayImageU8::filled(256, 256, 255);
        assert!(clahe(&white, &ClaheOptions::default())
            .data()
            .iter()
            .all(|&v| v == 255));
    }

    #[test]
    fn handles_sizes_not_divisible_by_grid() {
        let src = ramp(37, 23, 20, 200);
        let out = clahe(&src, &ClaheOptions::default());
        assert_eq!(out.dimensions(), (37, 23));
    }
}
