use super::options::HoughOptions;
use super::segment::LineSegment;
use crate::image::{GrayImageU8, ImageView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const SHIFT: u32 = 16;

/// Result of one Hough pass.
#[derive(Clone, Debug, Default)]
pub struct HoughResult {
    pub segments: Vec<LineSegment>,
    pub edge_pixels: usize,
    pub elapsed_ms: f64,
}

/// Fixed-point stepping along a candidate line.
#[derive(Clone, Copy, Debug)]
struct Walk {
    start: (i64, i64),
    step: (i64, i64),
    /// Which coordinate carries the 16.16 fixed-point fraction.
    major_x: bool,
}

impl Walk {
    fn pixel(&self, x: i64, y: i64) -> (i64, i64) {
        if self.major_x {
            (x, y >> SHIFT)
        } else {
            (x >> SHIFT, y)
        }
    }
}

pub(super) struct HoughExtractor<'a> {
    options: &'a HoughOptions,
    width: usize,
    height: usize,
    num_angle: usize,
    num_rho: usize,
    /// `cos/rho`, `sin/rho` per angle bin, interleaved.
    trig: Vec<f32>,
    accum: Vec<i32>,
    mask: Vec<bool>,
    points: Vec<(usize, usize)>,
    segments: Vec<LineSegment>,
}

impl<'a> HoughExtractor<'a> {
    pub(super) fn new(edges: &'a GrayImageU8, options: &'a HoughOptions) -> Self {
        let (width, height) = edges.dimensions();
        let num_angle = ((std::f64::consts::PI / options.theta).round() as usize).max(1);
        let num_rho = ((((width + height) * 2 + 1) as f64 / options.rho).round() as usize).max(1);
        let inv_rho = 1.0 / options.rho;
        let mut trig = Vec::with_capacity(num_angle * 2);
        for n in 0..num_angle {
            let angle = n as f64 * options.theta;
            trig.push((angle.cos() * inv_rho) as f32);
            trig.push((angle.sin() * inv_rho) as f32);
        }

        let mut mask = vec![false; width * height];
        let mut points = Vec::new();
        for y in 0..height {
            for (x, &v) in edges.row(y).iter().enumerate() {
                if v != 0 {
                    mask[y * width + x] = true;
                    points.push((x, y));
                }
            }
        }

        Self {
            options,
            width,
            height,
            num_angle,
            num_rho,
            trig,
            accum: vec![0; num_angle * num_rho],
            mask,
            points,
            segments: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> HoughResult {
        let start = Instant::now();
        let edge_pixels = self.points.len();

        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let mut remaining = self.points.len();
        while remaining > 0 {
            let pick = rng.gen_range(0..remaining);
            let (x, y) = self.points[pick];
            self.points[pick] = self.points[remaining - 1];
            remaining -= 1;

            if !self.mask[y * self.width + x] {
                continue;
            }
            let Some(angle_bin) = self.vote(x, y) else {
                continue;
            };
            if self.trace_line(x, y, angle_bin) && self.is_full() {
                break;
            }
        }

        HoughResult {
            segments: self.segments,
            edge_pixels,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn is_full(&self) -> bool {
        self.options
            .max_lines
            .is_some_and(|max| self.segments.len() >= max)
    }

    #[inline]
    fn rho_index(&self, x: usize, y: usize, n: usize) -> usize {
        let r = (x as f32 * self.trig[n * 2] + y as f32 * self.trig[n * 2 + 1]).round() as i64;
        (r + (self.num_rho as i64 - 1) / 2) as usize
    }

    /// Add the votes of one point; returns the best angle bin once it reaches
    /// the threshold.
    fn vote(&mut self, x: usize, y: usize) -> Option<usize> {
        let threshold = self.options.threshold as i32;
        let mut best = threshold - 1;
        let mut best_bin = 0;
        for n in 0..self.num_angle {
            let idx = n * self.num_rho + self.rho_index(x, y, n);
            self.accum[idx] += 1;
            let votes = self.accum[idx];
            if best < votes {
                best = votes;
                best_bin = n;
            }
        }
        (best >= threshold).then_some(best_bin)
    }

    fn unvote(&mut self, x: usize, y: usize) {
        for n in 0..self.num_angle {
            let idx = n * self.num_rho + self.rho_index(x, y, n);
            self.accum[idx] -= 1;
        }
    }

    fn walk_for(&self, x: usize, y: usize, angle_bin: usize) -> Walk {
        // Line direction is perpendicular to the bin's normal.
        let a = -self.trig[angle_bin * 2 + 1];
        let b = self.trig[angle_bin * 2];
        let (x, y) = (x as i64, y as i64);
        let one = 1i64 << SHIFT;
        let half = 1i64 << (SHIFT - 1);
        if a.abs() > b.abs() {
            let dx = if a > 0.0 { 1 } else { -1 };
            let dy = (b as f64 * one as f64 / a.abs() as f64).round() as i64;
            Walk {
                start: (x, (y << SHIFT) + half),
                step: (dx, dy),
                major_x: true,
            }
        } else {
            let dy = if b > 0.0 { 1 } else { -1 };
            let dx = (a as f64 * one as f64 / b.abs() as f64).round() as i64;
            Walk {
                start: ((x << SHIFT) + half, y),
                step: (dx, dy),
                major_x: false,
            }
        }
    }

    fn in_bounds(&self, (px, py): (i64, i64)) -> bool {
        px >= 0 && py >= 0 && (px as usize) < self.width && (py as usize) < self.height
    }

    /// Walk both ways from the seed, find the segment ends, then claim its
    /// pixels. Returns true when a segment was recorded.
    fn trace_line(&mut self, x: usize, y: usize, angle_bin: usize) -> bool {
        let walk = self.walk_for(x, y, angle_bin);
        let max_gap = self.options.max_line_gap;
        let mut ends = [(x as i64, y as i64); 2];

        for (k, end) in ends.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { walk.step } else { (-walk.step.0, -walk.step.1) };
            let (mut cx, mut cy) = walk.start;
            let mut gap = 0u32;
            loop {
                let p = walk.pixel(cx, cy);
                if !self.in_bounds(p) {
                    break;
                }
                if self.mask[p.1 as usize * self.width + p.0 as usize] {
                    gap = 0;
                    *end = p;
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
                cx += dx;
                cy += dy;
            }
        }

        let min_len = self.options.min_line_length as i64;
        let good = (ends[1].0 - ends[0].0).abs() >= min_len || (ends[1].1 - ends[0].1).abs() >= min_len;

        for (k, &end) in ends.iter().enumerate() {
            let (dx, dy) = if k == 0 { walk.step } else { (-walk.step.0, -walk.step.1) };
            let (mut cx, mut cy) = walk.start;
            loop {
                let p = walk.pixel(cx, cy);
                if !self.in_bounds(p) {
                    break;
                }
                let (px, py) = (p.0 as usize, p.1 as usize);
                let idx = py * self.width + px;
                if self.mask[idx] {
                    if good {
                        self.unvote(px, py);
                    }
                    self.mask[idx] = false;
                }
                if p == end {
                    break;
                }
                cx += dx;
                cy += dy;
            }
        }

        if good {
            self.segments.push(LineSegment::new(
                [ends[0].0 as i32, ends[0].1 as i32],
                [ends[1].0 as i32, ends[1].1 as i32],
            ));
        }
        good
    }
}
