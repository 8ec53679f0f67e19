//! Lane detector composing the per-frame stages.
//!
//! Overview
//! - Every frame is resized to one canonical resolution on entry, so all
//!   geometric constants (ROI fractions, Hough lengths, slope gate) keep their
//!   meaning whatever the source size.
//! - Stages run strictly forward; each one takes the previous stage's buffer
//!   by reference and returns a new owned buffer.
//! - No state survives a call. Running the same frame twice gives
//!   byte-identical output, including the Hough stage whose visiting order is
//!   drawn from a seeded generator.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and the CLI.
//! - `pipeline` – the [`LaneDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::LaneParams;
pub use pipeline::{LaneDetector, StageImages};
