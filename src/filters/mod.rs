//! Neighbourhood filters shared by the preprocessing and edge stages.

pub mod border;
pub mod gaussian;

pub use border::{map_index, BorderMode};
pub use gaussian::{convolve_separable, gaussian_blur, GaussianKernel, SeparableFilter};
