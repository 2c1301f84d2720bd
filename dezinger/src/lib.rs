//! Dezinger - median filtering and outlier removal for tomography data.
//!
//! Works on flat row-major `f32` buffers holding either a 2D image
//! (`dim_z == 1`) or a 3D volume. Every output sample is the median of the
//! input window around it, or, with a positive `mu_threshold`, that median
//! only when the sample deviates from it by more than the threshold. Windows
//! are clipped at the volume edges.
//!
//! # Quick Start
//!
//! ```rust
//! use dezinger::{median_filter, FilterConfig, VolumeDims};
//!
//! let dims = VolumeDims::planar(5, 5)?;
//! let mut input = vec![0.0f32; dims.len()];
//! input[dims.index(2, 2, 0)] = 100.0;
//!
//! let mut output = vec![0.0f32; dims.len()];
//! median_filter(&input, &mut output, dims, &FilterConfig::dezinger(1, 10.0))?;
//! assert_eq!(output[dims.index(2, 2, 0)], 0.0);
//! # Ok::<(), dezinger::FilterError>(())
//! ```

pub mod config;
pub mod error;
pub mod nonfinite;
pub mod sweep;
pub mod volume;
pub mod window;

pub use config::FilterConfig;
pub use error::{FilterError, Result};
pub use nonfinite::replace_nonfinite;
pub use sweep::{filter, median_filter};
pub use volume::{Coord, VolumeDims};
pub use window::{dezinger, median_of_window, NeighborhoodMedian, WindowShape};

#[cfg(feature = "bench")]
pub mod bench {
    pub use crate::sweep::bench as median_filter;
}
