//! Repair of NaN and infinite samples.
//!
//! Each non-finite sample is replaced by the median of the finite samples in
//! its square window. Windows stay inside the sample's own Z plane, so a
//! volume is treated as a stack of independent images. Finite samples pass
//! through untouched and the threshold of the config is ignored.
//!
//! Unlike the filter median this one averages the two middle values when the
//! finite count is even, so a repaired sample need not occur in the input.

use rayon::prelude::*;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::sweep::{split_slices, with_worker_lanes};
use crate::volume::{Coord, VolumeDims};
use crate::window::{median_of_window, window_capacity, window_scratch, NeighborhoodMedian};

/// Copies `input` into `output` with every non-finite sample replaced.
///
/// Returns the number of replaced samples. Fails with
/// [`FilterError::NoFiniteNeighbors`] when some window holds nothing but
/// non-finite values; a larger radius is the usual fix.
pub fn replace_nonfinite(
    input: &[f32],
    output: &mut [f32],
    dims: VolumeDims,
    config: &FilterConfig,
) -> Result<usize> {
    config.validate()?;
    dims.check_buffer("input", input.len())?;
    dims.check_buffer("output", output.len())?;

    output.copy_from_slice(input);

    let plane_len = dims.plane_len();
    let plane_dims = VolumeDims::planar(dims.dim_x(), dims.dim_y())?;
    let capacity = window_capacity(&plane_dims, config.radius);
    let radius = config.radius;
    // Rows of an image, planes of a volume
    let slice_len = dims.slice_len();

    let replaced = with_worker_lanes(config.worker_lanes(), dims.len() / slice_len, |lanes| {
        split_slices(output, slice_len, lanes)
            .map(|(first_slice, chunk)| -> Result<usize> {
                let mut window = window_scratch(capacity)?;
                let offset = first_slice * slice_len;
                let mut replaced = 0;

                for (i, value) in chunk.iter_mut().enumerate() {
                    if value.is_finite() {
                        continue;
                    }
                    let at = dims.coord(offset + i);
                    let plane_in = &input[at.z * plane_len..(at.z + 1) * plane_len];
                    let engine = NeighborhoodMedian::new(plane_in, plane_dims, radius, 0.0);

                    engine.collect(Coord::new(at.x, at.y, 0), &mut window);
                    window.retain(|v| v.is_finite());
                    if window.is_empty() {
                        return Err(FilterError::NoFiniteNeighbors {
                            x: at.x,
                            y: at.y,
                            z: at.z,
                        });
                    }
                    *value = finite_median(&mut window);
                    replaced += 1;
                }
                Ok(replaced)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    })?;

    tracing::debug!(
        "Replaced {} non-finite samples in {}x{}x{} volume (radius={})",
        replaced,
        dims.dim_x(),
        dims.dim_y(),
        dims.dim_z(),
        radius
    );
    Ok(replaced)
}

/// Median of a non-empty window of finite values. Even counts average the two
/// middle values. Reorders `values`.
pub fn finite_median(values: &mut [f32]) -> f32 {
    let upper = median_of_window(values);
    if values.len() % 2 == 1 {
        return upper;
    }
    // After selection everything left of the middle ranks at or below it
    let lower = values[..values.len() / 2]
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    ((f64::from(lower) + f64::from(upper)) * 0.5) as f32
}
