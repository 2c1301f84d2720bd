//! Volume iterator: one data-parallel pass over every output sample.
//!
//! The output is split into whole outer slices (rows of a 2D image, planes of
//! a 3D volume). Each rayon task owns one contiguous run of slices, gathers
//! windows from the shared input and writes only into its own run.

#[cfg(feature = "bench")]
pub mod bench;


use common::parallel::{ParRowsMut, ParRowsMutWithOffset};
use rayon::prelude::*;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::volume::VolumeDims;
use crate::window::{window_scratch, NeighborhoodMedian};

/// Median-filters or dezingers `input` into `output`.
///
/// `output` is first overwritten with a copy of `input`, then every sample is
/// replaced by the value of the neighborhood median engine. Both buffers must
/// hold exactly `dims.len()` samples. The call returns once every sample has
/// been written.
pub fn median_filter(
    input: &[f32],
    output: &mut [f32],
    dims: VolumeDims,
    config: &FilterConfig,
) -> Result<()> {
    config.validate()?;
    dims.check_buffer("input", input.len())?;
    dims.check_buffer("output", output.len())?;

    tracing::debug!(
        "Median filter {}x{}x{}: radius={}, mu_threshold={}, lanes={:?}",
        dims.dim_x(),
        dims.dim_y(),
        dims.dim_z(),
        config.radius,
        config.mu_threshold,
        config.worker_lanes()
    );

    output.copy_from_slice(input);

    let engine = NeighborhoodMedian::new(input, dims, config.radius, config.mu_threshold);
    let slice_len = dims.slice_len();

    with_worker_lanes(config.worker_lanes(), dims.len() / slice_len, |lanes| {
        split_slices(output, slice_len, lanes)
            .try_for_each(|(first_slice, chunk)| -> Result<()> {
                let mut window = window_scratch(engine.capacity())?;
                let offset = first_slice * slice_len;
                for (i, value) in chunk.iter_mut().enumerate() {
                    *value = engine.filter_at(dims.coord(offset + i), &mut window);
                }
                Ok(())
            })
    })?;

    tracing::trace!("Median filter finished ({} samples)", dims.len());
    Ok(())
}

/// Flat entry point with the signed parameters of the C-style interface.
///
/// Negative radius, non-positive extents, negative or NaN thresholds and
/// mis-sized buffers are reported as errors before anything is written.
#[allow(clippy::too_many_arguments)]
pub fn filter(
    input: &[f32],
    output: &mut [f32],
    radius: i32,
    mu_threshold: f32,
    ncores: i32,
    dim_x: i32,
    dim_y: i32,
    dim_z: i32,
) -> Result<()> {
    let radius = usize::try_from(radius).map_err(|_| FilterError::NegativeRadius(radius as i64))?;
    let dims = VolumeDims::from_signed(dim_x, dim_y, dim_z)?;
    let config = FilterConfig {
        radius,
        mu_threshold,
        ncores,
    };
    median_filter(input, output, dims, &config)
}

/// Runs `sweep` on a dedicated pool of `lanes` threads, or on the global pool
/// when no lane count is requested.
///
/// The pool never holds more threads than there are `slices` to hand out, so
/// an oversized `ncores` costs nothing beyond one thread per slice.
pub(crate) fn with_worker_lanes<R, F>(lanes: Option<usize>, slices: usize, sweep: F) -> Result<R>
where
    R: Send,
    F: FnOnce(Option<usize>) -> Result<R> + Send,
{
    match lanes.map(|lanes| lanes.min(slices).max(1)) {
        Some(lanes) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(lanes)
                .build()?;
            pool.install(|| sweep(Some(lanes)))
        }
        None => sweep(None),
    }
}

/// Fixed lanes split statically; otherwise rayon's pool size picks the chunking.
pub(crate) fn split_slices(
    output: &mut [f32],
    slice_len: usize,
    lanes: Option<usize>,
) -> ParRowsMutWithOffset<'_, f32> {
    match lanes {
        Some(lanes) => output.par_rows_mut_lanes(slice_len, lanes),
        None => output.par_rows_mut_auto(slice_len),
    }
}
