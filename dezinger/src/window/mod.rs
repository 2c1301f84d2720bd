//! Neighborhood median engine.
//!
//! For one target sample: gather every input value inside the radius-based
//! window (clipped to the volume, never padded), pick the median and decide
//! whether the sample is a zinger.
//!
//! The median is the element at rank `len / 2` of the window in ascending
//! [`f32::total_cmp`] order. For odd windows that is the true middle; for the
//! even windows that appear at boundaries it is the upper of the two middle
//! elements. No averaging happens, so the output is always one of the input
//! samples. Under `total_cmp` positive NaN ranks above `+inf` and negative NaN
//! below `-inf`, which keeps the selection independent of gather order.


use std::ops::Range;

use crate::error::{FilterError, Result};
use crate::volume::{Coord, VolumeDims};

/// Window dimensionality, fixed by the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowShape {
    /// Square window in the XY plane (`dim_z == 1`).
    Planar,
    /// Cubic window (`dim_z > 1`).
    Volumetric,
}

impl WindowShape {
    pub fn for_dims(dims: &VolumeDims) -> Self {
        if dims.is_volumetric() {
            Self::Volumetric
        } else {
            Self::Planar
        }
    }
}

/// Per-axis index ranges of a clipped window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBounds {
    pub x: Range<usize>,
    pub y: Range<usize>,
    pub z: Range<usize>,
}

impl WindowBounds {
    /// Number of samples inside the window.
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn clamped(center: usize, radius: usize, extent: usize) -> Range<usize> {
    let start = center.saturating_sub(radius);
    let end = center.saturating_add(radius).saturating_add(1).min(extent);
    start..end
}

/// Largest window any sample of `dims` can have at `radius`.
pub fn window_capacity(dims: &VolumeDims, radius: usize) -> usize {
    let diameter = radius.saturating_mul(2).saturating_add(1);
    let planar = diameter.min(dims.dim_x()) * diameter.min(dims.dim_y());
    match WindowShape::for_dims(dims) {
        WindowShape::Planar => planar,
        WindowShape::Volumetric => planar * diameter.min(dims.dim_z()),
    }
}

/// Reserves a gather buffer for one worker lane.
pub fn window_scratch(capacity: usize) -> Result<Vec<f32>> {
    let mut window = Vec::new();
    window
        .try_reserve_exact(capacity)
        .map_err(|_| FilterError::ScratchAllocation { capacity })?;
    Ok(window)
}

/// Median of a non-empty window. Reorders `values`.
#[inline]
pub fn median_of_window(values: &mut [f32]) -> f32 {
    debug_assert!(!values.is_empty(), "window must contain the target sample");
    let mid = values.len() / 2;
    *values.select_nth_unstable_by(mid, f32::total_cmp).1
}

/// Dezingering decision for one sample.
///
/// With a positive threshold the median replaces `v0` only when they differ
/// by strictly more than `mu_threshold`; a NaN on either side fails the test
/// and keeps `v0`. A zero threshold always yields the median.
#[inline]
pub fn dezinger(v0: f32, median: f32, mu_threshold: f32) -> f32 {
    if mu_threshold > 0.0 {
        if (v0 - median).abs() > mu_threshold {
            median
        } else {
            v0
        }
    } else {
        median
    }
}

/// Read-only view of the input plus the per-invocation filter parameters.
/// Shared by reference between all worker lanes.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodMedian<'a> {
    input: &'a [f32],
    dims: VolumeDims,
    shape: WindowShape,
    radius: usize,
    mu_threshold: f32,
}

impl<'a> NeighborhoodMedian<'a> {
    pub fn new(input: &'a [f32], dims: VolumeDims, radius: usize, mu_threshold: f32) -> Self {
        debug_assert_eq!(input.len(), dims.len());
        Self {
            input,
            dims,
            shape: WindowShape::for_dims(&dims),
            radius,
            mu_threshold,
        }
    }

    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    pub fn capacity(&self) -> usize {
        window_capacity(&self.dims, self.radius)
    }

    pub fn window_bounds(&self, at: Coord) -> WindowBounds {
        let z = match self.shape {
            WindowShape::Planar => at.z..at.z + 1,
            WindowShape::Volumetric => clamped(at.z, self.radius, self.dims.dim_z()),
        };
        WindowBounds {
            x: clamped(at.x, self.radius, self.dims.dim_x()),
            y: clamped(at.y, self.radius, self.dims.dim_y()),
            z,
        }
    }

    /// Replaces the contents of `window` with the input samples around `at`.
    pub fn collect(&self, at: Coord, window: &mut Vec<f32>) {
        window.clear();
        let bounds = self.window_bounds(at);
        let row_len = bounds.x.len();
        for z in bounds.z {
            for y in bounds.y.clone() {
                let start = self.dims.index(bounds.x.start, y, z);
                window.extend_from_slice(&self.input[start..start + row_len]);
            }
        }
    }

    /// Output value for the sample at `at`.
    #[inline]
    pub fn filter_at(&self, at: Coord, window: &mut Vec<f32>) -> f32 {
        self.collect(at, window);
        let median = median_of_window(window);
        let v0 = self.input[self.dims.index(at.x, at.y, at.z)];
        dezinger(v0, median, self.mu_threshold)
    }
}
