//! Volume geometry: extents, row-major indexing and buffer checks.

use crate::error::{FilterError, Result};

/// Integer position of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Extents of a row-major volume. X varies fastest, then Y, then Z.
///
/// `dim_z == 1` is a 2D image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDims {
    dim_x: usize,
    dim_y: usize,
    dim_z: usize,
}

impl VolumeDims {
    /// Validated constructor. Every extent must be at least 1 and the
    /// element count must fit in `usize`.
    pub fn new(dim_x: usize, dim_y: usize, dim_z: usize) -> Result<Self> {
        for (axis, value) in [('X', dim_x), ('Y', dim_y), ('Z', dim_z)] {
            if value == 0 {
                return Err(FilterError::InvalidDimension { axis, value: 0 });
            }
        }

        let dims = Self {
            dim_x,
            dim_y,
            dim_z,
        };
        dims.checked_len().ok_or(FilterError::DimensionOverflow {
            dim_x,
            dim_y,
            dim_z,
        })?;
        Ok(dims)
    }

    pub fn planar(dim_x: usize, dim_y: usize) -> Result<Self> {
        Self::new(dim_x, dim_y, 1)
    }

    /// Accepts the signed extents of the flat entry point.
    pub fn from_signed(dim_x: i32, dim_y: i32, dim_z: i32) -> Result<Self> {
        let mut extents = [0usize; 3];
        for (slot, (axis, value)) in extents
            .iter_mut()
            .zip([('X', dim_x), ('Y', dim_y), ('Z', dim_z)])
        {
            if value < 1 {
                return Err(FilterError::InvalidDimension {
                    axis,
                    value: value as i64,
                });
            }
            *slot = value as usize;
        }
        Self::new(extents[0], extents[1], extents[2])
    }

    #[inline]
    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    #[inline]
    pub fn dim_y(&self) -> usize {
        self.dim_y
    }

    #[inline]
    pub fn dim_z(&self) -> usize {
        self.dim_z
    }

    fn checked_len(&self) -> Option<usize> {
        self.dim_x
            .checked_mul(self.dim_y)?
            .checked_mul(self.dim_z)
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.dim_x * self.dim_y * self.dim_z
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for a 3D volume (`dim_z > 1`).
    #[inline]
    pub fn is_volumetric(&self) -> bool {
        self.dim_z > 1
    }

    #[inline]
    pub fn plane_len(&self) -> usize {
        self.dim_x * self.dim_y
    }

    /// Length of one outer-loop slice: a row in 2D, a plane in 3D.
    #[inline]
    pub fn slice_len(&self) -> usize {
        if self.is_volumetric() {
            self.plane_len()
        } else {
            self.dim_x
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.dim_x && y < self.dim_y && z < self.dim_z);
        z * self.plane_len() + y * self.dim_x + x
    }

    #[inline]
    pub fn coord(&self, index: usize) -> Coord {
        debug_assert!(index < self.len());
        let plane = self.plane_len();
        let in_plane = index % plane;
        Coord {
            x: in_plane % self.dim_x,
            y: in_plane / self.dim_x,
            z: index / plane,
        }
    }

    pub fn check_buffer(&self, buffer: &'static str, actual: usize) -> Result<()> {
        let expected = self.len();
        if actual != expected {
            return Err(FilterError::BufferLength {
                buffer,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_and_coord_are_inverse() {
        let dims = VolumeDims::new(4, 3, 5).unwrap();
        for i in 0..dims.len() {
            let c = dims.coord(i);
            assert_eq!(dims.index(c.x, c.y, c.z), i);
        }
        assert_eq!(dims.index(1, 2, 3), 3 * 12 + 2 * 4 + 1);
    }

    #[test]
    fn test_slice_len_follows_dimensionality() {
        let image = VolumeDims::planar(6, 4).unwrap();
        assert!(!image.is_volumetric());
        assert_eq!(image.slice_len(), 6);

        let volume = VolumeDims::new(6, 4, 2).unwrap();
        assert!(volume.is_volumetric());
        assert_eq!(volume.slice_len(), 24);
    }

    #[test]
    fn test_zero_extent_rejected() {
        let err = VolumeDims::new(3, 0, 2).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidDimension { axis: 'Y', value: 0 }
        ));
    }

    #[test]
    fn test_negative_signed_extent_rejected() {
        let err = VolumeDims::from_signed(3, 3, -1).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidDimension { axis: 'Z', value: -1 }
        ));
        assert_eq!(
            VolumeDims::from_signed(2, 3, 4).unwrap(),
            VolumeDims::new(2, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_overflowing_extent_rejected() {
        let err = VolumeDims::new(usize::MAX, 2, 1).unwrap_err();
        assert!(matches!(err, FilterError::DimensionOverflow { .. }));
    }

    #[test]
    fn test_check_buffer() {
        let dims = VolumeDims::planar(3, 3).unwrap();
        assert!(dims.check_buffer("input", 9).is_ok());
        let err = dims.check_buffer("output", 8).unwrap_err();
        assert!(matches!(
            err,
            FilterError::BufferLength {
                buffer: "output",
                expected: 9,
                actual: 8
            }
        ));
    }
}
