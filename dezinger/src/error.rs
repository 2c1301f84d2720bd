use thiserror::Error;

/// Precondition and resource failures of a filter invocation.
///
/// NaN and infinite samples are never errors for the median filter; they
/// flow through the comparisons like any other value.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Radius must be non-negative, got {0}")]
    NegativeRadius(i64),

    #[error("Dimension {axis} must be at least 1, got {value}")]
    InvalidDimension { axis: char, value: i64 },

    #[error("Volume {dim_x}x{dim_y}x{dim_z} has more elements than fit in memory")]
    DimensionOverflow {
        dim_x: usize,
        dim_y: usize,
        dim_z: usize,
    },

    #[error("Threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f32),

    #[error("{buffer} buffer holds {actual} samples, volume needs {expected}")]
    BufferLength {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to reserve a window buffer of {capacity} samples")]
    ScratchAllocation { capacity: usize },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Window around non-finite sample at ({x}, {y}, {z}) has no finite values")]
    NoFiniteNeighbors { x: usize, y: usize, z: usize },

    #[error("Invalid filter configuration: {0}")]
    Config(#[from] common::FormatError),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;
