//! Benchmarks for the median filter sweep.
//! Run with: cargo bench -p dezinger --features bench --bench median_filter

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use super::median_filter;
use crate::config::FilterConfig;
use crate::volume::VolumeDims;

fn synthetic(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            if i % 97 == 0 {
                100.0
            } else {
                (i % 256) as f32 / 255.0
            }
        })
        .collect()
}

pub fn bench_median_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("median_filter_2d");

    for (width, height) in [(512, 512), (2048, 2048)] {
        let dims = VolumeDims::planar(width, height).expect("valid dims");
        let input = synthetic(dims.len());
        let mut output = vec![0.0f32; dims.len()];

        group.throughput(Throughput::Elements(dims.len() as u64));
        for radius in [1, 2] {
            let config = FilterConfig::dezinger(radius, 0.5);
            group.bench_function(
                BenchmarkId::new(format!("r{radius}"), format!("{width}x{height}")),
                |b| {
                    b.iter(|| {
                        median_filter(black_box(&input), &mut output, dims, &config)
                            .expect("filter");
                    });
                },
            );
        }
    }

    group.finish();

    let mut volume_group = c.benchmark_group("median_filter_3d");

    for side in [64, 128] {
        let dims = VolumeDims::new(side, side, side).expect("valid dims");
        let input = synthetic(dims.len());
        let mut output = vec![0.0f32; dims.len()];

        volume_group.throughput(Throughput::Elements(dims.len() as u64));
        for ncores in [1, 0] {
            let config = FilterConfig::median(1).with_ncores(ncores);
            volume_group.bench_function(
                BenchmarkId::new(format!("ncores{ncores}"), format!("{side}^3")),
                |b| {
                    b.iter(|| {
                        median_filter(black_box(&input), &mut output, dims, &config)
                            .expect("filter");
                    });
                },
            );
        }
    }

    volume_group.finish();
}
