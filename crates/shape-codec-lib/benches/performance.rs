//! Performance benchmarks for shape-codec-lib
//!
//! Run with: cargo bench --package shape-codec-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Coord;
use shape_codec_lib::{
    Circle, EPSG_4326, EPSG_32633, Format, Geometry, Marker, Ring, ShapeCodec, union_bounds, wkb,
};
use std::hint::black_box;

/// Generate a wobbly closed ring with the specified number of points
fn generate_ring(num_points: usize, base_lat: f64, base_lon: f64) -> Ring {
    let mut pairs: Vec<[f64; 2]> = (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64 * std::f64::consts::TAU;
            let r = 0.01 + (t * 7.0).sin() * 0.001;
            [base_lon + t.cos() * r, base_lat + t.sin() * r]
        })
        .collect();
    pairs.push(pairs[0]);
    Ring::from_pairs(&pairs).unwrap()
}

/// A mix of every shape kind spread across an area
fn generate_shapes(count: usize) -> Vec<Geometry> {
    (0..count)
        .map(|i| {
            let lat = 47.0 + (i % 10) as f64 * 0.1;
            let lon = 8.0 + (i / 10) as f64 * 0.1;
            match i % 3 {
                0 => Geometry::Ring(generate_ring(32, lat, lon)),
                1 => Geometry::Circle(Circle::new(Coord { x: lon, y: lat }, 500.0)),
                _ => Geometry::Marker(Marker::new(Coord { x: lon, y: lat })),
            }
        })
        .collect()
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_wkb(c: &mut Criterion) {
    let mut group = c.benchmark_group("wkb");

    for points in [16, 1_000, 10_000] {
        let ring = generate_ring(points, 47.2, 8.8);
        let hex = wkb::encode_hex(&ring);

        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::new("encode_hex", points), &ring, |b, ring| {
            b.iter(|| wkb::encode_hex(black_box(ring)));
        });
        group.bench_with_input(BenchmarkId::new("decode_hex", points), &hex, |b, hex| {
            b.iter(|| wkb::decode_hex(black_box(hex)).unwrap());
        });
    }

    group.finish();
}

fn bench_text_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_formats");

    let codec = ShapeCodec::default();
    let ring = Geometry::Ring(generate_ring(1_000, 47.2, 8.8));
    group.throughput(Throughput::Elements(1_000));

    for format in [Format::Wkt, Format::GeoJson, Format::Leaflet] {
        for crs in [EPSG_4326, EPSG_32633] {
            let text = codec.encode(&ring, format, crs).unwrap();
            let id = format!("{format}/{crs}");

            group.bench_function(BenchmarkId::new("encode", &id), |b| {
                b.iter(|| codec.encode(black_box(&ring), format, crs).unwrap());
            });
            group.bench_function(BenchmarkId::new("decode", &id), |b| {
                b.iter(|| codec.decode(black_box(&text), format, crs).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_union_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounds");

    let shapes = generate_shapes(300);
    group.throughput(Throughput::Elements(shapes.len() as u64));
    group.bench_function("union_300_shapes", |b| {
        b.iter(|| union_bounds(black_box(&shapes)).unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_wkb, bench_text_formats, bench_union_bounds);

criterion_main!(benches);
