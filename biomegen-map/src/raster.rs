//! Stage 5: rasterization — every pixel finds its nearest seed.
//!
//! The pixel grid is a Voronoi diagram over the seed set, computed with
//! nearest-1 KD-tree queries. Workers own disjoint bands of rows; inside a row
//! the previous pixel's distance seeds the next query's search bound (moving
//! one pixel right moves the nearest seed by at most one, and the integer
//! square root keeps the bound safely above the truth). Dropping the bound
//! changes nothing but the run time.

use std::thread;

use biomegen_datastructures::kd_tree::{create_kd_tree, find_nearest, find_nearest_bounded,
                                       KdPoint, KdTreeNode};

use crate::parameters::MapParameters;
use crate::progress::{MapSection, Progress};
use crate::seeds::{Seed, SeedKind, N_FINAL_KINDS};

/// Base color of every final tag
pub fn base_color(kind: SeedKind) -> [u8; 3] {
    match kind {
        SeedKind::Ice => [153, 221, 255],
        SeedKind::ShallowWater => [0, 0, 255],
        SeedKind::Water => [0, 0, 179],
        SeedKind::DeepWater => [0, 0, 128],
        SeedKind::Rock => [128, 128, 128],
        SeedKind::Desert => [255, 185, 109],
        SeedKind::Jungle => [0, 77, 0],
        SeedKind::Forest => [0, 128, 0],
        SeedKind::Plains => [0, 179, 0],
        SeedKind::Taiga => [152, 251, 152],
        SeedKind::Snow => [245, 245, 245],
        other => panic!("{:?} has no color; the biome stage must run first", other),
    }
}

/// The color of one seed's region: the base color of its tag, every channel
/// offset by (seed index mod 20) − 10. All pixels of a region share the
/// offset, so regions of the same biome still read as distinct patches.
pub fn seed_color(kind: SeedKind, seed_index: usize) -> [u8; 3] {

    let offset = (seed_index % 20) as i32 - 10;
    let base = base_color(kind);

    [
        (base[0] as i32 + offset).clamp(0, 255) as u8,
        (base[1] as i32 + offset).clamp(0, 255) as u8,
        (base[2] as i32 + offset).clamp(0, 255) as u8,
    ]
}

/// Maps every pixel to the index of its nearest seed.
///
/// Returns the row-major pixel grid together with the per-tag pixel tallies
/// (how many pixels each of the eleven final tags claimed). The tallies are
/// accumulated per worker and summed after the join.
pub fn map_pixels(seeds: &[Seed], params: &MapParameters, progress: &Progress)
                  -> (Vec<u32>, [u64; N_FINAL_KINDS]) {

    let (width, height) = (params.width, params.height);
    progress.set_total(MapSection::MappingPixels, height as u64);

    let mut points: Vec<KdPoint> = seeds.iter().enumerate()
        .map(|(i, seed)| KdPoint::new(seed.x, seed.y, i))
        .collect();
    let tree = create_kd_tree(&mut points).expect("rasterizing a map with no seeds");

    let mut grid = vec![0u32; width * height];
    let mut counts = [0u64; N_FINAL_KINDS];

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(params.workers);
        for (first_row, band) in row_bands(&mut grid, width, height, params.workers) {
            let tree = &tree;
            handles.push(scope.spawn(move || {
                map_band(seeds, tree, band, first_row, width, progress)
            }));
        }
        for handle in handles {
            let worker_counts = handle.join().expect("rasterizer worker panicked");
            for (total, part) in counts.iter_mut().zip(worker_counts) {
                *total += part;
            }
        }
    });

    return (grid, counts);
}

/// Splits the grid into per-worker bands of whole rows; returns (first row, band) pairs
fn row_bands<'a>(grid: &'a mut [u32], width: usize, height: usize, workers: usize)
                 -> Vec<(usize, &'a mut [u32])> {

    let ranges = crate::seeds::partition_ranges(height, workers);
    let mut bands: Vec<(usize, &'a mut [u32])> = Vec::with_capacity(workers);
    let mut rest = grid;
    for range in ranges {
        let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
        bands.push((range.start, band));
        rest = tail;
    }

    return bands;
}

fn map_band(seeds: &[Seed], tree: &KdTreeNode, band: &mut [u32], first_row: usize,
            width: usize, progress: &Progress) -> [u64; N_FINAL_KINDS] {

    let mut counts = [0u64; N_FINAL_KINDS];
    for (row, cells) in band.chunks_mut(width).enumerate() {
        let y = (first_row + row) as i32;
        let mut previous: Option<i64> = None;
        for (x, cell) in cells.iter_mut().enumerate() {
            let query = (x as i32, y);
            let (squared, index) = match previous {
                Some(before) => {
                    let bound = (integer_sqrt(before) + 2).pow(2);
                    // the bound always contains the true nearest, but stays a fallback
                    find_nearest_bounded(tree, query, bound)
                        .unwrap_or_else(|| find_nearest(tree, query))
                }
                None => find_nearest(tree, query),
            };
            *cell = index as u32;
            previous = Some(squared);
            let tag = seeds[index].kind.final_index()
                .expect("a provisional tag survived into rasterization");
            counts[tag] += 1;
        }
        progress.add(MapSection::MappingPixels, 1);
    }

    return counts;
}

/// Largest r with r² ≤ d
fn integer_sqrt(d: i64) -> i64 {

    let mut r = (d as f64).sqrt() as i64;
    while r > 0 && r * r > d { r -= 1; }
    while (r + 1) * (r + 1) <= d { r += 1; }

    return r;
}

/// Converts the pixel grid into an RGB buffer, one color per seed region.
pub fn draw_pixels(seeds: &[Seed], grid: &[u32], params: &MapParameters, progress: &Progress)
                   -> Vec<u8> {

    let (width, height) = (params.width, params.height);
    progress.set_total(MapSection::DrawingPixels, height as u64);

    // one color per seed, computed once
    let colors: Vec<[u8; 3]> = seeds.iter().enumerate()
        .map(|(i, seed)| seed_color(seed.kind, i))
        .collect();

    let mut rgb = vec![0u8; width * height * 3];

    thread::scope(|scope| {
        let row_ranges = crate::seeds::partition_ranges(height, params.workers);
        let mut rest: &mut [u8] = &mut rgb;
        for range in row_ranges {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width * 3);
            rest = tail;
            let (colors, grid) = (&colors, grid);
            scope.spawn(move || {
                for (row, out) in band.chunks_mut(width * 3).enumerate() {
                    let y = range.start + row;
                    let cells = &grid[y * width..(y + 1) * width];
                    for (cell, pixel) in cells.iter().zip(out.chunks_mut(3)) {
                        pixel.copy_from_slice(&colors[*cell as usize]);
                    }
                    progress.add(MapSection::DrawingPixels, 1);
                }
            });
        }
    });

    return rgb;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_sqrt_is_a_floor() {
        for d in [0i64, 1, 2, 3, 4, 8, 9, 15, 16, 1_000_000, 999_999] {
            let r = integer_sqrt(d);
            assert!(r * r <= d);
            assert!((r + 1) * (r + 1) > d);
        }
    }

    #[test]
    fn dither_offset_clamps() {
        // index 0 gives offset -10; channels at 0 stay 0
        assert_eq!(seed_color(SeedKind::Forest, 0), [0, 118, 0]);
        // index 19 gives offset +9; channels at 255 stay 255
        assert_eq!(seed_color(SeedKind::Desert, 19), [255, 194, 118]);
        // offset 0 keeps the base color
        assert_eq!(seed_color(SeedKind::Water, 10), [0, 0, 179]);
    }
}
