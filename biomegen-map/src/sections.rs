//! Stage 2: land/water assignment for the regular seeds.

use std::thread;

use biomegen_datastructures::kd_tree::{create_kd_tree, find_nearest, KdPoint};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::parameters::MapParameters;
use crate::progress::{MapSection, Progress};
use crate::seeds::{partition_mut, Seed, SeedKind};

/// Decides land versus water for every regular seed.
///
/// Each regular seed queries the nearest land-origin; the distance (square
/// rooted here, and normalized by √map_resolution) is compared against a
/// per-origin threshold t = ((i mod 20) / 19 · 1.5 + 0.25) · island_size.
/// Within the threshold the seed turns land with probability 9/10, beyond it
/// 1/10. Cycling the threshold over twenty origin personalities varies the
/// island sizes across the map.
///
/// With S = 0 there are no origins and every regular seed stays water.
pub fn assign_sections(seeds: &mut [Seed], params: &MapParameters, rngs: Vec<SmallRng>,
                       progress: &Progress) {

    let s = params.n_special();
    let n_regular = seeds.len() - 2 * s;
    progress.set_total(MapSection::FillingSections, n_regular as u64);

    let mut origin_points: Vec<KdPoint> = seeds[..s].iter().enumerate()
        .map(|(i, seed)| KdPoint::new(seed.x, seed.y, i))
        .collect();
    let origin_tree = match create_kd_tree(&mut origin_points) {
        Some(tree) => tree,
        None => return,
    };

    let island_size = params.island_size();
    let inv_sqrt_resolution = 1.0 / (params.map_resolution as f64).sqrt();

    thread::scope(|scope| {
        let chunks = partition_mut(&mut seeds[2 * s..], params.workers);
        for (chunk, mut rng) in chunks.into_iter().zip(rngs) {
            let origin_tree = &origin_tree;
            scope.spawn(move || {
                for seed in chunk.iter_mut() {
                    let (squared, origin_index) = find_nearest(origin_tree, (seed.x, seed.y));
                    let distance = (squared as f64).sqrt() * inv_sqrt_resolution;
                    let threshold = ((origin_index % 20) as f64 / 19.0 * 1.5 + 0.25) * island_size;
                    let chance = if distance <= threshold { 9 } else { 1 };
                    if rng.gen_range(0..10) < chance {
                        seed.kind = SeedKind::Land;
                    }
                    progress.add(MapSection::FillingSections, 1);
                }
            });
        }
    });
}
