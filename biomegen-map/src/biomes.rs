//! Stage 4: biome assignment.
//!
//! Water seeds pick their subtype from the distance to the nearest land seed
//! and the distance to the equator. Land seeds inherit the biome of their
//! nearest biome-origin — the first ⌊N/10⌋ land seeds in index order, each of
//! which samples its own biome from a latitude-banded probability table.
//! After this stage every seed carries one of the eleven final tags.

use std::thread;

use biomegen_datastructures::kd_tree::{create_kd_tree, find_nearest, KdPoint};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::parameters::MapParameters;
use crate::progress::{MapSection, Progress};
use crate::seeds::{partition_mut, Seed, SeedKind};

/// Ten biome tags per equator band; a land origin samples its row uniformly.
///
/// Band 0 hugs the equator (jungle and desert country), band 9 the poles.
const BAND_TABLE: [[SeedKind; 10]; 10] = {
    use SeedKind::{Desert as D, Forest as F, Jungle as J, Plains as P, Rock as R,
                   Snow as S, Taiga as T};
    [
        [R, D, D, D, J, J, J, F, F, P],
        [R, D, D, D, J, J, F, F, P, P],
        [R, D, D, J, F, F, F, P, P, P],
        [R, D, J, F, F, F, P, P, P, P],
        [R, D, F, F, F, F, P, P, P, P],
        [R, F, F, F, F, F, P, P, P, P],
        [R, T, F, F, F, F, F, P, P, P],
        [R, S, S, T, T, F, F, F, P, P],
        [S, S, S, S, T, T, T, T, T, F],
        [S, S, S, S, S, S, S, S, S, S],
    ]
};

/// Distance from the equator scaled to [0, 10]
fn equator_distance(y: i32, height: usize) -> f64 {
    (y as f64 - height as f64 / 2.0).abs() / height as f64 * 20.0
}

/// The band a row of the image falls into, 0 at the equator through 9 at the poles
fn equator_band(y: i32, height: usize) -> usize {
    (equator_distance(y, height) as usize).min(9)
}

/// Assigns a final biome tag to every seed.
///
/// Biome-origins are tagged up front on the orchestrator thread (every worker
/// must see them); the fan-out then classifies water seeds and copies origin
/// biomes onto the remaining land seeds.
pub fn generate_biomes(seeds: &mut [Seed], params: &MapParameters, rng: &mut SmallRng,
                       progress: &Progress) {

    progress.set_total(MapSection::GeneratingBiomes, seeds.len() as u64);
    let height = params.height;

    // land coordinates are snapshotted before origin tags overwrite the land markers
    let mut land_points: Vec<KdPoint> = Vec::new();
    let mut land_indices: Vec<usize> = Vec::new();
    for (i, seed) in seeds.iter().enumerate() {
        if seed.kind.is_land() {
            land_points.push(KdPoint::new(seed.x, seed.y, i));
            land_indices.push(i);
        }
    }

    let n_origins = (seeds.len() / 10).min(land_indices.len());
    let mut origin_points: Vec<KdPoint> = Vec::with_capacity(n_origins);
    let mut origin_kinds: Vec<SeedKind> = Vec::with_capacity(n_origins);
    for (o, index) in land_indices[..n_origins].iter().enumerate() {
        let seed = &mut seeds[*index];
        let band = equator_band(seed.y, height);
        seed.kind = BAND_TABLE[band][rng.gen_range(0..10)];
        origin_points.push(KdPoint::new(seed.x, seed.y, o));
        origin_kinds.push(seed.kind);
    }

    let land_tree = create_kd_tree(&mut land_points);
    let origin_tree = create_kd_tree(&mut origin_points);

    thread::scope(|scope| {
        for chunk in partition_mut(seeds, params.workers) {
            let (land_tree, origin_tree, origin_kinds) = (&land_tree, &origin_tree, &origin_kinds);
            scope.spawn(move || {
                for seed in chunk.iter_mut() {
                    match seed.kind {
                        SeedKind::Water | SeedKind::WaterForced => {
                            seed.kind = match land_tree {
                                Some(tree) => {
                                    let (land_squared, _) = find_nearest(tree, (seed.x, seed.y));
                                    water_biome(land_squared, equator_distance(seed.y, height))
                                }
                                // a map with no land keeps its water plain
                                None => SeedKind::Water,
                            };
                        }
                        SeedKind::Land | SeedKind::LandOrigin => {
                            // every origin is already final, so a land tag here means a non-origin
                            if let Some(tree) = origin_tree {
                                let (_, origin) = find_nearest(tree, (seed.x, seed.y));
                                seed.kind = origin_kinds[origin];
                            }
                        }
                        // biome-origins were tagged before the fan-out
                        _ => {}
                    }
                    progress.add(MapSection::GeneratingBiomes, 1);
                }
            });
        }
    });
}

/// The water subtype for a seed at a given squared land distance and equator distance
fn water_biome(land_squared: i64, equator: f64) -> SeedKind {

    if (land_squared < 35 * 35 && equator > 9.0)
        || (land_squared < 25 * 25 && equator > 8.0)
        || (land_squared < 15 * 15 && equator > 7.0) {
        SeedKind::Ice
    } else if land_squared < 18 * 18 {
        SeedKind::ShallowWater
    } else if land_squared >= 35 * 35 {
        SeedKind::DeepWater
    } else {
        SeedKind::Water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_bands_cover_the_image() {
        // center of a 1000-row image sits in band 0, the poles in band 9
        assert_eq!(equator_band(500, 1000), 0);
        assert_eq!(equator_band(0, 1000), 9);
        assert_eq!(equator_band(999, 1000), 9);
        assert_eq!(equator_band(750, 1000), 5);
    }

    #[test]
    fn water_rules_apply_in_order() {
        // close to land near the pole: ice wins over shallow
        assert_eq!(water_biome(10 * 10, 9.5), SeedKind::Ice);
        // close to land at the equator: shallow
        assert_eq!(water_biome(10 * 10, 0.0), SeedKind::ShallowWater);
        // far from everything: deep
        assert_eq!(water_biome(40 * 40, 0.0), SeedKind::DeepWater);
        // the in-between stays plain water
        assert_eq!(water_biome(20 * 20, 0.0), SeedKind::Water);
        // near-pole but only moderately close to land still ices
        assert_eq!(water_biome(30 * 30, 9.5), SeedKind::Ice);
        assert_eq!(water_biome(30 * 30, 8.5), SeedKind::Water);
    }
}
