//! Stage 3: coastline smoothing.

use std::thread;

use biomegen_datastructures::kd_tree::{create_kd_tree, find_nearest_k, KdPoint, KdTreeNode};

use crate::parameters::MapParameters;
use crate::progress::{MapSection, Progress};
use crate::seeds::{partition_mut, Seed, SeedKind};

/// Reclassifies regular seeds whose neighborhood belongs to the other side.
///
/// For every regular seed the k nearest same-type and k nearest opposite-type
/// seeds are collected from two KD-trees (land-origins count as land,
/// water-forced as water); whichever side has the smaller sum of squared
/// distances claims the seed. The step runs twice: reclassifications of the
/// first pass feed the trees of the second, and a barrier separates the
/// passes. With k = 0 the stage is a no-op.
///
/// When one side has no seeds at all, no tree exists for it and the decision
/// falls through, leaving the seed as it was. When a side has fewer than k
/// seeds the unfilled sentinel distances stay in the sum (saturating, so the
/// sparse side always loses).
pub fn smooth_coastlines(seeds: &mut [Seed], params: &MapParameters, progress: &Progress) {

    let k = params.coastline_smoothing;
    let s = params.n_special();
    let n_regular = seeds.len() - 2 * s;
    progress.set_total(MapSection::SmoothingCoastlines, 2 * n_regular as u64);
    if k == 0 { return; }

    for _pass in 0..2 {
        smoothing_pass(seeds, s, k, params.workers, progress);
        // thread::scope joining inside smoothing_pass is the barrier between passes
    }
}

fn smoothing_pass(seeds: &mut [Seed], s: usize, k: usize, workers: usize, progress: &Progress) {

    // both trees snapshot the seed state at the start of this pass
    let mut land_points: Vec<KdPoint> = Vec::new();
    let mut water_points: Vec<KdPoint> = Vec::new();
    for (i, seed) in seeds.iter().enumerate() {
        if seed.kind.is_land() {
            land_points.push(KdPoint::new(seed.x, seed.y, i));
        } else {
            water_points.push(KdPoint::new(seed.x, seed.y, i));
        }
    }
    let land_tree = create_kd_tree(&mut land_points);
    let water_tree = create_kd_tree(&mut water_points);

    thread::scope(|scope| {
        for chunk in partition_mut(&mut seeds[2 * s..], workers) {
            let (land_tree, water_tree) = (&land_tree, &water_tree);
            scope.spawn(move || {
                let mut same_dists = vec![i64::MAX; k];
                let mut other_dists = vec![i64::MAX; k];
                for seed in chunk.iter_mut() {
                    reclassify(seed, land_tree, water_tree, &mut same_dists, &mut other_dists);
                    progress.add(MapSection::SmoothingCoastlines, 1);
                }
            });
        }
    });
}

fn reclassify(seed: &mut Seed, land_tree: &Option<Box<KdTreeNode>>,
              water_tree: &Option<Box<KdTreeNode>>,
              same_dists: &mut [i64], other_dists: &mut [i64]) {

    let (same_tree, other_tree) = if seed.kind.is_land() {
        (land_tree, water_tree)
    } else {
        (water_tree, land_tree)
    };
    let (Some(same_tree), Some(other_tree)) = (same_tree, other_tree) else { return; };

    same_dists.fill(i64::MAX);
    other_dists.fill(i64::MAX);
    // the self-distance of zero is skipped by the query itself
    find_nearest_k(same_tree, (seed.x, seed.y), same_dists);
    find_nearest_k(other_tree, (seed.x, seed.y), other_dists);

    let same_sum = saturating_sum(same_dists);
    let other_sum = saturating_sum(other_dists);
    if other_sum < same_sum {
        seed.kind = if seed.kind.is_land() { SeedKind::Water } else { SeedKind::Land };
    }
}

fn saturating_sum(dists: &[i64]) -> i64 {
    dists.iter().fold(0i64, |acc, d| acc.saturating_add(*d))
}
