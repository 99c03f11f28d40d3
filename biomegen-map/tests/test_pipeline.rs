use std::collections::HashSet;

use biomegen_map::biomes::generate_biomes;
use biomegen_map::coastline::smooth_coastlines;
use biomegen_map::parameters::MapParameters;
use biomegen_map::placement::place_seeds;
use biomegen_map::progress::Progress;
use biomegen_map::raster::{draw_pixels, map_pixels};
use biomegen_map::sections::assign_sections;
use biomegen_map::seeds::{Seed, SeedKind};
use biomegen_map::MapGenerator;

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A parameter set for tests; skips validation so tiny scenarios are allowed
fn test_params(width: usize, height: usize, map_resolution: usize, island_abundance: usize,
               coastline_smoothing: usize, workers: usize) -> MapParameters {
    MapParameters {
        width, height, map_resolution, island_abundance,
        island_size_x10: 50, coastline_smoothing, workers,
        master_seed: Some(0),
    }
}

#[test]
fn placement_respects_the_layout_contract() {

    let params = test_params(500, 500, 500, 10, 0, 1);
    let (n, s) = (params.n_seeds(), params.n_special());
    assert_eq!((n, s), (500, 50));

    let progress = Progress::new();
    let mut rng = SmallRng::seed_from_u64(7);
    let seeds = place_seeds(&params, &mut rng, &progress);

    assert_eq!(seeds.len(), n);
    let mut coordinates = HashSet::new();
    for seed in &seeds {
        assert!(seed.x >= 0 && (seed.x as usize) < params.width);
        assert!(seed.y >= 0 && (seed.y as usize) < params.height);
        assert!(coordinates.insert((seed.x, seed.y)), "coordinates must be unique");
    }
    assert!(seeds[..s].iter().all(|d| d.kind == SeedKind::LandOrigin));
    assert!(seeds[s..2 * s].iter().all(|d| d.kind == SeedKind::WaterForced));
    assert!(seeds[2 * s..].iter().all(|d| d.kind == SeedKind::Water));
}

#[test]
fn section_assignment_touches_only_regular_seeds() {

    let params = test_params(500, 500, 500, 10, 0, 4);
    let s = params.n_special();
    let progress = Progress::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut seeds = place_seeds(&params, &mut rng, &progress);

    let rngs: Vec<SmallRng> = (0..params.workers).map(|i| SmallRng::seed_from_u64(i as u64)).collect();
    assign_sections(&mut seeds, &params, rngs, &progress);

    assert!(seeds[..s].iter().all(|d| d.kind == SeedKind::LandOrigin));
    assert!(seeds[s..2 * s].iter().all(|d| d.kind == SeedKind::WaterForced));
    assert!(seeds[2 * s..].iter()
        .all(|d| d.kind == SeedKind::Land || d.kind == SeedKind::Water));
}

#[test]
fn smoothing_with_k_zero_is_a_no_op() {

    let params = test_params(500, 500, 500, 10, 0, 4);
    let progress = Progress::new();
    let mut rng = SmallRng::seed_from_u64(2);
    let mut seeds = place_seeds(&params, &mut rng, &progress);
    let rngs: Vec<SmallRng> = (0..params.workers).map(|i| SmallRng::seed_from_u64(i as u64)).collect();
    assign_sections(&mut seeds, &params, rngs, &progress);

    let before = seeds.clone();
    smooth_coastlines(&mut seeds, &params, &progress);
    assert_eq!(seeds, before);
}

/// One brute-force smoothing pass, the reference for the KD-tree version
fn brute_force_pass(seeds: &mut [Seed], s: usize, k: usize) {

    let snapshot: Vec<Seed> = seeds.to_vec();
    for i in 2 * s..snapshot.len() {
        let seed = snapshot[i];
        let mut land: Vec<i64> = Vec::new();
        let mut water: Vec<i64> = Vec::new();
        for (j, other) in snapshot.iter().enumerate() {
            if j == i { continue; }
            let dx = (seed.x - other.x) as i64;
            let dy = (seed.y - other.y) as i64;
            let d = dx * dx + dy * dy;
            if other.kind.is_land() { land.push(d); } else { water.push(d); }
        }
        if land.is_empty() || water.is_empty() { continue; }
        land.sort();
        water.sort();
        land.resize(k, i64::MAX);
        water.resize(k, i64::MAX);
        let land_sum = land.iter().fold(0i64, |a, d| a.saturating_add(*d));
        let water_sum = water.iter().fold(0i64, |a, d| a.saturating_add(*d));
        let flipped = if seeds[i].kind.is_land() { water_sum < land_sum } else { land_sum < water_sum };
        if flipped {
            seeds[i].kind = if seeds[i].kind.is_land() { SeedKind::Water } else { SeedKind::Land };
        }
    }
}

#[test]
fn smoothing_agrees_with_brute_force() {

    let k = 3;
    let params = test_params(500, 500, 500, 1000, k, 3);
    assert_eq!(params.n_special(), 0);
    let progress = Progress::new();

    // a deterministic checkerboard-ish mix of land and water
    let mut seeds: Vec<Seed> = Vec::new();
    for y in 0..20 {
        for x in 0..20 {
            let kind = if (x * 7 + y * 13) % 5 < 2 { SeedKind::Land } else { SeedKind::Water };
            seeds.push(Seed::new(x * 23 + (y % 3), y * 19, kind));
        }
    }

    let mut expected = seeds.clone();
    brute_force_pass(&mut expected, 0, k);
    brute_force_pass(&mut expected, 0, k);

    smooth_coastlines(&mut seeds, &params, &progress);
    assert_eq!(seeds, expected);
}

#[test]
fn smoothing_tolerates_a_map_without_land() {

    let params = test_params(500, 500, 500, 1000, 5, 2);
    let progress = Progress::new();
    let mut seeds: Vec<Seed> = (0..100)
        .map(|i| Seed::new(i % 10 * 31, i / 10 * 29, SeedKind::Water))
        .collect();
    let before = seeds.clone();
    smooth_coastlines(&mut seeds, &params, &progress);
    assert_eq!(seeds, before);
}

#[test]
fn biome_stage_normalizes_every_tag() {

    let params = test_params(500, 500, 100, 10, 0, 4);
    let progress = Progress::new();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut seeds = place_seeds(&params, &mut rng, &progress);
    let rngs: Vec<SmallRng> = (0..params.workers).map(|i| SmallRng::seed_from_u64(i as u64)).collect();
    assign_sections(&mut seeds, &params, rngs, &progress);

    generate_biomes(&mut seeds, &params, &mut rng, &progress);
    for seed in &seeds {
        assert!(seed.kind.final_index().is_some(),
                "provisional tag {:?} survived the biome stage", seed.kind);
    }
}

#[test]
fn all_water_map_when_no_special_seeds() {

    // island_abundance 1000 on 500 seeds leaves S = 0: a map of water only
    let params = test_params(500, 500, 500, 1000, 0, 1);
    let progress = Progress::new();
    let map = MapGenerator::new(params).generate(&progress);

    let water = SeedKind::Water.final_index().unwrap();
    for (i, count) in map.report.type_counts.iter().enumerate() {
        let expected = if i == water { 500 * 500 } else { 0 };
        assert_eq!(*count, expected);
    }
}

#[test]
fn type_counts_sum_to_the_pixel_count() {

    let params = test_params(500, 500, 500, 10, 2, 4);
    let progress = Progress::new();
    let map = MapGenerator::new(params).generate(&progress);
    assert_eq!(map.report.type_counts.iter().sum::<u64>(), 500 * 500);
}

#[test]
fn fixed_seed_runs_are_bit_identical() {

    let mut params = test_params(500, 500, 100, 120, 5, 4);
    params.master_seed = Some(42);

    let first = MapGenerator::new(params.clone()).generate(&Progress::new());
    let second = MapGenerator::new(params).generate(&Progress::new());

    assert_eq!(first.seeds, second.seeds);
    assert_eq!(first.pixel_seeds, second.pixel_seeds);
    assert_eq!(first.rgb, second.rgb);
}

#[test]
fn pixel_grid_names_the_nearest_seed() {

    let params = test_params(500, 500, 500, 120, 0, 2);
    let progress = Progress::new();
    let map = MapGenerator::new(params).generate(&progress);

    // spot-check a diagonal of pixels against brute force
    for step in 0..100 {
        let (x, y) = (step * 5, step * 5);
        let named = map.pixel_seeds[y * 500 + x] as usize;
        let named_dist = squared(&map.seeds[named], x as i32, y as i32);
        for seed in &map.seeds {
            assert!(squared(seed, x as i32, y as i32) >= named_dist);
        }
    }
}

fn squared(seed: &Seed, x: i32, y: i32) -> i64 {
    let dx = (seed.x - x) as i64;
    let dy = (seed.y - y) as i64;
    dx * dx + dy * dy
}

#[test]
fn single_forest_seed_colors_the_whole_image() {

    // a 2 by 2 raster owned by one forest seed at the origin
    let params = test_params(2, 2, 1, 1000, 0, 1);
    let progress = Progress::new();
    let seeds = vec![Seed::new(0, 0, SeedKind::Forest)];

    let (grid, counts) = map_pixels(&seeds, &params, &progress);
    assert_eq!(grid, vec![0, 0, 0, 0]);
    assert_eq!(counts[SeedKind::Forest.final_index().unwrap()], 4);

    // forest base (0, 128, 0) dithered by (0 mod 20) - 10 and clamped
    let rgb = draw_pixels(&seeds, &grid, &params, &progress);
    assert_eq!(rgb, vec![0, 118, 0, 0, 118, 0, 0, 118, 0, 0, 118, 0]);
}
