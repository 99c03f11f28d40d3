//! Stage 1: seed placement.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::parameters::MapParameters;
use crate::progress::{MapSection, Progress};
use crate::seeds::{Seed, SeedKind};

/// Draws N seeds with unique coordinates and lays them out in the contract order.
///
/// The first S seeds are land-origins, the next S water-forced, the rest plain
/// water. Collisions are rejected against an occupancy grid, so the loop only
/// terminates when N does not exceed the pixel count — which the parameter
/// ranges guarantee (map_resolution ≥ 50).
///
/// Placement runs on the orchestrator thread: coordinate uniqueness wants a
/// single occupancy writer, and the section carries a 1% progress weight.
pub fn place_seeds(params: &MapParameters, rng: &mut SmallRng, progress: &Progress) -> Vec<Seed> {

    let n = params.n_seeds();
    let s = params.n_special();
    progress.set_total(MapSection::PlacingSeeds, n as u64);

    let (width, height) = (params.width as i32, params.height as i32);
    let mut occupied = vec![false; params.n_pixels()];
    let mut seeds: Vec<Seed> = Vec::with_capacity(n);

    while seeds.len() < n {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        let cell = y as usize * params.width + x as usize;
        if occupied[cell] { continue; }
        occupied[cell] = true;

        let kind = if seeds.len() < s {
            SeedKind::LandOrigin
        } else if seeds.len() < 2 * s {
            SeedKind::WaterForced
        } else {
            SeedKind::Water
        };
        seeds.push(Seed::new(x, y, kind));
        progress.add(MapSection::PlacingSeeds, 1);
    }

    return seeds;
}
