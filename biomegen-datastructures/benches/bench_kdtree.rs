use std::time::Instant;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use biomegen_datastructures::kd_tree::{create_kd_tree, find_nearest, find_nearest_k, KdPoint};

fn random_points(n: usize, side: i32, rng: &mut SmallRng) -> Vec<KdPoint> {

    let mut taken = vec![false; (side * side) as usize];
    let mut points: Vec<KdPoint> = Vec::with_capacity(n);
    while points.len() < n {
        let (x, y) = (rng.gen_range(0..side), rng.gen_range(0..side));
        if taken[(y * side + x) as usize] { continue; }
        taken[(y * side + x) as usize] = true;
        points.push(KdPoint::new(x, y, points.len()));
    }

    return points;
}

fn build_large_tree() {

    const N: usize = (2_usize.pow(20) - 1) as usize;
    let mut rng = SmallRng::seed_from_u64(0);
    let mut points = random_points(N, 4096, &mut rng);

    let start = Instant::now();
    let root = create_kd_tree(&mut points).unwrap();
    let end = start.elapsed();

    println!("build_large_tree(): {:.2?}", end);

    let start = Instant::now();
    let mut checksum = 0i64;
    for _ in 0..100_000 {
        let query = (rng.gen_range(0..4096), rng.gen_range(0..4096));
        checksum += find_nearest(&root, query).0;
    }
    let end = start.elapsed();

    println!("100k nearest queries: {:.2?} ({})", end, checksum);

    let start = Instant::now();
    let mut dists = [i64::MAX; 7];
    for _ in 0..10_000 {
        let query = (rng.gen_range(0..4096), rng.gen_range(0..4096));
        dists.fill(i64::MAX);
        find_nearest_k(&root, query, &mut dists);
    }
    let end = start.elapsed();

    println!("10k 7-nearest queries: {:.2?}", end);
}

fn main() {
    build_large_tree();
}
