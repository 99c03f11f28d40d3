//! Seed points, their tags, and the partitioning of the shared seed array.
//!
//! All stages of the pipeline mutate a single `Vec<Seed>` in place. The array
//! layout is a contract: indices [0, S) hold land-origin seeds, [S, 2S)
//! water-forced seeds, and [2S, N) the regular seeds. Work inside a stage is
//! split into consecutive index ranges, one per worker; handing each worker a
//! disjoint `&mut` chunk makes the no-two-writers rule a compile-time fact
//! rather than a convention.

use std::ops::Range;

/// The tag a seed carries as it moves through the pipeline.
///
/// `LandOrigin` and `WaterForced` are provisional tags that survive until the
/// biome stage normalizes them; `Land` exists only between section assignment
/// and biome assignment. The remaining eleven variants are the final tags a
/// finished map is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedKind {
    /// anchors an island's probable location
    LandOrigin,
    /// locked to water, enabling inland lakes
    WaterForced,
    /// plain water; both a provisional and a final tag
    Water,
    /// land awaiting a biome
    Land,
    Ice,
    ShallowWater,
    DeepWater,
    Rock,
    Desert,
    Jungle,
    Forest,
    Plains,
    Taiga,
    Snow,
}

/// How many final tags a finished map distinguishes
pub const N_FINAL_KINDS: usize = 11;

impl SeedKind {

    /// True for every land-tagged seed, the origin seeds included
    pub fn is_land(self) -> bool {
        matches!(self, SeedKind::LandOrigin | SeedKind::Land)
    }

    /// True for every water-tagged seed, the forced seeds included
    pub fn is_water(self) -> bool {
        matches!(self, SeedKind::WaterForced | SeedKind::Water)
    }

    /// Position of a final tag in the type-count table, None for provisional tags
    pub fn final_index(self) -> Option<usize> {
        match self {
            SeedKind::Ice => Some(0),
            SeedKind::ShallowWater => Some(1),
            SeedKind::Water => Some(2),
            SeedKind::DeepWater => Some(3),
            SeedKind::Rock => Some(4),
            SeedKind::Desert => Some(5),
            SeedKind::Jungle => Some(6),
            SeedKind::Forest => Some(7),
            SeedKind::Plains => Some(8),
            SeedKind::Taiga => Some(9),
            SeedKind::Snow => Some(10),
            _ => None,
        }
    }

    /// Final tag sitting at a given position of the type-count table
    pub fn from_final_index(index: usize) -> SeedKind {
        match index {
            0 => SeedKind::Ice,
            1 => SeedKind::ShallowWater,
            2 => SeedKind::Water,
            3 => SeedKind::DeepWater,
            4 => SeedKind::Rock,
            5 => SeedKind::Desert,
            6 => SeedKind::Jungle,
            7 => SeedKind::Forest,
            8 => SeedKind::Plains,
            9 => SeedKind::Taiga,
            10 => SeedKind::Snow,
            _ => panic!("not a final tag index: {}", index),
        }
    }

    /// Human-readable tag name for the statistics report
    pub fn name(self) -> &'static str {
        match self {
            SeedKind::LandOrigin => "Land Origin",
            SeedKind::WaterForced => "Water Forced",
            SeedKind::Water => "Water",
            SeedKind::Land => "Land",
            SeedKind::Ice => "Ice",
            SeedKind::ShallowWater => "Shallow Water",
            SeedKind::DeepWater => "Deep Water",
            SeedKind::Rock => "Rock",
            SeedKind::Desert => "Desert",
            SeedKind::Jungle => "Jungle",
            SeedKind::Forest => "Forest",
            SeedKind::Plains => "Plains",
            SeedKind::Taiga => "Taiga",
            SeedKind::Snow => "Snow",
        }
    }
}

/// One of the N generator points; each pixel is colored by its nearest seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed {
    pub x: i32,
    pub y: i32,
    pub kind: SeedKind,
}

impl Seed {
    pub fn new(x: i32, y: i32, kind: SeedKind) -> Seed { Seed { x, y, kind } }
}

/// Splits `len` work items into consecutive ranges, one per worker.
///
/// Every worker but the last owns ⌊len/workers⌋ items; the last takes the
/// remainder. Ranges may be empty when there are fewer items than workers.
///
/// # Examples
/// ```
/// use biomegen_map::seeds::partition_ranges;
/// let ranges = partition_ranges(10, 4);
/// assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..10]);
/// ```
pub fn partition_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {

    let chunk = len / workers;
    let mut ranges: Vec<Range<usize>> = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = i * chunk;
        let end = if i == workers - 1 { len } else { (i + 1) * chunk };
        ranges.push(start..end);
    }

    return ranges;
}

/// Splits a slice into disjoint mutable chunks following [`partition_ranges()`](partition_ranges())
pub fn partition_mut<T>(data: &mut [T], workers: usize) -> Vec<&mut [T]> {

    let chunk = data.len() / workers;
    let mut chunks: Vec<&mut [T]> = Vec::with_capacity(workers);
    let mut rest = data;
    for _ in 0..workers - 1 {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(chunk);
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);

    return chunks;
}
