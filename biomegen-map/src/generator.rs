//! The orchestrator: runs the pipeline stage by stage and gathers the report.

use std::path::Path;
use std::time::Instant;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::biomes::generate_biomes;
use crate::coastline::smooth_coastlines;
use crate::errors::MapError;
use crate::image_output::save_png;
use crate::parameters::MapParameters;
use crate::placement::place_seeds;
use crate::progress::{format_elapsed, MapSection, Progress, N_SECTIONS, SECTIONS};
use crate::raster::{draw_pixels, map_pixels};
use crate::sections::assign_sections;
use crate::seeds::{Seed, SeedKind, N_FINAL_KINDS};

/// Timing and distribution numbers of a finished run
#[derive(Clone, Debug)]
pub struct MapReport {
    /// wall-clock seconds of each tracked section, in pipeline order
    pub section_seconds: [f64; N_SECTIONS],
    /// pixels claimed by each of the eleven final tags
    pub type_counts: [u64; N_FINAL_KINDS],
    /// wall-clock seconds of the whole run
    pub total_seconds: f64,
}

impl MapReport {

    /// Lines of the statistics report printed after an interactive run
    pub fn summary_lines(&self) -> Vec<String> {

        let total_pixels: u64 = self.type_counts.iter().sum();
        let mut lines: Vec<String> = Vec::new();

        for section in SECTIONS {
            lines.push(format!("{:<20} {}", section.label(),
                               format_elapsed(self.section_seconds[section as usize])));
        }
        lines.push(String::new());
        for (i, count) in self.type_counts.iter().enumerate() {
            let share = 100.0 * *count as f64 / total_pixels as f64;
            lines.push(format!("{:<14} {:>12}  {:5.1}%",
                               SeedKind::from_final_index(i).name(), count, share));
        }
        lines.push(String::new());
        lines.push(format!("Total                {}", format_elapsed(self.total_seconds)));

        return lines;
    }
}

/// Everything a run produces before the png encoder sees it
pub struct GeneratedMap {
    /// the final seed array
    pub seeds: Vec<Seed>,
    /// row-major grid naming every pixel's nearest seed
    pub pixel_seeds: Vec<u32>,
    /// row-major 8-bit RGB buffer
    pub rgb: Vec<u8>,
    /// the report, with the saving time still zero
    pub report: MapReport,
}

/// Sequences the pipeline over a validated parameter set.
///
/// ```no_run
/// use std::path::Path;
/// use biomegen_map::generator::MapGenerator;
/// use biomegen_map::parameters::MapParameters;
/// use biomegen_map::progress::Progress;
/// let params = MapParameters::validated(1000, 1000, 100, 120, 50, 5, 4).unwrap();
/// let progress = Progress::new();
/// let report = MapGenerator::new(params).run(&progress, Path::new("result.png")).unwrap();
/// println!("{:.6}", report.total_seconds);
/// ```
pub struct MapGenerator {
    params: MapParameters,
}

impl MapGenerator {

    pub fn new(params: MapParameters) -> MapGenerator {
        MapGenerator { params }
    }

    pub fn params(&self) -> &MapParameters { &self.params }

    /// Runs stages 1 through 5 plus the color conversion, leaving only the png write
    pub fn generate(&self, progress: &Progress) -> GeneratedMap {

        let run_start = Instant::now();
        let mut section_seconds = [0.0f64; N_SECTIONS];
        let mut orchestrator_rng = self.orchestrator_rng();

        let start = Instant::now();
        let mut seeds = place_seeds(&self.params, &mut orchestrator_rng, progress);
        section_seconds[MapSection::PlacingSeeds as usize] =
            self.finish(progress, MapSection::PlacingSeeds, start);
        info!("{} seeds placed, {} of each special type",
              seeds.len(), self.params.n_special());

        let start = Instant::now();
        let rngs = self.worker_rngs(MapSection::FillingSections);
        assign_sections(&mut seeds, &self.params, rngs, progress);
        section_seconds[MapSection::FillingSections as usize] =
            self.finish(progress, MapSection::FillingSections, start);

        let start = Instant::now();
        smooth_coastlines(&mut seeds, &self.params, progress);
        section_seconds[MapSection::SmoothingCoastlines as usize] =
            self.finish(progress, MapSection::SmoothingCoastlines, start);

        let start = Instant::now();
        generate_biomes(&mut seeds, &self.params, &mut orchestrator_rng, progress);
        section_seconds[MapSection::GeneratingBiomes as usize] =
            self.finish(progress, MapSection::GeneratingBiomes, start);

        let start = Instant::now();
        let (pixel_seeds, type_counts) = map_pixels(&seeds, &self.params, progress);
        section_seconds[MapSection::MappingPixels as usize] =
            self.finish(progress, MapSection::MappingPixels, start);

        let start = Instant::now();
        let rgb = draw_pixels(&seeds, &pixel_seeds, &self.params, progress);
        section_seconds[MapSection::DrawingPixels as usize] =
            self.finish(progress, MapSection::DrawingPixels, start);

        let report = MapReport {
            section_seconds,
            type_counts,
            total_seconds: run_start.elapsed().as_secs_f64(),
        };

        GeneratedMap { seeds, pixel_seeds, rgb, report }
    }

    /// Generates the map and writes it to `path`; the full pipeline of a run
    pub fn run(&self, progress: &Progress, path: &Path) -> Result<MapReport, MapError> {

        let run_start = Instant::now();
        let mut map = self.generate(progress);

        let start = Instant::now();
        save_png(path, self.params.width, self.params.height, &map.rgb, progress)?;
        map.report.section_seconds[MapSection::SavingImage as usize] =
            self.finish(progress, MapSection::SavingImage, start);

        map.report.total_seconds = run_start.elapsed().as_secs_f64();
        info!("map written to {} in {:.3} s", path.display(), map.report.total_seconds);

        Ok(map.report)
    }

    fn finish(&self, progress: &Progress, section: MapSection, start: Instant) -> f64 {
        let elapsed = start.elapsed();
        progress.finish_section(section, elapsed);
        elapsed.as_secs_f64()
    }

    /// The RNG driving the single-threaded parts: placement and origin tagging
    fn orchestrator_rng(&self) -> SmallRng {
        match self.params.master_seed {
            Some(master) => SmallRng::seed_from_u64(master),
            None => SmallRng::from_entropy(),
        }
    }

    /// One RNG per worker; deterministic in the master seed, the section and the worker index
    fn worker_rngs(&self, section: MapSection) -> Vec<SmallRng> {
        (0..self.params.workers).map(|worker| match self.params.master_seed {
            Some(master) => {
                let stream = (section as u64 + 1)
                    .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    .wrapping_add(worker as u64);
                SmallRng::seed_from_u64(master.wrapping_add(stream))
            }
            None => SmallRng::from_entropy(),
        }).collect()
    }
}
