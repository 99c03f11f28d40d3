//! Lock-free progress accounting and the terminal tracker.
//!
//! The pipeline reports its advancement through seven sections, each backed by
//! an atomic counter/total pair. Workers increment the counters; the tracker
//! thread only ever loads them, weights the per-section fractions into an
//! overall percentage and redraws the terminal about ten times a second. In
//! automated mode no tracker runs and the counters simply go unread.

use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const ANSI_GREEN: &str = "\u{1b}[38;5;2m";
const ANSI_BLUE: &str = "\u{1b}[38;5;4m";
const ANSI_RESET: &str = "\u{1b}[0m";

const BAR_WIDTH: usize = 40;
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// The seven tracked sections of a map generation run, in pipeline order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSection {
    PlacingSeeds = 0,
    FillingSections = 1,
    SmoothingCoastlines = 2,
    GeneratingBiomes = 3,
    MappingPixels = 4,
    DrawingPixels = 5,
    SavingImage = 6,
}

/// Number of tracked sections
pub const N_SECTIONS: usize = 7;

/// All sections in pipeline order
pub const SECTIONS: [MapSection; N_SECTIONS] = [
    MapSection::PlacingSeeds,
    MapSection::FillingSections,
    MapSection::SmoothingCoastlines,
    MapSection::GeneratingBiomes,
    MapSection::MappingPixels,
    MapSection::DrawingPixels,
    MapSection::SavingImage,
];

impl MapSection {

    pub fn label(self) -> &'static str {
        match self {
            MapSection::PlacingSeeds => "Placing seeds",
            MapSection::FillingSections => "Filling sections",
            MapSection::SmoothingCoastlines => "Smoothing coastlines",
            MapSection::GeneratingBiomes => "Generating biomes",
            MapSection::MappingPixels => "Mapping pixels",
            MapSection::DrawingPixels => "Drawing pixels",
            MapSection::SavingImage => "Saving image",
        }
    }

    /// Share of the total run this section is worth on the progress display
    pub fn weight(self) -> f64 {
        match self {
            MapSection::PlacingSeeds => 0.01,
            MapSection::FillingSections => 0.01,
            MapSection::SmoothingCoastlines => 0.02,
            MapSection::GeneratingBiomes => 0.06,
            MapSection::MappingPixels => 0.60,
            MapSection::DrawingPixels => 0.10,
            MapSection::SavingImage => 0.20,
        }
    }
}

#[derive(Default)]
struct SectionState {
    completed: AtomicU64,
    total: AtomicU64,
    elapsed_micros: AtomicU64,
    finished: AtomicBool,
}

/// Shared progress state of one generation run.
///
/// Workers write through [`add()`](Progress::add()); the orchestrator owns
/// [`set_total()`](Progress::set_total()) and [`finish_section()`](Progress::finish_section()); the tracker thread
/// only reads.
pub struct Progress {
    sections: [SectionState; N_SECTIONS],
    started: Instant,
}

impl Default for Progress {
    fn default() -> Self { Progress::new() }
}

impl Progress {

    pub fn new() -> Progress {
        Progress { sections: Default::default(), started: Instant::now() }
    }

    /// Announces how many work items a section consists of
    pub fn set_total(&self, section: MapSection, total: u64) {
        self.sections[section as usize].total.store(total, Ordering::Release);
    }

    /// Records `n` finished work items of a section
    pub fn add(&self, section: MapSection, n: u64) {
        self.sections[section as usize].completed.fetch_add(n, Ordering::Release);
    }

    /// Marks a section complete and publishes its wall-clock time
    pub fn finish_section(&self, section: MapSection, elapsed: Duration) {
        let state = &self.sections[section as usize];
        state.elapsed_micros.store(elapsed.as_micros() as u64, Ordering::Release);
        state.finished.store(true, Ordering::Release);
    }

    /// Fraction of a section done so far, in [0, 1]
    pub fn fraction(&self, section: MapSection) -> f64 {
        let state = &self.sections[section as usize];
        if state.finished.load(Ordering::Acquire) { return 1.0; }
        let total = state.total.load(Ordering::Acquire);
        if total == 0 { return 0.0; }
        (state.completed.load(Ordering::Acquire) as f64 / total as f64).min(1.0)
    }

    /// Weighted overall fraction across all sections, in [0, 1]
    pub fn overall(&self) -> f64 {
        SECTIONS.iter().map(|s| s.weight() * self.fraction(*s)).sum()
    }

    /// Wall-clock seconds of a completed section, None while it still runs
    pub fn section_seconds(&self, section: MapSection) -> Option<f64> {
        let state = &self.sections[section as usize];
        if !state.finished.load(Ordering::Acquire) { return None; }
        Some(state.elapsed_micros.load(Ordering::Acquire) as f64 / 1e6)
    }

    pub fn all_finished(&self) -> bool {
        self.sections.iter().all(|s| s.finished.load(Ordering::Acquire))
    }

    /// Seconds since this progress record was created
    pub fn seconds_since_start(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Formats seconds as MM:SS.ssssss
pub fn format_elapsed(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!("{:02}:{:09.6}", minutes as u64, rest)
}

/// Redraws the progress display until every section reports complete.
///
/// Run this on its own thread; it reads the atomic counters roughly ten times
/// a second and never writes them.
pub fn run_tracker(progress: &Progress) {

    let mut first_frame = true;
    loop {
        let finished = progress.all_finished();
        draw_frame(progress, first_frame);
        first_frame = false;
        if finished { break; }
        thread::sleep(REDRAW_INTERVAL);
    }
}

fn draw_frame(progress: &Progress, first_frame: bool) {

    let mut out = String::new();
    if !first_frame {
        // move back to the top of the block drawn by the previous frame
        out.push_str(&format!("\u{1b}[{}A\r", N_SECTIONS + 1));
    }

    for section in SECTIONS {
        let fraction = progress.fraction(section);
        let time = match progress.section_seconds(section) {
            Some(seconds) => format_elapsed(seconds),
            None => String::new(),
        };
        out.push_str(&render_bar(section.label(), fraction, &time));
        out.push('\n');
    }
    let total = format_elapsed(progress.seconds_since_start());
    out.push_str(&render_bar("Total", progress.overall(), &total));
    out.push('\n');

    print!("{}", out);
    let _ = stdout().flush();
}

fn render_bar(label: &str, fraction: f64, time: &str) -> String {

    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    let color = if fraction >= 1.0 { ANSI_GREEN } else { ANSI_BLUE };
    let bar: String = std::iter::repeat('#').take(filled)
        .chain(std::iter::repeat('.').take(BAR_WIDTH - filled))
        .collect();

    format!("{:<20} {}[{}]{} {:5.1}%  {}\u{1b}[K",
            label, color, bar, ANSI_RESET, fraction * 100.0, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0.0), "00:00.000000");
        assert_eq!(format_elapsed(83.5), "01:23.500000");
        assert_eq!(format_elapsed(600.000001), "10:00.000001");
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = SECTIONS.iter().map(|s| s.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fractions_and_overall() {
        let progress = Progress::new();
        assert_eq!(progress.overall(), 0.0);

        progress.set_total(MapSection::MappingPixels, 100);
        progress.add(MapSection::MappingPixels, 50);
        assert!((progress.fraction(MapSection::MappingPixels) - 0.5).abs() < 1e-12);
        assert!((progress.overall() - 0.30).abs() < 1e-12);

        for section in SECTIONS {
            progress.finish_section(section, Duration::from_micros(1500));
        }
        assert!(progress.all_finished());
        assert_eq!(progress.section_seconds(MapSection::PlacingSeeds), Some(0.0015));
        assert!((progress.overall() - 1.0).abs() < 1e-12);
    }
}
