use std::env;
use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::path::Path;
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::info;

use biomegen_map::parameters::{DEFAULT_COASTLINE_SMOOTHING, DEFAULT_ISLAND_ABUNDANCE,
                               DEFAULT_ISLAND_SIZE, DEFAULT_MAP_RESOLUTION,
                               COASTLINE_SMOOTHING_RANGE, HEIGHT_RANGE, ISLAND_ABUNDANCE_RANGE,
                               ISLAND_SIZE_RANGE, MAP_RESOLUTION_RANGE, PROCESSES_RANGE,
                               WIDTH_RANGE};
use biomegen_map::progress::{run_tracker, Progress, SECTIONS};
use biomegen_map::{MapError, MapGenerator, MapParameters};

#[derive(Parser, Debug)]
#[clap(name = "biomegen", version)]
#[clap(about = "Generates a png map of procedurally placed biomes.", long_about = None)]
struct Args {
    /// automated mode, eight values: width height map_resolution island_abundance
    /// island_size coastline_smoothing processes output_path; no values runs interactive
    #[clap(value_name = "ARGS", num_args = 0..=8)]
    inputs: Vec<String>,
    /// master seed for a deterministic run; omitted, workers seed from OS entropy
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), MapError> {

    if env::var("RUST_LOG").is_err() { env::set_var("RUST_LOG", "info") }
    env_logger::init();
    let args = Args::parse();

    if args.inputs.is_empty() {
        run_interactive(args.seed)
    } else {
        run_automated(&args.inputs, args.seed)
    }
}

/// Automated mode: parse, generate, print the total time as a bare float
fn run_automated(inputs: &[String], seed: Option<u64>) -> Result<(), MapError> {

    if inputs.len() != 8 {
        eprintln!("automated mode takes exactly 8 arguments: width height map_resolution \
                   island_abundance island_size coastline_smoothing processes output_path");
        process::exit(1);
    }

    let mut values = [0usize; 7];
    for (value, input) in values.iter_mut().zip(inputs) {
        *value = match input.parse() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("not an integer: {}", input);
                process::exit(1);
            }
        };
    }
    let mut params = match MapParameters::validated(values[0], values[1], values[2], values[3],
                                                    values[4], values[5], values[6]) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    params.master_seed = seed;

    let progress = Progress::new();
    let report = MapGenerator::new(params).run(&progress, Path::new(&inputs[7]))?;
    println!("{:.6}", report.total_seconds);

    Ok(())
}

/// Interactive mode: prompt for the parameters, run with the terminal tracker
fn run_interactive(seed: Option<u64>) -> Result<(), MapError> {

    let width = prompt_parameter("Width", WIDTH_RANGE, None);
    let height = prompt_parameter("Height", HEIGHT_RANGE, None);
    let map_resolution = prompt_parameter("Map resolution", MAP_RESOLUTION_RANGE,
                                          Some(DEFAULT_MAP_RESOLUTION));
    let island_abundance = prompt_parameter("Island abundance", ISLAND_ABUNDANCE_RANGE,
                                            Some(DEFAULT_ISLAND_ABUNDANCE));
    let island_size = prompt_parameter("Island size (times ten)", ISLAND_SIZE_RANGE,
                                       Some(DEFAULT_ISLAND_SIZE));
    let coastline_smoothing = prompt_parameter("Coastline smoothing", COASTLINE_SMOOTHING_RANGE,
                                               Some(DEFAULT_COASTLINE_SMOOTHING));
    let workers = prompt_parameter("Processes", PROCESSES_RANGE, None);

    let mut params = MapParameters::validated(width, height, map_resolution, island_abundance,
                                              island_size, coastline_smoothing, workers)?;
    params.master_seed = seed;
    info!("generating a {}x{} map with {} seeds on {} workers",
          params.width, params.height, params.n_seeds(), params.workers);

    let progress = Progress::new();
    let generator = MapGenerator::new(params);
    let result = thread::scope(|scope| {
        let tracker = scope.spawn(|| run_tracker(&progress));
        let result = generator.run(&progress, Path::new("result.png"));
        if result.is_err() {
            // release the tracker so the error can surface
            for section in SECTIONS {
                if progress.section_seconds(section).is_none() {
                    progress.finish_section(section, Duration::ZERO);
                }
            }
        }
        tracker.join().expect("the progress tracker panicked");
        result
    });
    let report = result?;

    println!();
    for line in report.summary_lines() {
        println!("{}", line);
    }
    println!("\nMap written to result.png");

    Ok(())
}

/// Asks for one parameter until an in-range integer arrives.
///
/// An empty line picks the default where one exists; end of input aborts the
/// program.
fn prompt_parameter(label: &str, range: RangeInclusive<usize>, default: Option<usize>) -> usize {

    let stdin = io::stdin();
    loop {
        match default {
            Some(d) => print!("{} [{}-{}, default {}]: ", label, range.start(), range.end(), d),
            None => print!("{} [{}-{}]: ", label, range.start(), range.end()),
        }
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                eprintln!("\nno more input; giving up");
                process::exit(1);
            }
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            if let Some(d) = default { return d; }
            continue;
        }
        match line.parse::<usize>() {
            Ok(value) if range.contains(&value) => return value,
            _ => println!("Please enter an integer between {} and {}.",
                          range.start(), range.end()),
        }
    }
}
