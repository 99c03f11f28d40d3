//! Repeats biomegen runs from a task list and aggregates their timings.
//!
//! Tasks come from `autorun_tasks.txt`, one per line:
//! `reps:show_rep_times(y|n):save_png(y|n):width height map_resolution
//! island_abundance island_size coastline_smoothing processes output_path`.
//! Every task appends one record to `autorun_results.csv`.

use std::env;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use biomegen_statistics::{percentile, OnlineStatistics};

const TASKS_FILE: &str = "autorun_tasks.txt";
const RESULTS_FILE: &str = "autorun_results.csv";

struct Task {
    reps: usize,
    show_rep_times: bool,
    save_png: bool,
    /// the eight automated-mode arguments, output path last
    args: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {

    if env::var("RUST_LOG").is_err() { env::set_var("RUST_LOG", "info") }
    env_logger::init();

    let tasks = BufReader::new(fs::File::open(TASKS_FILE)?);
    let biomegen = biomegen_binary()?;

    for (line_no, line) in tasks.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let task = match parse_task(&line) {
            Some(task) => task,
            None => {
                warn!("skipping malformed task on line {}: {}", line_no + 1, line);
                continue;
            }
        };
        run_task(&biomegen, &task)?;
    }

    Ok(())
}

/// The biomegen binary sits next to this one
fn biomegen_binary() -> Result<PathBuf, Box<dyn Error>> {
    let exe = env::current_exe()?;
    Ok(exe.parent().map_or_else(|| PathBuf::from("biomegen"), |dir| dir.join("biomegen")))
}

fn parse_task(line: &str) -> Option<Task> {

    let mut fields = line.trim().splitn(4, ':');
    let reps: usize = fields.next()?.parse().ok()?;
    let show_rep_times = fields.next()? == "y";
    let save_png = fields.next()? == "y";
    let args: Vec<String> = fields.next()?.split_whitespace().map(String::from).collect();
    if reps == 0 || args.len() != 8 { return None; }

    Some(Task { reps, show_rep_times, save_png, args })
}

fn run_task(biomegen: &Path, task: &Task) -> Result<(), Box<dyn Error>> {

    println!("Running task {} for {} reps.", task.args.join(" "), task.reps);

    let mut stats = OnlineStatistics::new();
    let mut times: Vec<f64> = Vec::with_capacity(task.reps);

    for rep in 0..task.reps {
        let mut args = task.args.clone();
        if task.save_png {
            args[7] = numbered_output(&task.args[7], rep);
        }
        let output = Command::new(biomegen).args(&args).output()?;
        if !output.status.success() {
            return Err(format!("rep {} failed: {}", rep,
                               String::from_utf8_lossy(&output.stderr).trim()).into());
        }
        let seconds: f64 = String::from_utf8_lossy(&output.stdout).trim().parse()?;
        if task.show_rep_times { println!("rep {}: {:.6}", rep, seconds); }
        stats.accumulate(seconds);
        times.push(seconds);
        if !task.save_png {
            // discard the throwaway image between reps
            let _ = fs::remove_file(&args[7]);
        }
    }

    append_results(task, &stats, &mut times)?;
    info!("task done: mean {:.6} s over {} reps", stats.avg(), task.reps);

    Ok(())
}

/// "file.png" becomes "file0.png", "file1.png", ... so kept reps never clobber each other
fn numbered_output(path: &str, rep: usize) -> String {
    match path.rsplit_once('.') {
        Some((stem, extension)) => format!("{}{}.{}", stem, rep, extension),
        None => format!("{}{}", path, rep),
    }
}

fn append_results(task: &Task, stats: &OnlineStatistics, times: &mut [f64])
                  -> Result<(), Box<dyn Error>> {

    let new_file = !Path::new(RESULTS_FILE).exists();
    let file = OpenOptions::new().create(true).append(true).open(RESULTS_FILE)?;
    // records with fewer than ten reps omit the percentile columns
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    if new_file {
        writer.write_record(["version", "width", "height", "processes", "reps",
                             "mean", "std_dev", "pixels_per_sec",
                             "p5", "p25", "p50", "p75", "p95"])?;
    }

    let width: f64 = task.args[0].parse()?;
    let height: f64 = task.args[1].parse()?;
    let mut record = vec![
        env!("CARGO_PKG_VERSION").to_string(),
        task.args[0].clone(),
        task.args[1].clone(),
        task.args[6].clone(),
        task.reps.to_string(),
        format!("{:.6}", stats.avg()),
        format!("{:.6}", stats.std_dev()),
        format!("{:.1}", width * height / stats.avg()),
    ];
    if task.reps >= 10 {
        times.sort_by(|a, b| a.partial_cmp(b).expect("rep times are finite"));
        for p in [5.0, 25.0, 50.0, 75.0, 95.0] {
            record.push(format!("{:.6}", percentile(times, p)));
        }
    }
    writer.write_record(&record)?;
    writer.flush()?;

    Ok(())
}
