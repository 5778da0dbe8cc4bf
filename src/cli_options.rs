/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Zipgrid.

Zipgrid is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Zipgrid is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Zipgrid. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! Zipgrid generates puzzles and prints them in JSON format, one puzzle per line.
//! The parameters come from the game level, and can be overridden individually.
//!
//! # Examples
//!
//! Generate the puzzle for level 30 with a fixed seed:
//!
//! ```
//! $ zipgrid --level 30 --seed 42
//! {"rows":6,"cols":6,"seed":42,"path":[...],"numbers":[...],"walls":[...],"waypoints":[...]}
//! ```
//!
//! Generate ten 8x8 puzzles and print some statistics:
//!
//! ```
//! $ zipgrid --rows 8 --cols 8 --walls 12 -c 10 -s
//! ```
//!
//! Verify a saved puzzle:
//!
//! ```
//! $ zipgrid --check ~/.local/share/zipgrid
//! ```

use clap::Parser;
use log::debug;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use zipgrid::generator::coordinator::{GenerationError, GenerationRequest, Generator};
use zipgrid::generator::levels::LevelParams;
use zipgrid::generator::puzzle::Puzzle;
use zipgrid::generator::walls::MAX_WALL_DENSITY;
use zipgrid::saver::puzzle::SaverPuzzle;

/// Generate random Zipgrid puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Game level that provides the default parameters
    #[arg(short, long, default_value_t = 1)]
    level: usize,

    /// Number of rows, instead of the level value
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns, instead of the level value
    #[arg(long)]
    cols: Option<usize>,

    /// Highest number, instead of the level value
    #[arg(short = 'x', long)]
    numbers: Option<usize>,

    /// Number of walls, instead of the level value
    #[arg(short, long)]
    walls: Option<usize>,

    /// Number of waypoints, instead of the level value
    #[arg(short = 'p', long)]
    waypoints: Option<usize>,

    /// Maximum number of starting cells to try for the path, instead of the level value
    #[arg(short, long)]
    attempts: Option<usize>,

    /// Maximum share of the internal edges that can be walls
    #[arg(long, default_value_t = MAX_WALL_DENSITY)]
    density: f64,

    /// Seed for the first puzzle. The following puzzles use the next seeds
    #[arg(long)]
    seed: Option<u64>,

    /// Number of puzzles to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Directory where the puzzles are saved
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verify the puzzle saved in the directory instead of generating puzzles
    #[arg(long, conflicts_with = "output")]
    check: Option<PathBuf>,

    /// Print some statistics after generating the puzzles
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    /// Build the request from the level parameters and the overrides.
    fn request(&self) -> GenerationRequest {
        let level: LevelParams = LevelParams::for_level(self.level);
        let rows: usize = self.rows.unwrap_or(level.rows);
        let cols: usize = self.cols.unwrap_or(level.cols);

        // The level values are capped again for the new grid size
        let params: LevelParams = LevelParams::for_grid(self.level, rows, cols);
        debug!("Level parameters: {params:?}");

        let mut request: GenerationRequest = GenerationRequest::from(params);
        request.x_cells = self.numbers.unwrap_or(request.x_cells);
        request.num_walls = self.walls.unwrap_or(request.num_walls);
        request.max_attempts = self.attempts.unwrap_or(request.max_attempts);
        request.num_waypoints = match self.waypoints {
            Some(n) => n,
            None => match rows.checked_mul(cols) {
                Some(num_cells) => request
                    .num_waypoints
                    .min(num_cells.saturating_sub(request.x_cells)),
                None => request.num_waypoints,
            },
        };
        request
    }

    /// Directory where the puzzle number `i` is saved.
    fn output_dir(&self, i: usize) -> Option<PathBuf> {
        let dir: &PathBuf = self.output.as_ref()?;
        if self.count == 1 {
            Some(dir.clone())
        } else {
            Some(dir.join(format!("{i:04}")))
        }
    }
}

/// Parse and process command-line options.
pub fn run() -> ExitCode {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    if let Some(dir) = &args.check {
        return match check(dir) {
            Ok(puzzle) => {
                println!(
                    "{}: valid {}x{} puzzle (seed {}, {} numbers, {} walls, {} waypoints)",
                    dir.display(),
                    puzzle.rows,
                    puzzle.cols,
                    puzzle.seed,
                    puzzle.numbers.len(),
                    puzzle.walls.len(),
                    puzzle.waypoints.len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let request: GenerationRequest = args.request();
    if let Err(e) = request.validate() {
        eprintln!("Error: {e}");
        return ExitCode::from(2);
    }

    let mut generator: Generator = Generator::default().with_max_wall_density(args.density);
    let mut total: Duration = Duration::ZERO;
    let mut max: Duration = Duration::ZERO;
    let mut errors: usize = 0;

    for i in 0..args.count {
        debug!("Iteration {i}");

        let mut r: GenerationRequest = request;
        r.seed = args.seed.map(|s| s.wrapping_add(i as u64));

        let start: Instant = Instant::now();
        let ret: Result<Puzzle, GenerationError> = generator.generate(r);
        let duration: Duration = start.elapsed();
        total += duration;
        max = max.max(duration);

        let puzzle: Puzzle = match ret {
            Ok(p) => p,
            Err(e) => {
                errors += 1;
                eprintln!("Error: {e}");
                continue;
            }
        };

        // The solution path must solve its own puzzle
        if let Err(e) = puzzle.validate() {
            errors += 1;
            eprintln!("Error: the generated puzzle (seed {}) is not solvable: {e}", puzzle.seed);
            continue;
        }

        match serde_json::to_string(&puzzle) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                errors += 1;
                eprintln!("Error: cannot serialize the puzzle: {e}");
                continue;
            }
        }

        if let Some(dir) = args.output_dir(i) {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                errors += 1;
                eprintln!("Error: cannot create {dir:?}: {e}");
                continue;
            }
            if let Err(e) = SaverPuzzle::new(dir).save(&puzzle) {
                errors += 1;
                eprintln!("Error: cannot save the puzzle: {e}");
            }
        }
    }

    // Print some stats
    if args.summary && args.count > 0 {
        eprintln!(
            "
   total time = {:.3}s
 average time = {:.3}s
     max time = {:.3}s
       errors = {}",
            total.as_secs_f64(),
            total.as_secs_f64() / args.count as f64,
            max.as_secs_f64(),
            errors
        );
    }

    if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load and verify the puzzle saved in the directory.
fn check(dir: &Path) -> Result<Puzzle, String> {
    match SaverPuzzle::new(dir.to_path_buf()).load() {
        Ok(Some(puzzle)) => Ok(puzzle),
        Ok(None) => Err(format!("no puzzle saved in {}", dir.display())),
        Err(e) => Err(format!("{}: {e}", dir.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(args: &[&str]) -> GenerationRequest {
        Args::parse_from(args.iter().copied()).request()
    }

    #[test]
    fn test_level_defaults() {
        let r: GenerationRequest = request(&["zipgrid", "--level", "61"]);
        assert_eq!((r.rows, r.cols, r.x_cells, r.num_walls, r.num_waypoints), (6, 6, 9, 4, 1));
        assert_eq!(r.seed, None);
    }

    #[test]
    fn test_smaller_grid() {
        // Level 1 has 5 numbers on a 4x4 grid
        let r: GenerationRequest = request(&["zipgrid", "--rows", "2", "--cols", "2"]);
        assert_eq!((r.rows, r.cols, r.x_cells), (2, 2, 4));
        assert!(r.validate().is_ok());

        let r: GenerationRequest = request(&["zipgrid", "-l", "301", "--rows", "3", "--cols", "3"]);
        assert_eq!((r.x_cells, r.num_walls, r.num_waypoints), (9, 4, 0));
        assert!(r.validate().is_ok());

        let r: GenerationRequest = request(&["zipgrid", "--rows", "1", "--cols", "1"]);
        assert_eq!(r.x_cells, 1);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let r: GenerationRequest = request(&["zipgrid", "-l", "61", "-x", "30", "-w", "2", "-a", "3"]);
        assert_eq!((r.x_cells, r.num_walls, r.max_attempts), (30, 2, 3));

        // Not enough cells left for the level waypoint
        assert_eq!(r.num_waypoints, 1);
        let r: GenerationRequest = request(&["zipgrid", "-l", "61", "-x", "36"]);
        assert_eq!(r.num_waypoints, 0);

        // An explicit value is not capped
        let r: GenerationRequest = request(&["zipgrid", "-l", "61", "-x", "36", "-p", "2"]);
        assert_eq!(r.num_waypoints, 2);

        let r: GenerationRequest = request(&["zipgrid", "--rows", "0"]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_options() {
        let args: Args = Args::parse_from(["zipgrid"]);
        assert_eq!(args.density, MAX_WALL_DENSITY);
        assert_eq!(args.output_dir(0), None);

        let args: Args = Args::parse_from(["zipgrid", "--density", "0.1", "-c", "3", "-o", "out"]);
        assert_eq!(args.density, 0.1);
        assert_eq!(args.output_dir(2), Some(PathBuf::from("out/0002")));

        assert!(Args::try_parse_from(["zipgrid", "--check", "a", "-o", "b"]).is_err());
    }

    #[test]
    fn test_check() {
        let dir: PathBuf = env::temp_dir().join(format!("zipgrid-cli-check-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("temporary directory");

        assert!(check(&dir).is_err());

        let puzzle: Puzzle = Generator::default()
            .generate(request(&["zipgrid", "--seed", "3"]))
            .expect("puzzle");
        SaverPuzzle::new(dir.clone()).save(&puzzle).expect("save");
        assert_eq!(check(&dir), Ok(puzzle));

        std::fs::write(dir.join("puzzle.json"), "{").expect("write");
        assert!(check(&dir).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
