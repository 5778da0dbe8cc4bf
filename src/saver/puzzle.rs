/*
puzzle.rs

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

//! Save and restore a generated puzzle.
//!
//! The puzzle and its solution path are stored in JSON format, in the `puzzle.json` file of the
//! provided directory.
//! The file can be edited by hand, so a loaded puzzle goes through [`Puzzle::validate`]: a wall
//! on the solution, a broken path, or misplaced numbers are reported as errors instead of
//! producing an unsolvable game.

use log::{debug, warn};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::generator::puzzle::Puzzle;

/// Object to save and load a puzzle.
pub struct SaverPuzzle {
    /// Path to the puzzle file.
    save_file: PathBuf,

    /// The puzzle is first written to this file, and then renamed, so that an interrupted save
    /// does not leave a truncated puzzle file.
    tmp_file: PathBuf,
}

impl SaverPuzzle {
    /// Create a [`SaverPuzzle`] object for the puzzle file in the given directory.
    pub fn new(data_dir: PathBuf) -> Self {
        let save_file: PathBuf = data_dir.join("puzzle.json");
        let tmp_file: PathBuf = data_dir.join("puzzle.json.tmp");
        debug!("Puzzle file: {save_file:?}");
        Self {
            save_file,
            tmp_file,
        }
    }

    /// Load and validate the saved puzzle.
    ///
    /// Return None if no puzzle is saved.
    ///
    /// # Errors
    ///
    /// Return an error if the file cannot be read or parsed, or if the puzzle is not consistent.
    pub fn load(&self) -> Result<Option<Puzzle>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Box::new(error)),
        };
        let puzzle: Puzzle = serde_json::from_reader(BufReader::new(file))?;
        if let Err(e) = puzzle.validate() {
            warn!("Saved puzzle {:?} rejected: {e}", self.save_file);
            return Err(Box::new(e));
        }
        debug!(
            "Puzzle {}x{} (seed {}) loaded",
            puzzle.rows, puzzle.cols, puzzle.seed
        );
        Ok(Some(puzzle))
    }

    /// Validate and save the puzzle, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Return an error if the puzzle is not consistent or if the file cannot be written.
    pub fn save(&self, puzzle: &Puzzle) -> Result<(), Box<dyn Error>> {
        puzzle.validate()?;

        let mut writer: BufWriter<File> = BufWriter::new(File::create(&self.tmp_file)?);
        serde_json::to_writer(&mut writer, puzzle)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&self.tmp_file, &self.save_file)?;
        debug!("Puzzle (seed {}) saved", puzzle.seed);
        Ok(())
    }

    /// Delete the saved puzzle, if any.
    pub fn delete(&self) {
        let _ = fs::remove_file(&self.save_file);
        let _ = fs::remove_file(&self.tmp_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::coordinator::{GenerationRequest, Generator};
    use crate::generator::edges::{Edge, WallSet};
    use crate::generator::puzzle::PuzzleError;
    use std::fs::create_dir_all;

    fn temp_dir(name: &str) -> PathBuf {
        let mut dir: PathBuf = std::env::temp_dir();
        dir.push(format!("zipgrid-{}-{name}", std::process::id()));
        create_dir_all(&dir).unwrap();
        dir
    }

    fn puzzle(rows: usize, cols: usize, seed: u64) -> Puzzle {
        let request = GenerationRequest {
            rows,
            cols,
            max_attempts: 25,
            x_cells: 4,
            num_walls: 3,
            num_waypoints: 1,
            seed: Some(seed),
        };
        Generator::default().generate(request).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir: PathBuf = temp_dir("save");
        let saver: SaverPuzzle = SaverPuzzle::new(dir.clone());
        let p: Puzzle = puzzle(4, 4, 7);

        saver.save(&p).unwrap();
        assert!(!dir.join("puzzle.json.tmp").exists());
        assert_eq!(saver.load().unwrap(), Some(p));

        // Saving again replaces the puzzle
        let other: Puzzle = puzzle(5, 5, 8);
        saver.save(&other).unwrap();
        assert_eq!(saver.load().unwrap(), Some(other));

        saver.delete();
        assert!(saver.load().unwrap().is_none());
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_missing_file() {
        let dir: PathBuf = temp_dir("missing");
        let saver: SaverPuzzle = SaverPuzzle::new(dir.clone());

        assert!(saver.load().unwrap().is_none());
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_corrupted_file() {
        let dir: PathBuf = temp_dir("corrupted");
        let saver: SaverPuzzle = SaverPuzzle::new(dir.clone());
        fs::write(dir.join("puzzle.json"), "{ not json").unwrap();

        assert!(saver.load().is_err());
        saver.delete();
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_wall_on_solution_rejected() {
        let dir: PathBuf = temp_dir("tampered");
        let saver: SaverPuzzle = SaverPuzzle::new(dir.clone());
        let mut p: Puzzle = puzzle(3, 3, 5);
        let step: Edge = Edge::between(&p.path.get()[0], &p.path.get()[1]).unwrap();
        p.walls = [step].into_iter().collect::<WallSet>();

        // The puzzle cannot be saved, and a hand-edited file cannot be loaded
        assert!(saver.save(&p).is_err());
        fs::write(dir.join("puzzle.json"), serde_json::to_string(&p).unwrap()).unwrap();
        let err: Box<dyn Error> = saver.load().unwrap_err();
        assert_eq!(
            err.downcast_ref::<PuzzleError>(),
            Some(&PuzzleError::WallOnPath { wall: step })
        );

        saver.delete();
        let _ = fs::remove_dir(&dir);
    }
}
