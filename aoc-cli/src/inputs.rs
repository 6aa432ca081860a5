//! Puzzle inputs read from a local directory

use crate::error::InputError;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Which file of a day to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    /// The personal puzzle input
    #[default]
    Input,
    /// The example from the puzzle text
    Test,
}

impl InputKind {
    pub fn file_name(self) -> &'static str {
        match self {
            InputKind::Input => "input.txt",
            InputKind::Test => "test.txt",
        }
    }
}

/// Directory of puzzle inputs
///
/// Directory structure: `{dir}/{year}/day{day:02}/{input|test}.txt`
pub struct InputStore {
    dir: PathBuf,
    kind: InputKind,
}

impl InputStore {
    pub fn new(dir: PathBuf, kind: InputKind) -> Self {
        Self { dir, kind }
    }

    /// Path of the input for a specific year/day
    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        self.dir
            .join(year.to_string())
            .join(format!("day{:02}", day))
            .join(self.kind.file_name())
    }

    /// Check if the input file exists
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.path(year, day).is_file()
    }

    /// Read the input for a year/day
    pub fn read(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.path(year, day);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(InputError::Missing { path }),
            Err(source) => Err(InputError::Read { path, source }),
        }
    }
}
