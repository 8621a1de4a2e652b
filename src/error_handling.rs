/*
    Shared error plumbing for everything that reads a resource file
*/

use std::fmt::Display;
use std::path::{Path, PathBuf};

pub trait ErrorType: Display + PartialEq {}

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    // Line 0 means the whole file
    pub fn file(file: &Path) -> Self {
        Location {
            file: file.to_path_buf(),
            line: 0
        }
    }

    pub fn line(file: &Path, line: usize) -> Self {
        Location {
            file: file.to_path_buf(),
            line
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Error<T> {
    pub fn new(location: Location, error: T) -> Self {
        Error { location, error }
    }
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

// Splits per-line results into the good values and every error, so a loader
// can report all bad lines of a file at once
pub fn collect_lines<V, T: ErrorType>(lines: impl Iterator<Item = Result<V, Error<T>>>) -> Result<Vec<V>, Errors<T>> {
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for line in lines {
        match line {
            Ok(value) => values.push(value),
            Err(error) => errors.push(error)
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}
