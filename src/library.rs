//! A directory of stored automata. Every automaton lives in its own subdirectory named after
//! it, which contains a single JSON file `<name>.json` holding its [`AutomatonRecord`].
//!
//! [`AutomatonRecord`]: crate::representation::AutomatonRecord

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{prelude::*, representation::RepresentationError};

/// Errors that occur when accessing an [`AutomatonLibrary`].
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Reading from or writing to the file system failed.
    #[error("i/o error at {path:?}: {source}")]
    Io {
        /// The path that was accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// A stored file could not be (de)serialized.
    #[error(transparent)]
    Representation(#[from] RepresentationError),
    /// There is no automaton with the given name.
    #[error("no automaton named \"{0}\" in the library")]
    NotFound(String),
    /// The name cannot be used as a directory name.
    #[error("\"{0}\" is not a valid automaton name")]
    InvalidName(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LibraryError + '_ {
    move |source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A collection of automata stored below a root directory.
#[derive(Debug, Clone)]
pub struct AutomatonLibrary {
    root: PathBuf,
}

impl AutomatonLibrary {
    /// Opens the library at `root`, creating the directory if it does not exist yet.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, LibraryError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_error(&root))?;
        debug!("opened automaton library at {}", root.display());
        Ok(Self { root })
    }

    /// The root directory of the library.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_name<'a>(&self, name: &'a str) -> Result<&'a str, LibraryError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(LibraryError::InvalidName(name.to_string()));
        }
        Ok(name)
    }

    fn file_of(&self, name: &str) -> PathBuf {
        self.root.join(name).join(format!("{name}.json"))
    }

    /// Returns true if an automaton with the given name is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.check_name(name).is_ok() && self.file_of(name).is_file()
    }

    /// Stores `aut` under its name, replacing a previously stored automaton of the same name.
    /// Returns the path of the written file.
    pub fn save(&self, aut: &Automaton) -> Result<PathBuf, LibraryError> {
        let name = self.check_name(aut.name())?;
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let file = self.file_of(name);
        fs::write(&file, aut.to_json()?).map_err(io_error(&file))?;
        info!("saved automaton {name} to {}", file.display());
        Ok(file)
    }

    /// Loads the automaton with the given name.
    pub fn load(&self, name: &str) -> Result<Automaton, LibraryError> {
        let name = self.check_name(name)?;
        let file = self.file_of(name);
        if !file.is_file() {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&file).map_err(io_error(&file))?;
        Ok(Automaton::from_json(&json)?)
    }

    /// Deletes the stored automaton with the given name together with its directory.
    pub fn remove(&self, name: &str) -> Result<(), LibraryError> {
        if !self.contains(name) {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        let dir = self.root.join(name);
        fs::remove_dir_all(&dir).map_err(io_error(&dir))?;
        info!("removed automaton {name}");
        Ok(())
    }

    /// Lists the names of all stored automata in ascending order.
    pub fn names(&self) -> Result<Vec<String>, LibraryError> {
        let mut names = vec![];
        for entry in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let entry = entry.map_err(io_error(&self.root))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if self.contains(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
