use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{Error, Result};

#[derive(Serialize)]
struct Record<'a, T: ?Sized> {
    task: &'a str,
    output: &'a T,
}

/// Appends task results to a JSON lines file.
///
/// Without a destination every export is a no-op.
#[derive(Clone, Debug, Default)]
pub struct Exporter {
    destination: Option<PathBuf>,
}

impl Exporter {
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Writes `{"task": task, "output": output}` as one line.
    pub fn export<T: Serialize + ?Sized>(&self, task: &str, output: &T) -> Result<()> {
        let Some(path) = &self.destination else {
            return Ok(());
        };

        let mut line = serde_json::to_vec(&Record { task, output })?;
        line.push(b'\n');

        let export_err = |source: std::io::Error| Error::Export { path: path.clone(), source };
        let mut file =
            OpenOptions::new().create(true).append(true).open(path).map_err(export_err)?;
        file.write_all(&line).map_err(export_err)?;

        log::trace!("exported {task} result to {}", path.display());
        Ok(())
    }
}
