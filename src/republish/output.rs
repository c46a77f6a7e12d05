//! Writing a planned publication to disk.

use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use super::{IMG_PREFIX, Publication, check_asset_path};
use crate::error::{Error, Result};

/// A filesystem change made while writing a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreatedDir(PathBuf),
    RemovedFile(PathBuf),
    WroteFile(PathBuf),
    CopiedFile { from: PathBuf, to: PathBuf },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreatedDir(path) => write!(f, "Creating directory: {}", path.display()),
            Action::RemovedFile(path) => write!(f, "Removing file: {}", path.display()),
            Action::WroteFile(path) => write!(f, "Writing file: {}", path.display()),
            Action::CopiedFile { from, .. } => write!(f, "Copying file: {}", from.display()),
        }
    }
}

/// Everything a run changed on disk, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub actions: Vec<Action>,
}

impl Report {
    fn record(&mut self, action: Action) {
        log::info!("{action}");
        self.actions.push(action);
    }

    pub fn created_dirs(&self) -> impl Iterator<Item = &Path> {
        self.actions.iter().filter_map(|a| match a {
            Action::CreatedDir(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn removed_files(&self) -> impl Iterator<Item = &Path> {
        self.actions.iter().filter_map(|a| match a {
            Action::RemovedFile(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn written_files(&self) -> impl Iterator<Item = &Path> {
        self.actions.iter().filter_map(|a| match a {
            Action::WroteFile(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn copied_files(&self) -> impl Iterator<Item = &Path> {
        self.actions.iter().filter_map(|a| match a {
            Action::CopiedFile { to, .. } => Some(to.as_path()),
            _ => None,
        })
    }
}

impl Publication {
    /// Write the HTML and images under `output_dir`.
    ///
    /// Asset sources are checked before anything is touched, so a missing
    /// or out-of-tree asset fails the run with the output directory
    /// unchanged.
    pub fn write(&self, output_dir: impl AsRef<Path>) -> Result<Report> {
        let output_dir = output_dir.as_ref();
        let image_dir = output_dir.join(self.image_subdir());
        let assets_dir = self.assets_dir();
        let mut report = Report::default();

        for path in &self.asset_images {
            check_asset_path(path)?;
            let source = assets_dir.join(path);
            if !source.is_file() {
                return Err(Error::InputNotFound(source));
            }
        }

        ensure_dir(output_dir, &mut report)?;
        ensure_dir(&image_dir, &mut report)?;

        purge_generated(&image_dir, &mut report)?;

        let html_path = output_dir.join(&self.basename);
        fs::write(&html_path, &self.html)?;
        report.record(Action::WroteFile(html_path));

        for image in &self.inline_images {
            let path = image_dir.join(&image.filename);
            fs::write(&path, &image.data)?;
            report.record(Action::WroteFile(path));
        }

        for path in &self.asset_images {
            let from = assets_dir.join(path);
            let to = image_dir.join(path);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            copy_with_times(&from, &to)?;
            report.record(Action::CopiedFile { from, to });
        }

        Ok(report)
    }
}

fn ensure_dir(path: &Path, report: &mut Report) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
        report.record(Action::CreatedDir(path.to_path_buf()));
    }
    Ok(())
}

/// Remove inline images left by earlier runs.
fn purge_generated(image_dir: &Path, report: &mut Report) -> Result<()> {
    let mut stale = Vec::new();
    for entry in fs::read_dir(image_dir)? {
        let entry = entry?;
        let is_generated = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(IMG_PREFIX));
        if is_generated && entry.file_type()?.is_file() {
            stale.push(entry.path());
        }
    }
    stale.sort();

    for path in stale {
        fs::remove_file(&path)?;
        report.record(Action::RemovedFile(path));
    }
    Ok(())
}

/// Copy a file with its permissions and timestamps.
fn copy_with_times(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    let meta = fs::metadata(from)?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    File::open(to)?.set_times(times)
}
