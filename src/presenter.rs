//! Listing and downloading public stemcells.

use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::download::{Downloader, utils};
use crate::error::PresenterError;
use crate::index::{StemcellIndex, StemcellRecord};
use crate::ui::UserInterface;

pub const DOWNLOAD_HINT: &str =
    "To download use `bosh download public stemcell <stemcell_name>'. For full url use --full.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Include the Url column.
    pub full: bool,
    /// List every stemcell, not only the stable ones.
    pub all: bool,
}

/// File existence check, injected so downloads can be tested without a disk.
pub trait FsProbe {
    fn exists(&self, path: &Path) -> bool;
}

pub struct LocalFs;

impl FsProbe for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub struct PublicStemcellPresenter<'a, U, I, D, F> {
    ui: &'a mut U,
    index: &'a I,
    downloader: &'a D,
    fs: &'a F,
    target_dir: PathBuf,
}

impl<'a, U, I, D, F> PublicStemcellPresenter<'a, U, I, D, F>
where
    U: UserInterface,
    I: StemcellIndex,
    D: Downloader,
    F: FsProbe,
{
    pub fn new(
        ui: &'a mut U,
        index: &'a I,
        downloader: &'a D,
        fs: &'a F,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ui,
            index,
            downloader,
            fs,
            target_dir: target_dir.into(),
        }
    }

    pub fn list(&mut self, options: ListOptions) {
        let headings: &[&str] = if options.full {
            &["Name", "Url"]
        } else {
            &["Name"]
        };
        let rows: Vec<Vec<String>> = self
            .stemcells_for(options)
            .into_iter()
            .map(|stemcell| {
                if options.full {
                    vec![stemcell.name.clone(), stemcell.url.to_string()]
                } else {
                    vec![stemcell.name.clone()]
                }
            })
            .collect();
        debug!(rows = rows.len(), ?options, "listing public stemcells");

        let table = self.ui.table(headings, &rows);
        self.ui.say(&table);
        self.ui.say(DOWNLOAD_HINT);
    }

    pub fn download(&mut self, stemcell_name: &str) -> Result<(), PresenterError> {
        if !self.index.has_stemcell(stemcell_name) {
            return Err(self.not_found(stemcell_name));
        }

        let dest = utils::build_download_path(stemcell_name, &self.target_dir).ok_or_else(|| {
            PresenterError::InvalidName {
                name: stemcell_name.to_string(),
            }
        })?;
        if self.fs.exists(&dest)
            && !self
                .ui
                .confirmed(&format!("Overwrite existing file `{}'?", stemcell_name))
        {
            return Err(PresenterError::OverwriteDeclined {
                name: stemcell_name.to_string(),
            });
        }

        let stemcell = self
            .index
            .find(stemcell_name)
            .ok_or_else(|| self.not_found(stemcell_name))?;
        let result = self.downloader.fetch(stemcell.size, &stemcell.url, &dest)?;

        if result.sha1_matches(&stemcell.sha1) {
            info!(
                name = stemcell_name,
                bytes = result.bytes,
                path = %result.path.display(),
                "stemcell verified"
            );
            self.ui.say(&"Download complete".green().to_string());
            Ok(())
        } else {
            info!(
                name = stemcell_name,
                actual = %result.sha1,
                expected = %stemcell.sha1,
                "sha1 mismatch"
            );
            Err(PresenterError::DigestMismatch {
                actual: result.sha1,
                expected: stemcell.sha1.clone(),
            })
        }
    }

    fn stemcells_for(&self, options: ListOptions) -> Vec<&'a StemcellRecord> {
        if options.all {
            self.index.all()
        } else {
            self.index.stable()
        }
    }

    fn not_found(&self, stemcell_name: &str) -> PresenterError {
        PresenterError::NotFound {
            name: stemcell_name.to_string(),
            names: self.index.names().into_iter().map(str::to_string).collect(),
        }
    }
}
