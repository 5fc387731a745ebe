use crate::config::Config;
use crate::download::interrupt::SIGINT_EXIT_CODE;
use crate::download::{HttpDownloader, InterruptGuard};
use crate::index::{DEFAULT_INDEX_URL, PublicStemcellIndex};
use crate::presenter::{ListOptions, LocalFs, PublicStemcellPresenter};
use crate::ui::TerminalUi;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// List and download public stemcells.
#[derive(Parser)]
#[command(version, about, long_about=None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// URL of the public stemcell index
    #[arg(long, env = "STEMCELL_INDEX_URL", default_value = DEFAULT_INDEX_URL, global = true)]
    index_url: Url,

    /// Directory stemcells are downloaded into
    #[arg(
        short,
        long,
        env = "STEMCELL_TARGET_DIR",
        default_value = ".",
        global = true
    )]
    target_directory: PathBuf,

    /// Download chunk size
    #[arg(short, long, default_value_t = 65_536, global = true)]
    chunk_size: usize,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    non_interactive: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> anyhow::Result<Config> {
        Config {
            index_url: self.index_url.clone(),
            target_directory: self.target_directory.clone(),
            chunk_size: self.chunk_size,
            non_interactive: self.non_interactive,
        }
        .validate()
    }

    pub async fn execute(self) -> anyhow::Result<()> {
        let config = self.config()?;
        let interrupt = InterruptGuard::new();
        if matches!(self.command, Commands::DownloadPublicStemcell { .. }) {
            // Ctrl-C cancels a running transfer; anywhere else it ends the process.
            let handler_interrupt = interrupt.clone();
            ctrlc::set_handler(move || {
                if !handler_interrupt.on_signal() {
                    std::process::exit(SIGINT_EXIT_CODE);
                }
            })
            .context("Could not set keyboard interrupt handler.")?;
        }

        // reqwest::blocking owns its own runtime and cannot run on a worker thread.
        let command = self.command;
        tokio::task::spawn_blocking(move || command.run(&config, interrupt)).await?
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the available public stemcells
    PublicStemcells {
        /// Show the download url of each stemcell
        #[arg(long)]
        full: bool,

        /// Include stemcells not tagged stable
        #[arg(long)]
        all: bool,
    },
    /// Download a public stemcell and verify its sha1
    DownloadPublicStemcell {
        /// Stemcell name as shown by `public-stemcells`
        stemcell_name: String,
    },
}

impl Commands {
    fn run(&self, config: &Config, interrupt: InterruptGuard) -> anyhow::Result<()> {
        let index = PublicStemcellIndex::download(&config.index_url)?;
        let mut ui = TerminalUi::new(config.non_interactive);
        let downloader = HttpDownloader::new(config.chunk_size, interrupt);
        let mut presenter = PublicStemcellPresenter::new(
            &mut ui,
            &index,
            &downloader,
            &LocalFs,
            &config.target_directory,
        );

        match self {
            Commands::PublicStemcells { full, all } => {
                presenter.list(ListOptions {
                    full: *full,
                    all: *all,
                });
                Ok(())
            }
            Commands::DownloadPublicStemcell { stemcell_name } => {
                debug!(stemcell_name, "download requested");
                presenter.download(stemcell_name)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_parse_public_stemcells_defaults() {
        let cli = parse(&["stemcell-dl", "public-stemcells"]);
        match cli.command {
            Commands::PublicStemcells { full, all } => {
                assert!(!full);
                assert!(!all);
            }
            _ => panic!("expected PublicStemcells"),
        }
        let config = cli.config().unwrap();
        assert_eq!(config.chunk_size, 65_536);
        assert!(!config.non_interactive);
    }

    #[test]
    fn cli_parse_public_stemcells_flags() {
        match parse(&["stemcell-dl", "public-stemcells", "--full", "--all"]).command {
            Commands::PublicStemcells { full, all } => {
                assert!(full);
                assert!(all);
            }
            _ => panic!("expected PublicStemcells"),
        }
    }

    #[test]
    fn cli_parse_download_with_globals_after_subcommand() {
        let cli = parse(&[
            "stemcell-dl",
            "download-public-stemcell",
            "bosh-stemcell-aws-0.6.4.tgz",
            "-n",
            "--target-directory",
            "/tmp/stemcells",
            "--index-url",
            "http://127.0.0.1:8080/index.yml",
        ]);
        match &cli.command {
            Commands::DownloadPublicStemcell { stemcell_name } => {
                assert_eq!(stemcell_name, "bosh-stemcell-aws-0.6.4.tgz")
            }
            _ => panic!("expected DownloadPublicStemcell"),
        }
        let config = cli.config().unwrap();
        assert!(config.non_interactive);
        assert_eq!(config.target_directory, PathBuf::from("/tmp/stemcells"));
        assert_eq!(config.index_url.as_str(), "http://127.0.0.1:8080/index.yml");
    }

    #[test]
    fn cli_download_requires_a_name() {
        assert!(Cli::try_parse_from(["stemcell-dl", "download-public-stemcell"]).is_err());
    }

    #[test]
    fn cli_zero_chunk_size_fails_validation() {
        let cli = parse(&["stemcell-dl", "-c", "0", "public-stemcells"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn failed_download_leaves_no_target_directory() {
        let index = "\
stemcell.tgz:
  url: http://127.0.0.1:1/stemcell.tgz
  size: 1
  sha1: da39a3ee5e6b4b0d3255bfef95601890afd80709
";
        let base = test_server::start(200, index.as_bytes().to_vec());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("stemcells");
        let config = Config {
            index_url: Url::parse(&base).unwrap(),
            target_directory: target.clone(),
            chunk_size: 1024,
            non_interactive: false,
        };
        let command = Commands::DownloadPublicStemcell {
            stemcell_name: "missing.tgz".to_string(),
        };

        let err = command.run(&config, InterruptGuard::new()).unwrap_err();

        assert_eq!(err.to_string(), "'missing.tgz' not found in 'stemcell.tgz'.");
        assert!(!target.exists());
    }

    #[test]
    fn cli_rejects_malformed_index_url() {
        assert!(
            Cli::try_parse_from(["stemcell-dl", "--index-url", "not a url", "public-stemcells"])
                .is_err()
        );
    }
}
