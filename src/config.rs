use anyhow::bail;
use std::path::PathBuf;
use url::Url;

/// Settings shared by every command, resolved from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index_url: Url,
    pub target_directory: PathBuf,
    pub chunk_size: usize,
    pub non_interactive: bool,
}

impl Config {
    pub fn validate(self) -> anyhow::Result<Self> {
        if self.chunk_size == 0 {
            bail!("--chunk-size must be greater than zero.");
        }
        if !matches!(self.index_url.scheme(), "http" | "https") {
            bail!(
                "Stemcell index must be served over http or https, got '{}'.",
                self.index_url
            );
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            index_url: Url::parse("https://example.com/index.yml").unwrap(),
            target_directory: PathBuf::from("."),
            chunk_size: 65_536,
            non_interactive: false,
        }
    }

    #[test]
    fn accepts_defaults() {
        assert_eq!(config().validate().unwrap(), config());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = Config {
            chunk_size: 0,
            ..config()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "--chunk-size must be greater than zero.");
    }

    #[test]
    fn rejects_non_http_index() {
        let err = Config {
            index_url: Url::parse("ftp://example.com/index.yml").unwrap(),
            ..config()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("ftp://example.com/index.yml"));
    }
}
