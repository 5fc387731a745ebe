use thiserror::Error;

/// Terminal, user-facing outcomes of a stemcell download.
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("'{name}' not found in '{}'.", .names.join(","))]
    NotFound { name: String, names: Vec<String> },

    #[error("'{name}' is not a plain file name and cannot be saved")]
    InvalidName { name: String },

    #[error("File `{name}' already exists")]
    OverwriteDeclined { name: String },

    #[error("The downloaded file sha1 `{actual}' does not match the expected sha1 `{expected}'")]
    DigestMismatch { actual: String, expected: String },

    #[error(transparent)]
    Transfer(#[from] anyhow::Error),
}
