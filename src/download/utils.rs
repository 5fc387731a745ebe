use std::path::{Component, Path, PathBuf};

/// Stemcells are saved under their index name, so the overwrite check and
/// the transfer always agree on the path. Names come from the remote index
/// and must be a single plain file name; anything else is `None`.
pub fn build_download_path(stemcell_name: &str, target_dir: &Path) -> Option<PathBuf> {
    let mut components = Path::new(stemcell_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == stemcell_name => {
            Some(target_dir.join(name))
        }
        _ => None,
    }
}

#[cfg(test)]
pub fn sha1_hex(bytes: &[u8]) -> String {
    use sha1::{Digest, Sha1};
    hex::encode(Sha1::digest(bytes))
}
