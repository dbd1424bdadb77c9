use crate::config;
use std::{fs, io, path::{Path, PathBuf}};

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Fallback store root (absolute), from `config::fallback_data_dir()`.
/// If relative in env, resolve against current_dir().
pub fn fallback_root() -> PathBuf {
    let p = PathBuf::from(config::fallback_data_dir());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Path of one fallback collection: {root}/{collection}.json
pub fn collection_file<P: AsRef<Path>>(root: P, collection: &str) -> PathBuf {
    root.as_ref().join(format!("{collection}.json"))
}

/// Scratch path used while atomically replacing a collection file.
pub fn collection_tmp_file<P: AsRef<Path>>(root: P, collection: &str) -> PathBuf {
    root.as_ref().join(format!(".{collection}.json.tmp"))
}

/// Highest id ever handed out in a fallback collection: {root}/{collection}.seq
pub fn collection_seq_file<P: AsRef<Path>>(root: P, collection: &str) -> PathBuf {
    root.as_ref().join(format!("{collection}.seq"))
}
