//! Path helpers for the cache directory and snapshot files.
//!
//! Every path handed in by a user or config file goes through [`make_abspath`],
//! so `./data`, `data/` and `~/data` style inputs resolve to one absolute path
//! no matter which directory the process was started from.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use shared_utils::env::home_dir;
use tracing::{debug, info};

use crate::errors::Error;

/// Replaces a leading `~` (alone or followed by a separator) with the home directory.
///
/// `~user` forms are left untouched.
pub fn expand_user(path: &Path) -> Result<PathBuf, Error> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            Ok(home_dir()?.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Expands `~`, anchors relative paths at the current directory and removes
/// `.`/`..` components lexically. The path does not have to exist.
pub fn make_abspath(path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let expanded = expand_user(path.as_ref())?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Creates the cache directory (and parents) if it is absent; returns its absolute path.
///
/// This is a setup step. The fetch path itself never creates directories.
pub fn ensure_cache_dir(cache_dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let dir = make_abspath(cache_dir)?;
    if dir.is_dir() {
        debug!(dir = %dir.display(), "cache directory present");
    } else {
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "created cache directory");
    }
    Ok(dir)
}
