//! Reading and writing files. Everything here returns `anyhow::Result` with the path attached as
//! context, so callers can just `?`.

#[macro_use]
extern crate log;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use abstutil::prettyprint_usize;

pub fn slurp_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs_err::read(path).with_context(|| format!("Couldn't read {}", path.display()))
}

pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let bytes = slurp_file(path)?;
    serde_json::from_slice(&bytes).with_context(|| format!("Couldn't parse {}", path.display()))
}

/// Like `read_json`, but a missing file yields `None` instead of an error.
pub fn maybe_read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Option<T>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

pub fn to_json<T: Serialize>(obj: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(obj)?)
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, obj: &T) -> Result<()> {
    let contents = to_json(obj)?;
    write_file(path, contents.as_bytes())
}

pub fn write_file<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    let mut file = fs_err::File::create(path)?;
    file.write_all(contents)?;
    info!(
        "Wrote {} ({} bytes)",
        path.display(),
        prettyprint_usize(contents.len())
    );
    Ok(())
}
