pub mod curve;
pub mod grid;
pub mod init;
pub mod trials;
pub mod validate;

use std::error::Error;
use std::fs;
use std::path::Path;

use nsim_record::to_canonical_json_bytes;
use serde::Serialize;

/// Writes `value` as canonical JSON to `path`, or to stdout when no path is given.
pub fn emit_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let bytes = to_canonical_json_bytes(value)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        None => println!("{}", String::from_utf8(bytes)?),
    }
    Ok(())
}
