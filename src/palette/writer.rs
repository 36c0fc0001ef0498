use super::document::Palette;
use crate::errors::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

/// Render a palette as UTF-8 JSON indented by four spaces.
pub fn to_json(palette: &Palette) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    palette.serialize(&mut serializer)?;
    buffer.push(b'\n');
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn write_palette(palette: &Palette, path: &Path) -> Result<()> {
    let text = to_json(palette)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "Wrote {} components to {}",
        palette.model_data.num_lg_nodes,
        path.display()
    );
    Ok(())
}
