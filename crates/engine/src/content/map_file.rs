use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{ContentError, MapDescription, MapRecord};

const TILE_EXTENSION: &str = "png";
const OBJECT_EXTENSION: &str = "txt";

pub fn read_map_file(path: &Path, base_dir: &Path) -> Result<MapDescription, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map_file(&raw, path, base_dir)
}

/// Parses a map file body. `source_path` is only used in error messages;
/// resource paths are resolved against `base_dir`.
pub fn parse_map_file(
    raw: &str,
    source_path: &Path,
    base_dir: &Path,
) -> Result<MapDescription, ContentError> {
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((spawn_line, spawn_text)) = lines.next() else {
        return Err(ContentError::Parse {
            path: source_path.to_path_buf(),
            line: 1,
            message: "missing spawn coordinates".to_string(),
        });
    };
    let spawn = parse_spawn(spawn_text).ok_or_else(|| ContentError::Parse {
        path: source_path.to_path_buf(),
        line: spawn_line,
        message: format!("expected `<x> <y>` spawn, got `{spawn_text}`"),
    })?;

    let mut records = Vec::new();
    for (line_number, text) in lines {
        match parse_record(text, base_dir) {
            Some(record) => records.push(record),
            None => debug!(
                path = %source_path.display(),
                line = line_number,
                "map_record_skipped"
            ),
        }
    }

    Ok(MapDescription { spawn, records })
}

fn parse_spawn(text: &str) -> Option<(i32, i32)> {
    let mut fields = text.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    Some((x, y))
}

fn parse_record(text: &str, base_dir: &Path) -> Option<MapRecord> {
    let mut fields = text.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let resource = PathBuf::from(fields.next()?);

    match resource.extension().and_then(|ext| ext.to_str()) {
        Some(TILE_EXTENSION) => {
            let collision = fields.next()?.parse().ok()?;
            let layer = fields.next()?.parse().ok()?;
            Some(MapRecord::Tile {
                x,
                y,
                texture_path: base_dir.join(resource),
                collision,
                layer,
            })
        }
        Some(OBJECT_EXTENSION) => Some(MapRecord::Object {
            x,
            y,
            descriptor_path: base_dir.join(resource),
        }),
        _ => None,
    }
}
