use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{ContentError, MapId};

/// Map id to map file lookup, read from a `<id> <path>` text registry.
///
/// Ids do not need to be contiguous; unused ids simply stay unregistered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapRegistry {
    slots: Vec<Option<PathBuf>>,
    base_dir: PathBuf,
}

impl MapRegistry {
    pub fn load(path: &Path, base_dir: &Path) -> Result<Self, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&raw, base_dir))
    }

    /// Relative map paths, and the resource paths inside those maps, are
    /// resolved against `base_dir`.
    pub fn parse(raw: &str, base_dir: &Path) -> Self {
        let mut registry = Self {
            slots: Vec::new(),
            base_dir: base_dir.to_path_buf(),
        };
        for (index, line) in raw.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let (Some(id), Some(path)) = (fields.next(), fields.next()) else {
                if !line.trim().is_empty() {
                    debug!(line = index + 1, "registry_line_skipped");
                }
                continue;
            };
            let Ok(id) = id.parse::<u32>() else {
                debug!(line = index + 1, id, "registry_line_skipped");
                continue;
            };
            registry.insert(MapId(id), base_dir.join(path));
        }
        registry
    }

    pub fn insert(&mut self, map_id: MapId, path: PathBuf) {
        let index = map_id.0 as usize;
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(path);
    }

    pub fn resolve(&self, map_id: MapId) -> Result<&Path, ContentError> {
        self.slots
            .get(map_id.0 as usize)
            .and_then(Option::as_deref)
            .ok_or(ContentError::MapNotFound { map_id })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn sparse_ids_leave_gaps_unregistered() {
        let registry = MapRegistry::parse("1 maps/a.txt\n4 maps/b.txt\n", Path::new("root"));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.resolve(MapId(4)).expect("map 4"),
            Path::new("root/maps/b.txt")
        );
        assert!(matches!(
            registry.resolve(MapId(2)),
            Err(ContentError::MapNotFound { map_id: MapId(2) })
        ));
        assert!(registry.resolve(MapId(99)).is_err());
    }

    #[test]
    fn later_entry_overrides_same_id() {
        let registry = MapRegistry::parse("1 a.txt\n1 b.txt\n", Path::new(""));
        assert_eq!(registry.resolve(MapId(1)).expect("map 1"), Path::new("b.txt"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let registry = MapRegistry::parse("one a.txt\n\n7\n2 c.txt\n", Path::new(""));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve(MapId(2)).is_ok());
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = TempDir::new().expect("tempdir");
        let err = MapRegistry::load(&temp.path().join("maps.txt"), temp.path())
            .expect_err("missing registry");
        assert!(matches!(err, ContentError::ReadFile { .. }));
    }
}
