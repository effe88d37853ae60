mod map_file;
mod registry;
mod types;

pub use map_file::{parse_map_file, read_map_file};
pub use registry::MapRegistry;
pub use types::{ContentError, MapDescription, MapId, MapRecord};
