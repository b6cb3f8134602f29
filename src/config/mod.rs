mod types;

pub use types::{load_config, Config, PageFetchMode, SecurityCheckMode};
