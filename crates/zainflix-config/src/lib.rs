pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, PlayerConfig, UiConfig};
pub use paths::{container_base_path, PathManager};
