pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{api_key_from_env, ConfigError, Settings};
