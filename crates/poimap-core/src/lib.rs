mod app_config;
mod config;
mod error;
mod model;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ErrorKind};
pub use model::{
    Coordinate, ResultPage, SearchResult, ADDRESS_UNAVAILABLE, MY_LOCATION, UNNAMED_PLACE,
};
