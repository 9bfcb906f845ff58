pub mod app_config;
pub mod cart;
pub mod config;
pub mod product;
pub mod query;
pub mod sort;

pub use app_config::{AppConfig, Environment};
pub use cart::{CartLineItem, CartSnapshot};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use product::{CategoryRecord, PageResult, ProductRecord};
pub use query::QuerySpec;
pub use sort::{apply_local_sort, SortKey};
