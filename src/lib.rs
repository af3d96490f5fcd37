pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::EtlEngine,
    grid_index::{CellKey, GridIndexer},
    pipeline::FacilityPipeline,
    sanitizer::{Sanitizer, Verdict},
};
pub use domain::model::{Facility, GridIndex, RunSummary, SanitizerRules};
pub use utils::error::{EtlError, Result};
