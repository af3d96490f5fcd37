pub mod etl;
pub mod grid_index;
pub mod pipeline;
pub mod sanitizer;

pub use crate::domain::model::{Dataset, RawRow, RunSummary, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
