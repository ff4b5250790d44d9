pub mod etl;
pub mod fetch;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{DataTable, PipelineOutcome, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Warehouse};
pub use crate::utils::error::Result;
