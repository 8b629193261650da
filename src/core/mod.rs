pub mod engine;
pub mod feedme;
pub mod pipeline;
pub mod workspace;

pub use crate::domain::model::{WorkItem, WorkReport};
pub use crate::domain::ports::{ConfigProvider, Fitter, Pipeline};
pub use crate::utils::error::Result;
