pub mod chapter;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod subtitle;
pub mod timecode;

pub use config::{Config, StyleProfile};
pub use error::{EpisubError, Result};
pub use pipeline::{
    convert_subtitle, process_chapters, process_subtitle, rescale_subtitle, PipelineOutcome,
};
