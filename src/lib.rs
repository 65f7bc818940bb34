pub mod config;
pub mod host;
mod logging;
pub mod page;
pub mod pipeline;
mod telemetry;

pub use logging::{init_logging, log_debug, log_debug_content, log_file_path, log_panic};
pub use pipeline::{
    start_generation_job, CannedReplyProvider, GenerationJob, GenerationMessage, ReplyProvider,
};
pub use telemetry::init_tracing;
