pub mod config;
pub mod log_buffer;
pub mod logging;
pub mod paths;
pub mod reporter;

pub use log_buffer::LogBuffer;
pub use reporter::{ReportLevel, Reporter, TeeReporter, TracingReporter};
