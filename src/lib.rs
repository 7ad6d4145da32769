pub mod completion;
pub mod config;
pub mod logging;
pub mod metrics;
