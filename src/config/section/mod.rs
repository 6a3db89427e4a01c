//! Configuration sections of `svgpress.toml`.

mod cache;
mod cleanup;
mod diagnostics;
mod optimize;
mod svgo;
mod tools;
mod watch;

pub use cache::CacheConfig;
pub use cleanup::CleanupConfig;
pub use diagnostics::DiagnosticsConfig;
pub use optimize::{DEEP_SIMPLIFY, OptimizeConfig, is_valid_tolerance};
pub use svgo::{SvgoConfig, SvgoPlugin};
pub use tools::ToolsConfig;
pub use watch::WatchConfig;
