//! Configuration file loading for verity
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VERITY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./verity.toml` or `./.verity.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/verity/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBatchConfig, FileCacheConfig, FileConfig, FileDetectionConfig, FileDiscoveryConfig,
    FileInformationConfig, FileMetricsConfig, FileOutputConfig, FileProvidersConfig,
    FileSourcesConfig, FileTelemetryConfig,
};
pub use loader::ConfigLoader;
