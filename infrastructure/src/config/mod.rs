//! Configuration file loading for screening-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCREENING_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./screening.toml` or `./.screening.toml`
//! 4. Global: `$XDG_CONFIG_HOME/screening-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileConsensusConfig, FileLoggingConfig, FileProjectConfig, FileStageConfig,
    FileWorkflowConfig, ProjectConfigError,
};
pub use loader::ConfigLoader;
