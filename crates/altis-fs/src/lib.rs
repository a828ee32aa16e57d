//! Filesystem layer for the Altis installer
//!
//! Provides platform-independent path handling and the safe I/O primitives
//! the scaffolder and manifest generator build on.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::ScaffoldPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, resolve_absolute};
