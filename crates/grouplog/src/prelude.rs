//! Common module for library exports

pub use crate::config::{ConfigUpdate, GlobalConfig};
pub use crate::error::{LoggerError, Result};
pub use crate::level::Level;
pub use crate::logger::Logger;
pub use crate::registry::{LoggerSpec, Registry};
