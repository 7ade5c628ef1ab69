//! Shared pieces of the homework status bot: runtime configuration, the
//! status API wire format, and the error kinds a poll cycle can end in.

pub mod config;
pub mod error;
pub mod protocol;

pub use config::{BotConfig, ConfigError};
pub use error::{FetchError, HomeworkError};
pub use protocol::{HomeworkRecord, HomeworkStatus, StatusResponse};
