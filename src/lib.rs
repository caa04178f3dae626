pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod slack;

pub use config::SlackRecordConfig;
pub use error::{Result, SlackRecordError};
pub use record::{Fields, Level, LogEvent};
pub use slack::{MessageFormatter, Payload, SlackRecord};
