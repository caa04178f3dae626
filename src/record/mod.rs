//! Log records as handed over by the logging pipeline
//!
//! A record carries its numeric severity together with the level name it was
//! logged under, so levels outside the standard ladder still render.

mod event;
mod level;

pub use event::{Fields, LogEvent};
pub use level::Level;
