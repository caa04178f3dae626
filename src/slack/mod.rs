mod formatter;
mod record;
mod stringify;
mod types;

pub use formatter::{
    DEFAULT_DATE_FORMAT, DEFAULT_LINE_FORMAT, LineFormatter, MessageFormatter,
    PassthroughFormatter,
};
pub use record::SlackRecord;
pub use stringify::ValueStringifier;
pub use types::{Attachment, AttachmentColor, Field, Payload, WirePayload};
