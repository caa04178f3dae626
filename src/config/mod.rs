mod settings;

pub use settings::{SlackRecordConfig, load_settings, settings_from_lookup};
