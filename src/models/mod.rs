mod record;

pub use record::{
    key_for, parse_date_input, sort_for_display, Field, ParseError, Priority, Record, RecordKind,
    KEY_PREFIX, NOTE_CONTENT_PLACEHOLDER, NOTE_TITLE_PLACEHOLDER, REMINDER_CONTENT_PLACEHOLDER,
    REMINDER_TITLE_PLACEHOLDER,
};
