mod formatter;
pub(crate) mod rules;

pub use {
    formatter::TextFormatter,
    rules::{
        DEFAULT_MAX_PARAGRAPH_SENTENCES, FormattingRules, default_filler_words,
        default_spoken_commands,
    },
};
