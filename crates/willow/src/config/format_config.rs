use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use willow_core::{
    DEFAULT_MAX_PARAGRAPH_SENTENCES, FormattingRules, default_filler_words,
    default_spoken_commands,
};

/// Transcript formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Disfluency tokens stripped from transcripts. A trailing `+` lets
    /// the final letter stretch ("uh+" covers "uhh", "uhhh").
    #[serde(default = "default_fillers")]
    pub filler_words: Vec<String>,

    /// Spoken phrase to replacement text. Replacements containing a
    /// newline become line breaks, two newlines a paragraph break.
    #[serde(default = "default_commands")]
    pub spoken_commands: BTreeMap<String, String>,

    /// Sentences accumulated before an automatic paragraph break.
    #[serde(default = "default_max_sentences")]
    pub max_paragraph_sentences: Option<usize>,

    /// Characters accumulated before an automatic paragraph break.
    #[serde(default)]
    pub max_paragraph_chars: Option<usize>,
}

impl FormatConfig {
    /// Compiles this configuration into matchable formatting rules.
    pub(crate) fn compile(&self) -> FormattingRules {
        FormattingRules::new(
            self.filler_words.iter().cloned(),
            self.spoken_commands
                .iter()
                .map(|(phrase, replacement)| (phrase.clone(), replacement.clone())),
            self.max_paragraph_sentences,
            self.max_paragraph_chars,
        )
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            filler_words: default_fillers(),
            spoken_commands: default_commands(),
            max_paragraph_sentences: default_max_sentences(),
            max_paragraph_chars: None,
        }
    }
}

fn default_fillers() -> Vec<String> {
    default_filler_words()
}

fn default_commands() -> BTreeMap<String, String> {
    default_spoken_commands().into_iter().collect()
}

fn default_max_sentences() -> Option<usize> {
    Some(DEFAULT_MAX_PARAGRAPH_SENTENCES)
}
