/// What a recognized spoken phrase turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// Symbol glued to the preceding word, like `.` or a closing quote.
    TrailingSymbol(String),
    /// Symbol glued to the following word, like an opening quote.
    LeadingSymbol(String),
    /// Single line break inside the current paragraph.
    LineBreak,
    /// Hard paragraph boundary.
    ParagraphBreak,
}

impl CommandAction {
    /// Interprets a replacement string from the command table.
    ///
    /// Newlines select break actions; a leading space marks a symbol that
    /// attaches to the next word (`" \""` for an opening quote), anything
    /// else attaches to the previous word (`"."`, `"\" "`).
    fn from_replacement(replacement: &str) -> Self {
        let newlines = replacement.matches('\n').count();
        if newlines >= 2 {
            Self::ParagraphBreak
        } else if newlines == 1 {
            Self::LineBreak
        } else if replacement.starts_with(' ') {
            Self::LeadingSymbol(replacement.trim().to_string())
        } else {
            Self::TrailingSymbol(replacement.trim_end().to_string())
        }
    }
}

/// A spoken phrase compiled for matching: lowercased words plus the action
/// its replacement string encodes.
#[derive(Debug, Clone)]
pub(crate) struct CommandRule {
    pub(crate) words: Vec<String>,
    pub(crate) action: CommandAction,
}

/// A filler entry. A trailing `+` on the source word means the final letter
/// may repeat, so `uh+` covers "uh", "uhh", "uhhh".
#[derive(Debug, Clone)]
pub(crate) struct FillerRule {
    base: String,
    repeat_last: bool,
}

impl FillerRule {
    fn parse(entry: &str) -> Option<Self> {
        let (base, repeat_last) = match entry.strip_suffix('+') {
            Some(base) => (base, true),
            None => (entry, false),
        };
        let base = base.trim().to_lowercase();
        if base.is_empty() {
            return None;
        }
        Some(Self { base, repeat_last })
    }

    fn matches(&self, word: &str) -> bool {
        if word == self.base {
            return true;
        }
        if !self.repeat_last {
            return false;
        }
        let Some(last) = self.base.chars().last() else {
            return false;
        };
        word.strip_prefix(self.base.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == last))
    }
}

/// Compiled formatting configuration: filler words to strip, spoken-command
/// phrases to substitute, and paragraph grouping thresholds.
///
/// Built once at startup and shared read-only with the formatter.
#[derive(Debug, Clone)]
pub struct FormattingRules {
    fillers: Vec<FillerRule>,
    commands: Vec<CommandRule>,
    max_paragraph_sentences: Option<usize>,
    max_paragraph_chars: Option<usize>,
}

impl FormattingRules {
    /// Compiles raw configuration into matchable rules.
    ///
    /// Commands are sorted longest phrase first so multi-word phrases win
    /// over their prefixes ("question mark" before any one-word "question").
    pub fn new<F, C>(
        fillers: F,
        commands: C,
        max_paragraph_sentences: Option<usize>,
        max_paragraph_chars: Option<usize>,
    ) -> Self
    where
        F: IntoIterator<Item = String>,
        C: IntoIterator<Item = (String, String)>,
    {
        let fillers = fillers
            .into_iter()
            .filter_map(|entry| FillerRule::parse(&entry))
            .collect();

        let mut commands: Vec<CommandRule> = commands
            .into_iter()
            .filter_map(|(phrase, replacement)| {
                let words: Vec<String> = phrase
                    .split_whitespace()
                    .map(|w| w.to_lowercase())
                    .collect();
                if words.is_empty() {
                    return None;
                }
                Some(CommandRule {
                    words,
                    action: CommandAction::from_replacement(&replacement),
                })
            })
            .collect();
        commands.sort_by(|a, b| b.words.len().cmp(&a.words.len()));

        Self {
            fillers,
            commands,
            max_paragraph_sentences,
            max_paragraph_chars,
        }
    }

    /// Whether a normalized word is a filler to strip.
    pub(crate) fn is_filler(&self, word: &str) -> bool {
        self.fillers.iter().any(|f| f.matches(word))
    }

    /// Longest command phrase matching the normalized words at the start of
    /// `words`, with the number of words it consumes.
    pub(crate) fn match_command(&self, words: &[&str]) -> Option<(&CommandAction, usize)> {
        self.commands.iter().find_map(|rule| {
            if rule.words.len() > words.len() {
                return None;
            }
            let matched = rule
                .words
                .iter()
                .zip(words)
                .all(|(expected, actual)| expected == actual);
            matched.then_some((&rule.action, rule.words.len()))
        })
    }

    pub(crate) fn max_paragraph_sentences(&self) -> Option<usize> {
        self.max_paragraph_sentences
    }

    pub(crate) fn max_paragraph_chars(&self) -> Option<usize> {
        self.max_paragraph_chars
    }
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self::new(
            default_filler_words(),
            default_spoken_commands(),
            Some(DEFAULT_MAX_PARAGRAPH_SENTENCES),
            None,
        )
    }
}

/// Sentences accumulated per paragraph before an automatic break.
pub const DEFAULT_MAX_PARAGRAPH_SENTENCES: usize = 2;

/// Stock disfluency list. Entries ending in `+` absorb a stretched final
/// letter ("uhhh").
pub fn default_filler_words() -> Vec<String> {
    ["uh+", "um+", "mm+", "eh+", "ah+", "uh-huh", "um-hmm"]
        .map(String::from)
        .to_vec()
}

/// Stock spoken-command table, phrase to replacement text.
pub fn default_spoken_commands() -> Vec<(String, String)> {
    [
        ("new line", "\n"),
        ("newline", "\n"),
        ("new paragraph", "\n\n"),
        ("next paragraph", "\n\n"),
        ("period", "."),
        ("full stop", "."),
        ("comma", ","),
        ("question mark", "?"),
        ("exclamation point", "!"),
        ("exclamation mark", "!"),
        ("colon", ":"),
        ("semicolon", ";"),
        ("open quote", " \""),
        ("close quote", "\" "),
    ]
    .map(|(phrase, replacement)| (phrase.to_string(), replacement.to_string()))
    .to_vec()
}
