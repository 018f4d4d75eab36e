use crate::text::rules::{CommandAction, FormattingRules};

use tracing::{debug, instrument};

/// Transforms raw transcripts into delivery-ready text.
///
/// The pipeline tokenizes the transcript, substitutes spoken-command
/// phrases, strips filler words outside command spans, then regroups the
/// remaining sentences into paragraphs. Deterministic for identical input
/// and rules.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    rules: FormattingRules,
}

#[derive(Debug, PartialEq, Eq)]
enum BreakKind {
    Line,
    Paragraph,
}

/// One word as spoken plus its normalized form used for rule matching.
#[derive(Debug)]
struct WordToken {
    raw: String,
    norm: String,
}

#[derive(Debug)]
enum Segment {
    Run(Vec<WordToken>),
    Break(BreakKind),
}

#[derive(Debug)]
enum Piece {
    Word(String),
    Trailing(String),
    Leading(String),
    LineBreak,
    ParagraphBreak,
}

impl TextFormatter {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }

    /// Formats one transcript. Empty input (or input that is nothing but
    /// fillers) produces an empty string.
    #[instrument(skip(self, transcript))]
    pub fn format(&self, transcript: &str) -> String {
        let segments = tokenize(transcript);
        let pieces = self.substitute(&segments);
        let output = self.assemble(&pieces);

        debug!(
            input_len = transcript.len(),
            output_len = output.len(),
            "Transcript formatted"
        );

        output
    }

    /// Applies command substitution and filler removal.
    ///
    /// Commands are matched greedily, longest phrase first, and consume
    /// their words whole; filler stripping only ever sees words outside a
    /// matched command span.
    fn substitute(&self, segments: &[Segment]) -> Vec<Piece> {
        let mut pieces = Vec::new();

        for segment in segments {
            match segment {
                Segment::Break(BreakKind::Line) => pieces.push(Piece::LineBreak),
                Segment::Break(BreakKind::Paragraph) => pieces.push(Piece::ParagraphBreak),
                Segment::Run(words) => {
                    let norms: Vec<&str> = words.iter().map(|w| w.norm.as_str()).collect();
                    let mut i = 0;
                    while i < words.len() {
                        if let Some((action, consumed)) = self.rules.match_command(&norms[i..]) {
                            pieces.push(match action {
                                CommandAction::TrailingSymbol(s) => Piece::Trailing(s.clone()),
                                CommandAction::LeadingSymbol(s) => Piece::Leading(s.clone()),
                                CommandAction::LineBreak => Piece::LineBreak,
                                CommandAction::ParagraphBreak => Piece::ParagraphBreak,
                            });
                            i += consumed;
                        } else if self.rules.is_filler(norms[i]) {
                            i += 1;
                        } else {
                            pieces.push(Piece::Word(words[i].raw.clone()));
                            i += 1;
                        }
                    }
                }
            }
        }

        pieces
    }

    /// Joins pieces into paragraphs, breaking on explicit paragraph
    /// commands and on the configured sentence/length thresholds. Threshold
    /// checks only run when a sentence completes, so a paragraph never
    /// splits mid-sentence.
    fn assemble(&self, pieces: &[Piece]) -> String {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut sentences = 0usize;
        let mut prefix = String::new();

        for piece in pieces {
            match piece {
                Piece::Word(word) => {
                    if !current.is_empty() && !current.ends_with('\n') {
                        current.push(' ');
                    }
                    current.push_str(&prefix);
                    prefix.clear();
                    current.push_str(word);
                    if ends_sentence(&current) {
                        sentences += 1;
                        if self.over_threshold(&current, sentences) {
                            flush(&mut paragraphs, &mut current, &mut sentences);
                        }
                    }
                }
                Piece::Trailing(symbol) => {
                    current.push_str(symbol);
                    if ends_sentence(&current) {
                        sentences += 1;
                        if self.over_threshold(&current, sentences) {
                            flush(&mut paragraphs, &mut current, &mut sentences);
                        }
                    }
                }
                Piece::Leading(symbol) => prefix.push_str(symbol),
                Piece::LineBreak => {
                    take_prefix(&mut current, &mut prefix);
                    if !current.is_empty() && !current.ends_with('\n') {
                        current.push('\n');
                    }
                }
                Piece::ParagraphBreak => {
                    take_prefix(&mut current, &mut prefix);
                    flush(&mut paragraphs, &mut current, &mut sentences);
                }
            }
        }

        take_prefix(&mut current, &mut prefix);
        flush(&mut paragraphs, &mut current, &mut sentences);

        paragraphs.join("\n\n")
    }

    fn over_threshold(&self, current: &str, sentences: usize) -> bool {
        if let Some(max) = self.rules.max_paragraph_sentences()
            && sentences >= max
        {
            return true;
        }
        if let Some(max) = self.rules.max_paragraph_chars()
            && current.len() >= max
        {
            return true;
        }
        false
    }
}

/// Splits the transcript into word runs and explicit break tokens. A
/// whitespace run containing two or more newlines is a paragraph break,
/// one newline is a line break. Leading and trailing whitespace is
/// dropped.
fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run: Vec<WordToken> = Vec::new();
    let mut word = String::new();
    let mut pending_newlines: Option<usize> = None;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                run.push(WordToken::new(std::mem::take(&mut word)));
            }
            let newlines = pending_newlines.get_or_insert(0);
            if ch == '\n' {
                *newlines += 1;
            }
        } else {
            if let Some(newlines) = pending_newlines.take()
                && newlines > 0
                && !(run.is_empty() && segments.is_empty())
            {
                if !run.is_empty() {
                    segments.push(Segment::Run(std::mem::take(&mut run)));
                }
                segments.push(Segment::Break(if newlines >= 2 {
                    BreakKind::Paragraph
                } else {
                    BreakKind::Line
                }));
            }
            word.push(ch);
        }
    }

    if !word.is_empty() {
        run.push(WordToken::new(word));
    }
    if !run.is_empty() {
        segments.push(Segment::Run(run));
    }

    segments
}

impl WordToken {
    fn new(raw: String) -> Self {
        let norm = raw
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        Self { raw, norm }
    }
}

fn ends_sentence(text: &str) -> bool {
    text.ends_with(['.', '!', '?'])
}

fn flush(paragraphs: &mut Vec<String>, current: &mut String, sentences: &mut usize) {
    let text = tighten_punctuation(current.trim());
    if !text.is_empty() {
        paragraphs.push(text);
    }
    current.clear();
    *sentences = 0;
}

/// Removes spaces left hanging before punctuation, so a transcript like
/// "hello , world ." tightens to "hello, world.".
fn tighten_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, ',' | '.' | ';' | ':' | '!' | '?') {
            while out.ends_with(' ') {
                out.pop();
            }
        }
        out.push(ch);
    }
    out
}

/// A leading symbol with no word left to attach to is emitted standalone.
fn take_prefix(current: &mut String, prefix: &mut String) {
    if prefix.is_empty() {
        return;
    }
    if !current.is_empty() && !current.ends_with('\n') {
        current.push(' ');
    }
    current.push_str(prefix);
    prefix.clear();
}
