use crate::{FormattingRules, TextFormatter};

fn formatter(rules: FormattingRules) -> TextFormatter {
    TextFormatter::new(rules)
}

fn default_formatter() -> TextFormatter {
    formatter(FormattingRules::default())
}

/// WHAT: Fillers are stripped and spoken commands substituted in one pass
/// WHY: This is the canonical dictation scenario the formatter exists for
#[test]
fn given_fillers_and_commands_when_formatting_then_two_clean_paragraphs() {
    // Given: Rules stripping "um"/"basically" with the stock command table
    let rules = FormattingRules::new(
        ["um".to_string(), "basically".to_string()],
        crate::default_spoken_commands(),
        Some(2),
        None,
    );
    let formatter = formatter(rules);

    // When: Formatting a transcript with fillers and a paragraph command
    let output = formatter
        .format("um so basically the plan is good new paragraph let's ship it period");

    // Then: Two paragraphs, fillers gone, period attached
    assert_eq!(output, "so the plan is good\n\nlet's ship it.");
}

/// WHAT: Formatting already-clean text changes nothing
/// WHY: Idempotence means a second pass can never corrupt delivered text
#[test]
fn given_clean_text_when_formatted_twice_then_output_unchanged() {
    let formatter = default_formatter();
    let input = "so the plan is good\n\nlet's ship it.";

    let once = formatter.format(input);
    let twice = formatter.format(&once);

    assert_eq!(once, input);
    assert_eq!(twice, once);
}

/// WHAT: Empty transcript yields empty output
/// WHY: Downstream must see emptiness and skip the paste entirely
#[test]
fn given_empty_transcript_when_formatting_then_empty_output() {
    let formatter = default_formatter();

    assert_eq!(formatter.format(""), "");
    assert_eq!(formatter.format("   \n  "), "");
}

/// WHAT: A transcript of nothing but fillers yields empty output
/// WHY: Pure disfluency must not produce a paste
#[test]
fn given_only_fillers_when_formatting_then_empty_output() {
    let formatter = default_formatter();

    assert_eq!(formatter.format("um uh uhh ahh um-hmm"), "");
}

/// WHAT: Sentences under the grouping thresholds stay in one paragraph
/// WHY: The length heuristic must not split short dictation
#[test]
fn given_short_sentences_under_threshold_when_formatting_then_one_paragraph() {
    let rules = FormattingRules::new(
        crate::default_filler_words(),
        crate::default_spoken_commands(),
        Some(10),
        None,
    );
    let formatter = formatter(rules);

    let output = formatter.format("First thought period Second thought period Third period");

    assert_eq!(output, "First thought. Second thought. Third.");
    assert!(!output.contains("\n"));
}

/// WHAT: An explicit paragraph command always splits, regardless of length
/// WHY: "new paragraph" is a hard boundary, not a hint
#[test]
fn given_paragraph_command_when_under_threshold_then_still_two_paragraphs() {
    let rules = FormattingRules::new(
        crate::default_filler_words(),
        crate::default_spoken_commands(),
        Some(100),
        Some(100_000),
    );
    let formatter = formatter(rules);

    let output = formatter.format("short new paragraph also short");

    assert_eq!(output, "short\n\nalso short");
}

/// WHAT: The sentence-count threshold groups two sentences per paragraph
/// WHY: Matches the default auto-paragraphing behavior
#[test]
fn given_three_sentences_when_threshold_is_two_then_split_after_second() {
    let formatter = default_formatter();

    let output = formatter.format("One period Two period Three period");

    assert_eq!(output, "One. Two.\n\nThree.");
}

/// WHAT: The character threshold forces a break at a sentence boundary
/// WHY: Long dictation must wrap even when sentence count stays low
#[test]
fn given_long_sentence_when_over_char_threshold_then_paragraph_break() {
    let rules = FormattingRules::new(
        crate::default_filler_words(),
        crate::default_spoken_commands(),
        None,
        Some(20),
    );
    let formatter = formatter(rules);

    let output = formatter.format("this first sentence runs long period short period");

    assert_eq!(output, "this first sentence runs long.\n\nshort.");
}

/// WHAT: Quote commands attach to the correct side of the adjacent word
/// WHY: "open quote" glues left of the next word, "close quote" right of
/// the previous
#[test]
fn given_quote_commands_when_formatting_then_symbols_attach_correctly() {
    let formatter = default_formatter();

    let output = formatter.format("she said open quote hello there close quote period");

    assert_eq!(output, "she said \"hello there\".");
}

/// WHAT: "new line" breaks the line without starting a new paragraph
/// WHY: Line and paragraph breaks are distinct formatting actions
#[test]
fn given_newline_command_when_formatting_then_single_line_break() {
    let formatter = default_formatter();

    let output = formatter.format("first line new line second line");

    assert_eq!(output, "first line\nsecond line");
}

/// WHAT: Literal stray punctuation is tightened against the previous word
/// WHY: Whisper sometimes emits " ," and " ." as separate tokens
#[test]
fn given_detached_punctuation_when_formatting_then_tightened() {
    let formatter = default_formatter();

    let output = formatter.format("hello , world .");

    assert_eq!(output, "hello, world.");
}

/// WHAT: Filler words inside prose are stripped case-insensitively
/// WHY: Whisper capitalizes sentence-initial disfluencies
#[test]
fn given_capitalized_filler_when_formatting_then_stripped() {
    let formatter = default_formatter();

    let output = formatter.format("Um so this works");

    assert_eq!(output, "so this works");
}

/// WHAT: A command phrase interrupted by other words is not matched
/// WHY: Commands consume contiguous tokens only; no lookahead across words
#[test]
fn given_interrupted_command_phrase_when_formatting_then_words_kept_literal() {
    let formatter = default_formatter();

    let output = formatter.format("a full sized stop sign");

    assert_eq!(output, "a full sized stop sign");
}
