use crate::FormattingRules;
use crate::text::rules::CommandAction;

fn rules_with(fillers: &[&str], commands: &[(&str, &str)]) -> FormattingRules {
    FormattingRules::new(
        fillers.iter().map(|s| s.to_string()),
        commands
            .iter()
            .map(|(p, r)| (p.to_string(), r.to_string())),
        Some(2),
        None,
    )
}

/// WHAT: A trailing `+` on a filler entry absorbs a stretched final letter
/// WHY: Whisper renders drawn-out disfluencies as "uhh", "uhhh", etc.
#[test]
fn given_plus_suffixed_filler_when_matching_then_stretched_variants_stripped() {
    let rules = rules_with(&["uh+"], &[]);

    assert!(rules.is_filler("uh"));
    assert!(rules.is_filler("uhh"));
    assert!(rules.is_filler("uhhhh"));
}

/// WHAT: Filler matching is whole-word, never substring
/// WHY: "um" must not eat words like "umbrella" or compounds like "uhm"
#[test]
fn given_filler_entry_when_matching_other_words_then_no_substring_match() {
    let rules = rules_with(&["um+", "uh+"], &[]);

    assert!(!rules.is_filler("umbrella"));
    assert!(!rules.is_filler("uhm"));
    assert!(!rules.is_filler("summer"));
}

/// WHAT: Hyphenated filler variants match as their own listed entries
/// WHY: Compounds like "uh-huh" are matched explicitly, not by substring
#[test]
fn given_hyphenated_entry_when_matching_then_exact_token_required() {
    let rules = rules_with(&["uh-huh"], &[]);

    assert!(rules.is_filler("uh-huh"));
    assert!(!rules.is_filler("uh"));
}

/// WHAT: The longest command phrase wins over a shorter prefix
/// WHY: "full stop" must not be half-consumed by a one-word "full" rule
#[test]
fn given_overlapping_phrases_when_matching_then_longest_consumed() {
    let rules = rules_with(&[], &[("full", "!"), ("full stop", ".")]);

    let (action, consumed) = rules
        .match_command(&["full", "stop", "there"])
        .unwrap_or_else(|| panic!("expected a command match"));

    assert_eq!(consumed, 2);
    assert_eq!(*action, CommandAction::TrailingSymbol(".".to_string()));
}

/// WHAT: Replacement strings classify into the four command actions
/// WHY: The formatter's attachment behavior hangs off this classification
#[test]
fn given_replacement_strings_when_compiled_then_actions_classified() {
    let rules = rules_with(
        &[],
        &[
            ("new paragraph", "\n\n"),
            ("new line", "\n"),
            ("open quote", " \""),
            ("close quote", "\" "),
        ],
    );

    let action = |words: &[&str]| {
        rules
            .match_command(words)
            .map(|(a, _)| a.clone())
            .unwrap_or_else(|| panic!("expected a match for {words:?}"))
    };

    assert_eq!(action(&["new", "paragraph"]), CommandAction::ParagraphBreak);
    assert_eq!(action(&["new", "line"]), CommandAction::LineBreak);
    assert_eq!(
        action(&["open", "quote"]),
        CommandAction::LeadingSymbol("\"".to_string())
    );
    assert_eq!(
        action(&["close", "quote"]),
        CommandAction::TrailingSymbol("\"".to_string())
    );
}

/// WHAT: Unmatched words produce no command
/// WHY: Ordinary prose must pass through untouched
#[test]
fn given_plain_words_when_matching_then_none() {
    let rules = FormattingRules::default();

    assert!(rules.match_command(&["hello", "world"]).is_none());
}

/// WHAT: The stock tables cover the documented spoken vocabulary
/// WHY: Defaults are the contract users get without any configuration
#[test]
fn given_default_rules_when_matching_stock_phrases_then_recognized() {
    let rules = FormattingRules::default();

    assert!(rules.is_filler("um"));
    assert!(rules.is_filler("ahh"));
    assert!(rules.match_command(&["period"]).is_some());
    assert!(rules.match_command(&["question", "mark"]).is_some());
    assert!(rules.match_command(&["next", "paragraph"]).is_some());
}
