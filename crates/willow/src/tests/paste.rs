use crate::{
    config::PasteConfig,
    paste_dispatcher::{AppFilter, NoticeLatch, apply_paste_options},
};

fn apps(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// WHAT: A non-empty allow list denies every unlisted application
/// WHY: Allow mode is the strict one; only named targets receive text
#[test]
fn given_allow_list_when_focused_app_not_listed_then_denied() {
    let filter = AppFilter::from_lists(&apps(&["Notes"]), &[]);

    assert!(filter.permits(Some("Notes")));
    assert!(!filter.permits(Some("Mail")));
}

/// WHAT: A deny list only blocks the listed applications
/// WHY: Deny mode protects specific targets (password managers) while
///      everything else keeps working
#[test]
fn given_deny_list_when_focused_app_not_listed_then_permitted() {
    let filter = AppFilter::from_lists(&[], &apps(&["1Password"]));

    assert!(!filter.permits(Some("1Password")));
    assert!(filter.permits(Some("Notes")));
}

/// WHAT: The allow list wins when both lists are configured
/// WHY: Two active modes would make the filter ambiguous
#[test]
fn given_both_lists_when_built_then_allow_mode_wins() {
    let filter = AppFilter::from_lists(&apps(&["Notes"]), &apps(&["Notes"]));

    assert_eq!(filter, AppFilter::Allow(vec!["notes".to_string()]));
    assert!(filter.permits(Some("Notes")));
    assert!(!filter.permits(Some("Mail")));
}

/// WHAT: Matching ignores case and surrounding whitespace in config
/// WHY: Users type app names loosely; "notes" must match "Notes"
#[test]
fn given_mixed_case_entries_when_matching_then_case_insensitive() {
    let filter = AppFilter::from_lists(&apps(&["  NOTES  "]), &[]);

    assert!(filter.permits(Some("notes")));
    assert!(filter.permits(Some("Notes")));
}

/// WHAT: An unknown focused app fails an allow list but passes a deny list
/// WHY: An allow list grants nothing it cannot verify; a deny list only
///      blocks what it can name
#[test]
fn given_unknown_focused_app_when_filtered_then_mode_decides() {
    assert!(AppFilter::from_lists(&[], &[]).permits(None));
    assert!(!AppFilter::from_lists(&apps(&["Notes"]), &[]).permits(None));
    assert!(AppFilter::from_lists(&[], &apps(&["1Password"])).permits(None));
}

/// WHAT: Default options trim the leading space and append one trailing space
/// WHY: Whisper emits a leading space, and a trailing space lets
///      consecutive dictations read naturally
#[test]
fn given_default_options_when_applied_then_leading_trimmed_trailing_space() {
    let options = PasteConfig::default();

    assert_eq!(apply_paste_options(" hello world.", &options), "hello world. ");
}

/// WHAT: Newline appending follows the trailing space
/// WHY: Both adjustments are independent toggles
#[test]
fn given_newline_and_space_when_applied_then_space_before_newline() {
    let options = PasteConfig {
        append_newline: true,
        append_space: true,
        trim_leading_space: false,
        ..PasteConfig::default()
    };

    assert_eq!(apply_paste_options("done", &options), "done \n");
}

/// WHAT: The injection-failure notice fires exactly once per run
/// WHY: The first failed paste notifies the user; every repeat of the
///      same cause must downgrade to a log line
#[test]
fn given_repeated_injection_failures_when_latched_then_notified_once() {
    let mut latch = NoticeLatch::default();

    assert!(latch.first());
    assert!(!latch.first());
    assert!(!latch.first());
}

/// WHAT: With every adjustment off, text passes through untouched
/// WHY: The options must be opt-in, not baked into the pipeline
#[test]
fn given_all_options_off_when_applied_then_text_unchanged() {
    let options = PasteConfig {
        append_newline: false,
        append_space: false,
        trim_leading_space: false,
        ..PasteConfig::default()
    };

    assert_eq!(apply_paste_options(" as spoken ", &options), " as spoken ");
}
