//! Tests for the prompt module

use super::*;
use test_case::test_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Size {
    Small,
    Large,
}

const SIZES: [Choice<Size>; 2] = [
    Choice::new(Size::Small, "SMALL", "the small one"),
    Choice::new(Size::Large, "LARGE", "the large one"),
];

#[test]
fn test_select_by_number() {
    let mut prompter = ScriptedPrompter::new(["2"]);
    let size = select(&mut prompter, "Pick a size:", &SIZES, Some(0)).unwrap();
    assert_eq!(size, Size::Large);
    assert!(prompter.was_shown("1. SMALL - the small one"));
}

#[test]
fn test_select_by_label_case_insensitive() {
    let mut prompter = ScriptedPrompter::new(["large"]);
    let size = select(&mut prompter, "Pick a size:", &SIZES, None).unwrap();
    assert_eq!(size, Size::Large);
}

#[test]
fn test_select_empty_uses_default() {
    let mut prompter = ScriptedPrompter::new([""]);
    let size = select(&mut prompter, "Pick a size:", &SIZES, Some(0)).unwrap();
    assert_eq!(size, Size::Small);
}

#[test]
fn test_select_rejects_then_accepts() {
    let mut prompter = ScriptedPrompter::new(["7", "medium", "", "1"]);
    let size = select(&mut prompter, "Pick a size:", &SIZES, None).unwrap();

    assert_eq!(size, Size::Small);
    assert_eq!(prompter.count_shown("Please try again"), 3);
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_select_never_coerces_invalid_input() {
    let mut prompter = ScriptedPrompter::new(["9"]);
    let result = select(&mut prompter, "Pick a size:", &SIZES, Some(0));

    // The script ran out while the question was still open
    assert!(matches!(result, Err(crate::Error::Prompt { .. })));
}

#[test]
fn test_ask_until_reports_reason() {
    let mut prompter = ScriptedPrompter::new(["abc", "42"]);
    let n: u32 = ask_until(&mut prompter, "Number", |a| {
        a.parse().map_err(|_| format!("'{a}' is not a number"))
    })
    .unwrap();

    assert_eq!(n, 42);
    assert!(prompter.was_shown("'abc' is not a number"));
}

#[test_case("yes", Some(true))]
#[test_case("Y", Some(true))]
#[test_case("no", Some(false))]
#[test_case("n", Some(false))]
#[test_case("sure", None)]
fn test_parse_yes_no(answer: &str, expected: Option<bool>) {
    assert_eq!(parse_yes_no(answer), expected);
}

#[test]
fn test_scripted_confirm() {
    let mut prompter = ScriptedPrompter::new(["yes", "", "maybe"]);
    assert!(prompter.confirm("Proceed?").unwrap());
    assert!(!prompter.confirm("Proceed?").unwrap());
    assert!(prompter.confirm("Proceed?").is_err());
}

#[test]
fn test_scripted_records_prompts() {
    let mut prompter = ScriptedPrompter::new(["alice@example.com"]);
    prompter.say("hello");
    let answer = prompter.input("Email").unwrap();

    assert_eq!(answer, "alice@example.com");
    assert_eq!(prompter.transcript(), ["hello", "? Email"]);
}
