//! Stream pagination integration tests

use crate::common::run_calc;

const PAUSE_2: &str = "Line 2. Press enter key to continue.";
const PAUSE_4: &str = "Line 4. Press enter key to continue.";

#[test]
fn test_limit_two_pauses_twice_for_five_items() {
    let (_, console) = run_calc(&["::stream.limit 2", "range(0, 5)", "", ""]);

    assert_eq!(console.output(), "000 ==> 0\n1\n2\n3\n4\n");
    assert_eq!(
        console.prompts(),
        vec!["calc:000> ", "calc:001> ", PAUSE_2, PAUSE_4, "calc:002> "]
    );
}

#[test]
fn test_default_limit_does_not_pause_short_streams() {
    let (_, console) = run_calc(&["range(0, 100)"]);
    assert_eq!(console.output_lines().len(), 100);
    assert_eq!(console.prompts().len(), 2);
}

#[test]
fn test_numbered_lines() {
    let (_, console) = run_calc(&["::stream.toggleNumLines", "range(5, 8)"]);
    assert_eq!(
        console.output_lines(),
        vec!["Line numbering on", "000 ==> 0 5", "1 6", "2 7"]
    );
}

#[test]
fn test_unbounded_stream_stops_at_end_of_input() {
    let (repl, console) = run_calc(&["::stream.limit 2", "naturals()", ""]);

    assert_eq!(console.output(), "000 ==> 0\n1\n2\n3\n");
    assert_eq!(
        console.prompts(),
        vec!["calc:000> ", "calc:001> ", PAUSE_2, PAUSE_4, "calc:002> "]
    );
    assert_eq!(repl.session().output_count(), 1);
}

#[test]
fn test_empty_stream_prints_only_header() {
    let (_, console) = run_calc(&["range(3, 3)", "1"]);
    assert_eq!(console.output(), "000 ==> 001 ==> 1\n");
}

#[test]
fn test_list_commands_is_paginated() {
    let (_, console) = run_calc(&["::stream.limit 4", "::listCommands", "", ""]);

    assert_eq!(console.output_lines().len(), 10);
    let pauses: Vec<String> = console
        .prompts()
        .into_iter()
        .filter(|p| p.starts_with("Line "))
        .collect();
    assert_eq!(
        pauses,
        vec![
            "Line 4. Press enter key to continue.",
            "Line 8. Press enter key to continue."
        ]
    );
}
