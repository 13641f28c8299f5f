//! Error handling integration tests
//!
//! No failure inside a line may end the session.

use evalloop::{EngineManager, EvalLoop, MemoryConsole, ReplError};

use crate::common::{run_calc, FaultyFactory};

fn faulty_session(lines: &[&str]) -> (EvalLoop, MemoryConsole) {
    let console = MemoryConsole::new(lines.iter().copied());
    let mut engines = EngineManager::new();
    engines.register(Box::new(FaultyFactory));
    let engine = engines.by_id("faulty").unwrap();
    let mut repl = EvalLoop::new(engines, engine, Box::new(console.clone()));
    repl.run().unwrap();
    (repl, console)
}

#[test]
fn test_input_counter_advances_on_failures() {
    let (repl, console) = run_calc(&["1/0", "undefined_thing", "(", "1"]);

    assert_eq!(
        console.output_lines(),
        vec![
            "division by zero",
            "undefined name 'undefined_thing'",
            "unexpected end of input (column 2)",
            "000 ==> 1"
        ]
    );
    assert_eq!(console.prompts().last().map(String::as_str), Some("calc:004> "));
    assert_eq!(repl.session().input_count(), 4);
    assert_eq!(repl.session().output_count(), 1);
}

#[test]
fn test_structured_failure_reports_message_only() {
    let (repl, console) = faulty_session(&["syntax"]);
    assert_eq!(console.output(), "unexpected token (column 4)\n");
    assert!(matches!(repl.session().last_error(), Some(ReplError::Evaluation(_))));
}

#[test]
fn test_internal_failure_is_caught_exception() {
    let (repl, console) = faulty_session(&["internal", "::stacktrace"]);
    let lines = console.output_lines();

    assert_eq!(lines[0], "Caught exception: fetching value");
    assert!(lines[1..].join("\n").contains("lost connection"));
    assert!(matches!(repl.session().last_error(), Some(ReplError::Unexpected(_))));
}

#[test]
fn test_panicking_evaluator_does_not_end_session() {
    let (repl, console) = faulty_session(&["panic", "ok"]);

    assert_eq!(
        console.output_lines(),
        vec!["Caught exception: evaluator panicked: boom", "000 ==> 1"]
    );
    assert_eq!(repl.session().input_count(), 2);
}

#[test]
fn test_failure_while_printing_stream_does_not_end_session() {
    let (repl, console) = faulty_session(&["stream", "ok"]);

    assert_eq!(
        console.output_lines(),
        vec![
            "000 ==> 0",
            "1",
            "Caught exception: printer panicked: item 2 unavailable",
            "000 ==> 1"
        ]
    );
    assert_eq!(repl.session().input_count(), 2);
    assert_eq!(console.prompts().len(), 3);
}

#[test]
fn test_failed_stream_is_not_stored_as_last_result() {
    let (repl, _) = faulty_session(&["stream"]);

    assert!(repl.bindings().last_result().is_none());
    assert_eq!(repl.session().output_count(), 0);
    assert!(matches!(repl.session().last_error(), Some(ReplError::Unexpected(_))));
}

#[test]
fn test_deeply_nested_calc_input_is_reported() {
    let deep = format!("{}1", "-".repeat(200_000));
    let (_, console) = run_calc(&[deep.as_str(), "2+2"]);

    assert_eq!(
        console.output_lines(),
        vec!["expression nested too deeply (column 257)", "000 ==> 4"]
    );
}

#[test]
fn test_last_error_is_replaced() {
    let (repl, _) = run_calc(&["1/0", "::nope"]);
    assert!(matches!(
        repl.session().last_error(),
        Some(ReplError::UnknownCommand(_))
    ));
}

#[test]
fn test_builtin_argument_errors() {
    let (_, console) = run_calc(&["range(1)", "len(3)", "3()"]);
    assert_eq!(
        console.output_lines(),
        vec![
            "range() takes 2 argument(s), got 1",
            "len: len() is not defined for Int",
            "Int is not callable"
        ]
    );
}
