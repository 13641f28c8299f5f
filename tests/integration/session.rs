//! Session loop integration tests

use evalloop::{EngineManager, EvalLoop, MemoryConsole, ReplError, ReplSettings, Value, ValueKind};

use crate::common::{calc_session, run_calc};

#[test]
fn test_two_plus_two() {
    let (repl, console) = run_calc(&["2+2"]);

    assert_eq!(console.output(), "000 ==> 4\n");
    assert_eq!(repl.session().output_count(), 1);
    assert_eq!(repl.bindings().last_result(), Some(&Value::Int(4)));
    assert_eq!(console.prompts(), vec!["calc:000> ", "calc:001> "]);
}

#[test]
fn test_prompt_change_applies_to_following_lines() {
    let (_, console) = run_calc(&["::prompt >> ", "::prompt $l:$i> ", "1"]);

    assert_eq!(
        console.prompts(),
        vec!["calc:000> ", ">> ", "calc:002> ", "calc:003> "]
    );
}

#[test]
fn test_prompt_directives() {
    let (_, console) = run_calc(&["::prompt $e$S[$i]$$ "]);
    assert_eq!(console.prompts()[1], "Calc Interpreter [001]$ ");
}

#[test]
fn test_null_result_prints_nothing() {
    let (repl, console) = run_calc(&["y = 3", "", "y"]);

    assert_eq!(console.output(), "000 ==> 3\n");
    assert_eq!(repl.session().output_count(), 1);
    assert_eq!(repl.session().input_count(), 3);
}

#[test]
fn test_last_result_binding() {
    let (repl, console) = run_calc(&["6 * 7", "_ + 1", "x = 10", "_"]);

    assert_eq!(console.output_lines(), vec!["000 ==> 42", "001 ==> 43", "002 ==> 43"]);
    assert_eq!(repl.bindings().get("x"), Some(&Value::Int(10)));
}

#[test]
fn test_quit_stops_before_next_read() {
    let (repl, console) = run_calc(&["1", "::quit", "2"]);

    assert_eq!(console.output(), "000 ==> 1\n");
    assert_eq!(console.prompts().len(), 2);
    assert!(!repl.session().is_running());
}

#[test]
fn test_run_can_resume_after_quit() {
    let (mut repl, console) = run_calc(&["::quit"]);
    console.push_line("5");
    repl.run().unwrap();
    assert_eq!(console.output(), "000 ==> 5\n");
}

#[test]
fn test_custom_printer() {
    let (mut repl, console) = calc_session(&["1.0 / 3", "1 / 3 * 3"]);
    repl.add_printer(ValueKind::Float, |value, console| {
        writeln!(console, "{:.3}", value.as_f64().unwrap_or_default())
    });
    repl.run().unwrap();

    assert_eq!(console.output_lines(), vec!["000 ==> 0.333", "001 ==> 1.000"]);
}

#[test]
fn test_custom_output_prefix() {
    let (mut repl, console) = calc_session(&["\"a\" + 1"]);
    repl.set_output_prefix(" -> ");
    repl.run().unwrap();
    assert_eq!(console.output(), "000 -> a1\n");
}

#[test]
fn test_from_settings() {
    let console = MemoryConsole::new(["3 4 +", "::stream.limit"]);
    let settings = ReplSettings {
        prompt: "$e> ".to_string(),
        output_prefix: ": ".to_string(),
        command_prefix: "%".to_string(),
        stream_limit: 9,
        number_lines: true,
        default_engine: "rpn".to_string(),
    };

    let mut repl =
        EvalLoop::from_settings(EngineManager::with_builtin_engines(), &settings, Box::new(console.clone()))
            .unwrap();
    repl.step("%stream.limit").unwrap();
    repl.run().unwrap();

    assert_eq!(console.prompts()[0], "Stack Calculator> ");
    assert_eq!(console.output_lines()[0], "stream.limit = 9");
    assert_eq!(console.output_lines()[1], "000: 7");
    assert!(repl.session().printer().stream().numbering());
}

#[test]
fn test_from_settings_rejects_unknown_engine() {
    let settings = ReplSettings {
        default_engine: "cobol".to_string(),
        ..ReplSettings::default()
    };
    let result = EvalLoop::from_settings(
        EngineManager::with_builtin_engines(),
        &settings,
        Box::new(MemoryConsole::default()),
    );
    assert!(matches!(result, Err(ReplError::UnknownEvaluator(id)) if id == "cobol"));
}

#[test]
fn test_from_settings_rejects_bad_prompt() {
    let settings = ReplSettings {
        prompt: "$".to_string(),
        ..ReplSettings::default()
    };
    let result = EvalLoop::from_settings(
        EngineManager::with_builtin_engines(),
        &settings,
        Box::new(MemoryConsole::default()),
    );
    assert!(matches!(result, Err(ReplError::InvalidTemplate { position: 0, .. })));
}
