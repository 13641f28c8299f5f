//! Command dispatch integration tests

use evalloop::{Command, EngineManager, EvalLoop, ReplError};

use crate::common::{calc_session, run_calc, Counting};

#[test]
fn test_unknown_command_never_reaches_evaluator() {
    let (evaluator, calls) = Counting::new();
    let console = evalloop::MemoryConsole::new(["::frobnicate", "::frobnicate now", "hello"]);
    let mut repl = EvalLoop::new(EngineManager::new(), Box::new(evaluator), Box::new(console.clone()));
    repl.run().unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(
        console.output_lines(),
        vec!["No such command: frobnicate", "No such command: frobnicate", "000 ==> hello"]
    );
    assert!(matches!(
        repl.session().last_error(),
        Some(ReplError::UnknownCommand(name)) if name == "frobnicate"
    ));
}

#[test]
fn test_add_command_receives_verbatim_argument() {
    let (mut repl, console) = calc_session(&["::echo  two  spaces ", "::echo"]);
    repl.add_command(Command::new("echo", "echo [text]", "Echo text", |repl, arg| {
        writeln!(repl.console(), "[{}]", arg.unwrap_or("<none>"))?;
        Ok(())
    }));
    repl.run().unwrap();

    assert_eq!(console.output_lines(), vec!["[ two  spaces ]", "[<none>]"]);
}

#[test]
fn test_command_can_replace_builtin() {
    let (mut repl, console) = calc_session(&["::quit", "1"]);
    repl.add_command(Command::new("quit", "quit", "Refuse to quit", |repl, _| {
        writeln!(repl.console(), "not yet")?;
        Ok(())
    }));
    repl.run().unwrap();

    assert_eq!(console.output_lines(), vec!["not yet", "000 ==> 1"]);
}

#[test]
fn test_command_mutates_bindings() {
    let (mut repl, console) = calc_session(&["::zero n", "n + 1"]);
    repl.add_command(Command::new("zero", "zero <name>", "Bind a name to 0", |repl, arg| {
        let name = arg.unwrap_or("_").trim().to_string();
        repl.bindings_mut().set(name, evalloop::Value::Int(0));
        Ok(())
    }));
    repl.run().unwrap();

    assert_eq!(console.output(), "000 ==> 1\n");
}

#[test]
fn test_describe_function_binding() {
    let (_, console) = run_calc(&["f = range", "::describe f", "::describe g"]);
    assert_eq!(
        console.output_lines(),
        vec!["type(f) = Function", "f.call[2]", "g = null"]
    );
}

#[test]
fn test_bindings_after_evaluation() {
    let (_, console) = run_calc(&["a = 1", "b = \"x\"", "[a, b]", "::bindings"]);
    assert_eq!(
        console.output_lines(),
        vec!["000 ==> [1, x]", "a: Int", "b: Str", "_: List"]
    );
}

#[test]
fn test_stacktrace_after_evaluation_failure() {
    let (_, console) = run_calc(&["1/0", "::stacktrace"]);
    let output = console.output();
    assert!(output.starts_with("division by zero\ndivision by zero\n"));
    assert!(output.contains("Runtime("));
}

#[test]
fn test_stacktrace_shows_cause_chain() {
    let (_, console) = run_calc(&["::stream.limit lots", "::stacktrace"]);
    let lines = console.output_lines();
    assert_eq!(lines[0], "Caught exception: invalid stream.limit 'lots'");
    let detail = lines[1..].join("\n");
    assert!(detail.contains("Caused by"));
    assert!(detail.contains("invalid digit"));
}

#[test]
fn test_custom_command_prefix() {
    let (mut repl, console) = calc_session(&["::quit", "/quit", "1"]);
    repl.session_mut().set_command_prefix("/");
    repl.run().unwrap();

    // `::quit` is not a command under `/` and goes to the evaluator
    assert_eq!(console.output_lines().len(), 1);
    assert!(console.output_lines()[0].contains("column 1"));
    assert_eq!(console.prompts().len(), 2);
}
