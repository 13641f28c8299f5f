//! Evaluator hot-swap integration tests

use evalloop::{ReplError, Value};

use crate::common::{calc_session, run_calc, FaultyFactory};

#[test]
fn test_swap_keeps_bindings() {
    let (repl, console) = run_calc(&["x = 6", "::setEngine rpn", "x 7 *", "::setEngine calc", "_ + 1"]);

    assert_eq!(console.output_lines(), vec!["000 ==> 42", "001 ==> 43"]);
    assert_eq!(
        console.prompts(),
        vec!["calc:000> ", "calc:001> ", "rpn:002> ", "rpn:003> ", "calc:004> ", "calc:005> "]
    );
    assert_eq!(repl.bindings().get("x"), Some(&Value::Int(6)));
}

#[test]
fn test_rpn_binding_visible_in_calc() {
    let (_, console) = run_calc(&["::setEngine stack", "2 3 + =five", "::setEngine calc", "five * 2"]);
    assert_eq!(console.output_lines(), vec!["000 ==> 10"]);
}

#[test]
fn test_swap_by_engine_name() {
    let (repl, _) = run_calc(&["::setEngine Stack Calculator"]);
    assert_eq!(repl.engine().info().language_name, "rpn");
}

#[test]
fn test_unknown_engine_leaves_state_unchanged() {
    let (repl, console) = run_calc(&["x = 5", "::setEngine cobol", "x"]);

    assert_eq!(console.output_lines(), vec!["No such engine: cobol", "000 ==> 5"]);
    assert_eq!(repl.engine().info().language_name, "calc");
    assert_eq!(repl.bindings().len(), 2);
    assert!(matches!(
        repl.session().last_error(),
        Some(ReplError::UnknownEvaluator(id)) if id == "cobol"
    ));
}

#[test]
fn test_swap_api_direct() {
    let (mut repl, _) = calc_session(&[]);
    repl.bindings_mut().set("k", Value::Int(3));

    assert!(matches!(repl.swap_engine("nope"), Err(ReplError::UnknownEvaluator(_))));
    repl.swap_engine("rpn").unwrap();

    assert_eq!(repl.engine().info().engine_name, "Stack Calculator");
    assert_eq!(repl.bindings().get("k"), Some(&Value::Int(3)));
}

#[test]
fn test_engines_command_lists_registered_factories() {
    let (mut repl, console) = calc_session(&["::engines"]);
    repl.engines_mut().register(Box::new(FaultyFactory));
    repl.run().unwrap();

    assert_eq!(
        console.output_lines(),
        vec![
            "calc: Calc Interpreter [calc]",
            "rpn: Stack Calculator [rpn, stack]",
            "faulty: Faulty Engine [faulty]"
        ]
    );
}
