use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fs::{self},
    rc::Rc,
};

use hostbasic::{
    Completion, Context, ContextConfig, Error, ParseError, RegistrationError, RuntimeError,
    Variant, parse, run,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn script_fixtures_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "bas"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                              panic!("Failed to read {expected_path:?}: {e}")
                                                          });

        count += 1;
        let (result, output) = run_captured(&source, &mut Context::new());
        if let Err(e) = result {
            panic!("Script {path:?} failed:\n{source}\nError: {e}");
        }
        assert_eq!(output.join("\n"), expected.trim_end(), "output of {path:?}");
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn readme_examples_work() {
    let content = fs::read_to_string("README.md").expect("README.md should be readable");

    let blocks = extract_dsl_blocks(&content);
    assert!(!blocks.is_empty(), "No hostbasic examples found in README.md");

    for (i, code) in blocks.into_iter().enumerate() {
        let (result, _) = run_captured(&code, &mut Context::new());
        if let Err(e) = result {
            panic!("README example {} failed:\n{}\nError: {:?}", i + 1, code, e);
        }
    }
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```hostbasic") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

/// Runs a script and returns its result together with every printed line.
fn run_captured(src: &str, ctx: &mut Context) -> (Result<Completion, Error>, Vec<String>) {
    let out = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&out);
    ctx.on_print(move |line| sink.borrow_mut().push(line.to_string()))
       .on_error(|_| {})
       .on_log(|_| {});

    let result = run(src, ctx);
    let output = out.borrow().clone();
    (result, output)
}

fn output_of(src: &str) -> Vec<String> {
    match run_captured(src, &mut Context::new()) {
        (Ok(_), output) => output,
        (Err(e), _) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_success(src: &str) {
    if let (Err(e), _) = run_captured(src, &mut Context::new()) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) -> Error {
    match run_captured(src, &mut Context::new()) {
        (Ok(_), _) => panic!("Script succeeded but was expected to fail"),
        (Err(e), _) => e,
    }
}

fn assert_prints(src: &str, expected: &[&str]) {
    assert_eq!(output_of(src), expected);
}

#[test]
fn arithmetic_is_left_associative() {
    assert_prints("PRINT 20 - (30 - 15)", &["5"]);
    assert_prints("PRINT 8 / (4 / 2)", &["4"]);
    assert_prints("PRINT 50 - 30 - 10", &["10"]);
    assert_prints("PRINT 2 + 3 * 4", &["14"]);
    assert_prints("PRINT (2 + 3) * 4", &["20"]);
    assert_prints("PRINT 17 % 5", &["2"]);
}

#[test]
fn numeric_promotion_and_rendering() {
    assert_prints("PRINT 3.2 - 2.1", &["1.1"]);
    assert_prints("PRINT 7 / 2, 7 / 2.0", &["3 3.5"]);
    assert_prints("PRINT 1.5 * 2", &["3"]);
    assert_prints("PRINT -4 + 1", &["-3"]);

    let mut ctx = Context::new();
    run_captured("X = 2 * 3\nY = 2.0 * 3", &mut ctx).0.unwrap();
    assert_eq!(ctx.global("X"), Some(&Variant::Integer(6)));
    assert_eq!(ctx.global("Y"), Some(&Variant::Real(6.0)));
}

#[test]
fn strings_concatenate_and_compare() {
    assert_prints("PRINT \"HP: \" + 12", &["HP: 12"]);
    assert_prints("PRINT 'single' + \" and double\"", &["single and double"]);
    assert_prints("PRINT \"abc\" < \"abd\", \"10\" == 10", &["TRUE TRUE"]);
    assert_prints("PRINT \"\" == UNSET", &["TRUE"]);
}

#[test]
fn booleans_render_as_words() {
    assert_prints("PRINT TRUE, FALSE", &["TRUE FALSE"]);
    assert_prints("PRINT 1 < 2, 2 <= 1, 3 <> 3", &["TRUE FALSE FALSE"]);
    assert_prints("PRINT TRUE AND NOT FALSE, TRUE XOR TRUE, FALSE || TRUE", &["TRUE FALSE TRUE"]);
}

#[test]
fn let_with_separators() {
    assert_prints("LET A = 2 : LET B = A * 2 : PRINT B", &["4"]);
    assert_prints("LET A = 1, B = A + 1\nPRINT A, B", &["1 2"]);
}

#[test]
fn unset_variables_read_as_empty() {
    assert_prints("PRINT MISSING", &[""]);
    assert_prints("PRINT MISSING + 1", &["1"]);
    assert_prints("PRINT LEN(MISSING), MISSING[3]", &["0 "]);
}

#[test]
fn if_else_chooses_a_branch() {
    let src = "HP = 3\n\
               IF HP > 5 THEN\n\
                 PRINT \"healthy\"\n\
               ELSE\n\
                 PRINT \"wounded\"\n\
               ENDIF";
    assert_prints(src, &["wounded"]);
    assert_prints("IF 1 THEN : PRINT \"yes\" : ENDIF", &["yes"]);
    assert_prints("IF 0 THEN : PRINT \"yes\" : ENDIF", &[]);
}

#[test]
fn for_loop_honours_step() {
    assert_prints("FOR I = 1 TO 6 STEP 2 : PRINT I : NEXT", &["1", "3", "5"]);
    assert_prints("FOR I = 3 TO 1 STEP -1 : PRINT I : NEXT I", &["3", "2", "1"]);
    assert_prints("FOR I = 5 TO 1 : PRINT I : NEXT", &[]);
    assert_prints("FOR I = 0 TO 1 STEP 0.5 : PRINT I : NEXT", &["0", "0.5", "1"]);
}

#[test]
fn for_loop_bounds_are_evaluated_once() {
    assert_prints("N = 3 : FOR I = 1 TO N : N = 10 : PRINT I : NEXT", &["1", "2", "3"]);
    assert_prints("S = 1 : FOR I = 1 TO 5 STEP S : S = 10 : PRINT I : NEXT",
                  &["1", "2", "3", "4", "5"]);
}

#[test]
fn for_loop_rejects_zero_step() {
    let err = assert_failure("FOR I = 1 TO 5 STEP 0 : NEXT");
    assert_eq!(err, Error::Runtime(RuntimeError::InvalidLoopStep { line: 1 }));
}

#[test]
fn while_loop_runs_until_false() {
    let src = "N = 0\n\
               WHILE N < 3\n\
                 N = N + 1\n\
               WEND\n\
               PRINT N";
    assert_prints(src, &["3"]);
}

#[test]
fn subroutine_calls_nest() {
    let src = "SUB ADD(A, B) : RETURN A + B : ENDSUB\nPRINT ADD(1, ADD(2, 3))";
    assert_prints(src, &["6"]);
}

#[test]
fn recursive_fibonacci() {
    let src = "SUB FIB(N)\n\
                 IF N < 2 THEN RETURN N ENDIF\n\
                 RETURN FIB(N - 1) + FIB(N - 2)\n\
               ENDSUB\n\
               PRINT FIB(6)";
    assert_prints(src, &["8"]);
}

#[test]
fn subroutines_overload_by_arity() {
    let src = "SUB GREET() : RETURN \"hello\" : ENDSUB\n\
               SUB GREET(WHO) : RETURN \"hello \" + WHO : ENDSUB\n\
               PRINT GREET()\n\
               PRINT GREET(\"ranger\")";
    assert_prints(src, &["hello", "hello ranger"]);
}

#[test]
fn subroutine_frames_are_isolated() {
    let src = "X = 1\n\
               SUB PEEK() : RETURN X : ENDSUB\n\
               SUB CLOBBER() : X = 99 : ENDSUB\n\
               CALL CLOBBER\n\
               PRINT PEEK(), X";
    assert_prints(src, &[" 1"]);
}

#[test]
fn subroutine_without_return_yields_empty() {
    assert_prints("SUB NOTHING() : X = 1 : ENDSUB\nPRINT NOTHING() == UNSET", &["TRUE"]);
}

#[test]
fn return_unwinds_nested_blocks() {
    let src = "SUB FIRST_OVER(LIMIT)\n\
                 FOR I = 1 TO 100\n\
                   WHILE TRUE\n\
                     IF I * I > LIMIT THEN RETURN I ENDIF\n\
                     I = I + 1\n\
                   WEND\n\
                 NEXT\n\
                 RETURN -1\n\
               ENDSUB\n\
               PRINT FIRST_OVER(50)";
    assert_prints(src, &["8"]);
}

#[test]
fn top_level_return_finishes_the_run() {
    let (result, output) = run_captured("PRINT 1\nRETURN\nPRINT 2", &mut Context::new());
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["1"]);
}

#[test]
fn arrays_are_shared_by_reference() {
    let src = "SUB FILL(BAG) : BAG[\"key\"] = \"gold\" : ENDSUB\n\
               DIM LOOT\n\
               CALL FILL(LOOT)\n\
               COPY = LOOT\n\
               COPY[2] = 7\n\
               PRINT LOOT[\"key\"], LOOT[2], LEN(LOOT)";
    assert_prints(src, &["gold 7 2"]);
}

#[test]
fn array_keys_normalize_integral_reals() {
    assert_prints("A[1.0] = \"one\"\nPRINT A[1], HAS(A, 1), HAS(A, 2)", &["one TRUE FALSE"]);
}

#[test]
fn nested_arrays_are_created_on_assignment() {
    assert_prints("GRID[1][2] = \"x\"\nPRINT GRID[1][2], LEN(GRID), LEN(GRID[1])",
                  &["x 1 1"]);
}

#[test]
fn dim_clears_an_array_slot() {
    assert_prints("DIM A\nA[1] = 1\nA[2] = 2\nDIM A[1]\nPRINT LEN(A), HAS(A, 1)",
                  &["1 FALSE"]);
}

#[test]
fn indexing_a_scalar_is_a_type_error() {
    let err = assert_failure("X = 5\nY = X[1]");
    assert!(matches!(err, Error::Runtime(RuntimeError::TypeError { line: 2, .. })));
}

#[test]
fn memoized_fibonacci_makes_fewer_calls() {
    let plain = "SUB FIB(N)\n\
                   CALL TICK\n\
                   IF N < 2 THEN RETURN N ENDIF\n\
                   RETURN FIB(N - 1) + FIB(N - 2)\n\
                 ENDSUB\n\
                 PRINT FIB(6)";
    let memoized = "SUB FIB(N, MEMO)\n\
                      CALL TICK\n\
                      IF N < 2 THEN RETURN N ENDIF\n\
                      IF HAS(MEMO, N) THEN RETURN MEMO[N] ENDIF\n\
                      MEMO[N] = FIB(N - 1, MEMO) + FIB(N - 2, MEMO)\n\
                      RETURN MEMO[N]\n\
                    ENDSUB\n\
                    DIM MEMO\n\
                    PRINT FIB(6, MEMO)\n\
                    PRINT LEN(MEMO)";

    let count_calls = |src: &str| {
        let calls = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&calls);
        let mut ctx = Context::new();
        ctx.register("TICK", move || counter.set(counter.get() + 1))
           .unwrap();
        let (result, output) = run_captured(src, &mut ctx);
        result.unwrap();
        (output, calls.get())
    };

    let (plain_output, plain_calls) = count_calls(plain);
    let (memo_output, memo_calls) = count_calls(memoized);

    assert_eq!(plain_output, ["8"]);
    assert_eq!(memo_output, ["8", "5"]);
    assert!(memo_calls < plain_calls,
            "memoized: {memo_calls} calls, plain: {plain_calls} calls");
}

fn stat_context() -> (Context, Rc<RefCell<HashMap<String, Variant>>>) {
    let stats = Rc::new(RefCell::new(HashMap::new()));
    let reader = Rc::clone(&stats);
    let writer = Rc::clone(&stats);

    let mut ctx = Context::new();
    ctx.register("STAT", move |id: Variant| -> Variant {
           reader.borrow().get(&id.to_string()).cloned().unwrap_or_default()
       })
       .unwrap()
       .register("STAT", move |id: Variant, value: Variant| {
           writer.borrow_mut().insert(id.to_string(), value);
       })
       .unwrap();
    (ctx, stats)
}

#[test]
fn natives_dispatch_by_arity() {
    let (mut ctx, stats) = stat_context();
    stats.borrow_mut()
         .insert("STR".to_string(), Variant::Integer(10));

    let src = "CALL STAT('INT', 2)\n\
               STAT('STR', STAT('STR') + STAT('INT'))\n\
               PRINT STAT('STR')";
    let (result, output) = run_captured(src, &mut ctx);

    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["12"]);
    assert_eq!(stats.borrow().get("INT"), Some(&Variant::Integer(2)));
    assert!(ctx.has_native("stat", 1));
    assert!(ctx.has_native("STAT", 2));
    assert!(!ctx.has_native("STAT", 3));
}

#[test]
fn duplicate_native_is_rejected() {
    let (mut ctx, _) = stat_context();
    let err = ctx.register("stat", |_: Variant| Variant::Empty)
                 .err();
    assert_eq!(err,
               Some(RegistrationError::DuplicateNative { name:  "STAT".to_string(),
                                                         arity: 1, }));
}

#[test]
fn native_failure_carries_name_and_line() {
    let mut ctx = Context::new();
    ctx.register_raw("STRICT", 1, |args| match &args[0] {
           Variant::Integer(n) => Ok(Variant::Integer(*n)),
           _ => Err(RuntimeError::native("integer expected")),
       })
       .unwrap();

    let (result, _) = run_captured("X = STRICT(1)\nY = STRICT(\"one\")", &mut ctx);
    assert_eq!(result,
               Err(Error::Runtime(RuntimeError::NativeFailure { name:    "STRICT".to_string(),
                                                                message: "integer expected".to_string(),
                                                                line:    2, })));
    assert_eq!(ctx.global("X"), Some(&Variant::Integer(1)));
}

#[test]
fn subroutines_shadow_natives_and_builtins() {
    let mut ctx = Context::new();
    ctx.register("LEN", |_: Variant| 99_i64).unwrap();

    let (_, output) = run_captured("PRINT LEN(\"abc\")", &mut ctx);
    assert_eq!(output, ["99"]);

    let (_, output) = run_captured("SUB LEN(X) : RETURN -1 : ENDSUB\nPRINT LEN(\"abc\")", &mut ctx);
    assert_eq!(output, ["-1"]);
}

#[test]
fn host_can_call_subroutines_after_a_run() {
    let program = parse("SUB DAMAGE(BASE, MULT) : RETURN BASE * MULT : ENDSUB").unwrap();
    let mut ctx = Context::new();
    program.execute(&mut ctx).unwrap();

    let result = ctx.call("damage", vec![Variant::Integer(4), Variant::Real(1.5)]);
    assert_eq!(result, Ok(Variant::Real(6.0)));
    assert_eq!(ctx.call_depth(), 0);
}

#[test]
fn parsing_twice_gives_identical_programs() {
    let src = "SUB SQ(X) : RETURN X * X : ENDSUB\nFOR I = 1 TO 3 : PRINT SQ(I) : NEXT";
    let first = parse(src).unwrap();
    let second = parse(src).unwrap();
    assert_eq!(first, second);

    let run_program = |program: &hostbasic::Program| {
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&out);
        let mut ctx = Context::new();
        ctx.on_print(move |line| sink.borrow_mut().push(line.to_string()));
        program.execute(&mut ctx).unwrap();
        out.borrow().clone()
    };
    assert_eq!(run_program(&first), run_program(&second));
    assert_eq!(run_program(&first), ["1", "4", "9"]);
}

#[test]
fn globals_persist_across_runs() {
    let mut ctx = Context::new();
    ctx.set_global("str", 10);

    let (result, _) = run_captured("STR = STR + 2\nDIM LOG\nLOG[1] = \"first\"", &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));

    let (result, output) = run_captured("PRINT STR, LOG[1]", &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["12 first"]);
    assert_eq!(ctx.remove_global("STR"), Some(Variant::Integer(12)));
    assert_eq!(ctx.global("STR"), None);
}

#[test]
fn abort_stops_the_whole_run() {
    let (result, output) = run_captured("PRINT 1 : ABORT : PRINT 2", &mut Context::new());
    assert_eq!(result, Ok(Completion::Aborted { line: 1 }));
    assert_eq!(output, ["1"]);

    let src = "SUB STOP()\n\
                 ABORT\n\
               ENDSUB\n\
               PRINT \"before\"\n\
               CALL STOP\n\
               PRINT \"after\"";
    let errors = Rc::new(Cell::new(0));
    let seen = Rc::clone(&errors);
    let mut ctx = Context::new();
    ctx.on_print(|_| {})
       .on_error(move |_| seen.set(seen.get() + 1));
    let result = run(src, &mut ctx);

    assert_eq!(result, Ok(Completion::Aborted { line: 2 }));
    assert_eq!(ctx.call_depth(), 0);
    assert_eq!(errors.get(), 0);

    let (_, output) = run_captured(src, &mut Context::new());
    assert_eq!(output, ["before"]);
}

#[test]
fn recursion_limit_is_reported() {
    let mut ctx = Context::with_config(ContextConfig { max_call_depth: 10,
                                                       ..ContextConfig::default() });
    let src = "SUB DOWN(N)\nRETURN DOWN(N + 1)\nENDSUB\nX = DOWN(0)";
    let (result, _) = run_captured(src, &mut ctx);

    assert_eq!(result,
               Err(Error::Runtime(RuntimeError::RecursionLimit { limit: 10,
                                                                 line:  2, })));
    assert_eq!(ctx.call_depth(), 0);
}

#[test]
fn recursion_through_nested_blocks_reaches_the_default_limit() {
    let src = |limit: usize| {
        format!("SUB DIVE(N, LIMIT)\n\
                   FOR I = 1 TO 1\n\
                     WHILE TRUE\n\
                       IF N >= LIMIT THEN\n\
                         RETURN N\n\
                       ELSE\n\
                         RETURN DIVE(N + 1, LIMIT)\n\
                       ENDIF\n\
                     WEND\n\
                   NEXT\n\
                 ENDSUB\n\
                 PRINT DIVE(1, {limit})")
    };

    let mut ctx = Context::new();
    let (result, output) = run_captured(&src(200), &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["200"]);

    let (result, _) = run_captured(&src(201), &mut ctx);
    assert_eq!(result,
               Err(Error::Runtime(RuntimeError::RecursionLimit { limit: 200,
                                                                 line:  7, })));
    assert_eq!(ctx.call_depth(), 0);
}

#[test]
fn raised_call_depth_does_not_overflow_the_stack() {
    let src = "SUB DIVE(N)\n\
                 IF N == 0 THEN : RETURN 0 : ENDIF\n\
                 WHILE TRUE : RETURN 1 + DIVE(N - 1) : WEND\n\
               ENDSUB\n\
               PRINT DIVE(5000)";
    let mut ctx = Context::with_config(ContextConfig { max_call_depth: 10_000,
                                                       ..ContextConfig::default() });
    let (result, output) = run_captured(src, &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["5000"]);
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let depth = 10_000;
    let parens = format!("PRINT {}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse(&parens), Err(ParseError::NestingTooDeep { line: 1 }));

    let blocks = format!("{}{}", "IF TRUE THEN\n".repeat(depth), "ENDIF\n".repeat(depth));
    assert_eq!(parse(&blocks), Err(ParseError::NestingTooDeep { line: 257 }));

    let err = assert_failure(&parens);
    assert_eq!(err.to_string(),
               "Error on line 1: Expression or block nesting is too deep.");

    assert!(parse(&format!("X = {}1{}", "(".repeat(250), ")".repeat(250))).is_ok());
    assert_prints(&format!("PRINT {}1{}", "(".repeat(200), ")".repeat(200)), &["1"]);
    assert_prints(&format!("{}PRINT 2{}", "IF TRUE THEN : ".repeat(100), " : ENDIF".repeat(100)),
                  &["2"]);
}

#[test]
fn loop_limit_is_reported() {
    let mut ctx = Context::with_config(ContextConfig { max_loop_iterations: Some(100),
                                                       ..ContextConfig::default() });
    let (result, _) = run_captured("WHILE TRUE : WEND", &mut ctx);
    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::LoopLimit { limit: 100, line: 1 }))));

    let (result, output) = run_captured("FOR I = 1 TO 100 : NEXT : PRINT I", &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(output, ["101"]);
}

#[test]
fn runtime_errors_reach_the_error_hook() {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    let mut ctx = Context::new();
    ctx.on_error(move |message| sink.borrow_mut().push(message.to_string()));

    let result = run("X = 1\nY = X / 0", &mut ctx);
    assert_eq!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 2 })));
    assert_eq!(*messages.borrow(), ["Error on line 2: Division by zero."]);
}

#[test]
fn syntax_errors_reach_the_error_hook() {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    let printed = Rc::new(Cell::new(0));
    let counter = Rc::clone(&printed);
    let mut ctx = Context::new();
    ctx.on_error(move |message| sink.borrow_mut().push(message.to_string()))
       .on_print(move |_| counter.set(counter.get() + 1));

    let result = run("PRINT 1\nPRINT (1", &mut ctx);
    assert_eq!(result, Err(Error::Syntax(ParseError::UnexpectedEndOfInput { line: 2 })));
    assert_eq!(*messages.borrow(), ["Error on line 2: Unexpected end of input."]);
    assert_eq!(printed.get(), 0);
}

#[test]
fn arithmetic_errors() {
    assert_eq!(assert_failure("X = 1 % 0"),
               Error::Runtime(RuntimeError::DivisionByZero { line: 1 }));
    assert_eq!(assert_failure("X = 1.5 / 0"),
               Error::Runtime(RuntimeError::DivisionByZero { line: 1 }));
    assert_eq!(assert_failure("X = 9223372036854775807 + 1"),
               Error::Runtime(RuntimeError::Overflow { line: 1 }));
    assert!(matches!(assert_failure("DIM A\nX = A * 2"),
                     Error::Runtime(RuntimeError::TypeError { line: 2, .. })));
    assert!(matches!(assert_failure("X = \"a\" < 1"),
                     Error::Runtime(RuntimeError::TypeError { line: 1, .. })));
}

#[test]
fn unknown_callable_reports_name_and_arity() {
    assert_eq!(assert_failure("\nX = NOPE(1, 2)"),
               Error::Runtime(RuntimeError::UnknownCallable { name:  "NOPE".to_string(),
                                                              arity: 2,
                                                              line:  2, }));
    assert!(matches!(assert_failure("SUB ONE(A) : ENDSUB\nCALL ONE(1, 2)"),
                     Error::Runtime(RuntimeError::UnknownCallable { arity: 2, .. })));
}

#[test]
fn syntax_errors_carry_lines() {
    assert_eq!(parse("SUB A(X)\nENDSUB\nSUB a(Y)\nENDSUB"),
               Err(ParseError::DuplicateSubroutine { name:  "A".to_string(),
                                                     arity: 1,
                                                     line:  3, }));
    assert_eq!(parse("X = 1\nPRINT \"open"),
               Err(ParseError::UnterminatedString { line: 2 }));
    assert!(matches!(parse("X = 1 $ 2"),
                     Err(ParseError::InvalidCharacter { line: 1, .. })));
    assert!(matches!(parse("FOR I = 1 TO 2\nNEXT J"),
                     Err(ParseError::MismatchedNext { line: 2, .. })));
    assert_eq!(parse("IF 1 THEN\nPRINT 1"),
               Err(ParseError::UnexpectedEndOfInput { line: 1 }));
    assert_eq!(parse("X = 1\nY = 2\nZ ="),
               Err(ParseError::UnexpectedEndOfInput { line: 3 }));
    assert_eq!(parse("X = 1\nLET"), Err(ParseError::UnexpectedEndOfInput { line: 2 }));
    assert_eq!(parse("X = 1\nPRINT 1 +"),
               Err(ParseError::UnexpectedEndOfInput { line: 2 }));
    assert_eq!(parse("X = 1\nDIM"), Err(ParseError::UnexpectedEndOfInput { line: 2 }));
    assert!(matches!(parse("FOO(1) PRINT 2"),
                     Err(ParseError::UnexpectedToken { line: 1, .. })));
    assert!(matches!(parse("SUB A()\nSUB B()\nENDSUB\nENDSUB"),
                     Err(ParseError::NestedSubroutine { line: 2 })));
    assert!(matches!(parse("1 + 2"),
                     Err(ParseError::InvalidAssignmentTarget { line: 1 })));

    let err = assert_failure("PRINT (1");
    assert!(matches!(err, Error::Syntax(_)));
}

#[test]
fn keywords_are_case_insensitive() {
    assert_success("let x = 1 : if x == 1 then : print x : endif");
    assert_prints("for i = 1 to 2 : print I : next", &["1", "2"]);
}

#[test]
fn command_hook_receives_evaluated_arguments() {
    let commands = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commands);
    let mut ctx = Context::new();
    ctx.on_command(move |name, args| sink.borrow_mut().push((name.to_string(), args.to_vec())));

    let (result, _) = run_captured("VOLUME = 2\nCOMMAND PLAYSOUND(\"door\", VOLUME + 1)\nCOMMAND FADE",
                                   &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(*commands.borrow(),
               [("PLAYSOUND".to_string(), vec![Variant::from("door"), Variant::Integer(3)]),
                ("FADE".to_string(), vec![])]);
}

#[test]
fn remarks_go_to_the_log_hook() {
    let logged = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&logged);
    let mut ctx = Context::new();
    ctx.on_print(|_| {})
       .on_log(move |text| sink.borrow_mut().push(text.to_string()));

    let result = run("REM opening the gate\nPRINT 1 : REM done\nREMAINING = 3", &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(*logged.borrow(), ["opening the gate", "done"]);
    assert_eq!(ctx.global("REMAINING"), Some(&Variant::Integer(3)));
}

#[test]
fn garbage_collection_keeps_reachable_arrays() {
    let mut ctx = Context::new();
    let (result, _) = run_captured("DIM KEEP\nKEEP[1][1] = 1\nDIM TEMP\nTEMP[1] = 2\nDIM TEMP",
                                   &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(ctx.arrays().live_count(), 4);

    assert_eq!(ctx.collect_garbage(), 1);
    assert_eq!(ctx.arrays().live_count(), 3);

    ctx.remove_global("KEEP");
    assert_eq!(ctx.collect_garbage(), 2);

    let (_, output) = run_captured("PRINT LEN(TEMP)", &mut ctx);
    assert_eq!(output, ["0"]);
}

#[test]
fn collected_arrays_are_not_reachable_through_old_handles() {
    let mut ctx = Context::new();
    let (result, _) = run_captured("SUB MAKE() : DIM BAG : BAG[1] = \"mine\" : RETURN BAG : ENDSUB",
                                   &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));

    let held = ctx.call("MAKE", vec![]).unwrap();
    let Variant::Array(handle) = held.clone() else {
        panic!("expected an array, got {held:?}");
    };
    assert_eq!(ctx.arrays().render(&held), "{1: mine}");

    assert_eq!(ctx.collect_garbage(), 1);
    let (result, _) = run_captured("DIM OTHER : OTHER[1] = \"someone else\"", &mut ctx);
    assert_eq!(result, Ok(Completion::Finished));

    let other = ctx.global("OTHER").and_then(Variant::as_array).unwrap();
    assert_eq!(other.index(), handle.index());
    assert_ne!(other, handle);
    assert!(ctx.arrays().get(handle).is_none());
    assert_eq!(ctx.arrays().render(&held), handle.to_string());
    assert_eq!(ctx.arrays().render(&Variant::Array(other)), "{1: someone else}");
}

#[test]
fn execute_default_uses_a_fresh_context() {
    let program = parse("X = 1 : ABORT").unwrap();
    assert_eq!(program.execute_default(), Ok(Completion::Aborted { line: 1 }));
    assert!(program.subroutines().is_empty());
}

#[test]
fn arrow_is_not_part_of_the_grammar() {
    assert!(matches!(parse("X -> 1"), Err(ParseError::UnexpectedToken { line: 1, .. })));
}
