mod common;
use basic::mach::Event;
use common::*;

#[test]
fn test_breaking_out_of_for_loop_with_goto() {
    let s = run_program(&[
        "10fory=1to2",
        "20forx=8to9",
        "30?y;x",
        "40goto60",
        "50next",
        "60nexty",
    ]);
    assert_eq!(s, " 1  8 \n 2  8 \n");
}

#[test]
fn test_for_loop_always_runs_once() {
    assert_eq!(direct("FOR I=3 TO 0:PRINT I:NEXT I"), " 3 \n");
}

#[test]
fn test_for_loop_assign_step_after_var() {
    assert_eq!(direct("I=1:FOR I=3 TO 9 STEP I:PRINT I;:NEXT"), " 3  6  9 ");
}

#[test]
fn test_for_negative_step() {
    assert_eq!(direct("FOR I=3 TO 1 STEP -1:PRINT I;:NEXT:PRINT I"), " 3  2  1  0 \n");
}

#[test]
fn test_next_with_list() {
    let s = run_program(&[
        "10 FOR I=1 TO 2:FOR J=1 TO 2",
        "20 PRINT I*10+J;",
        "30 NEXT J,I",
    ]);
    assert_eq!(s, " 11  12  21  22 ");
}

#[test]
fn test_if_then() {
    assert_eq!(direct(r#"if 1 then ? "one""#), "one\n");
}

#[test]
fn test_if_then_else() {
    let (mut r, tape) = new_runtime();
    r.enter(r#"IF 0 THEN PRINT "ONE" ELSE PRINT "TWO";:PRINT 2"#);
    assert_eq!(exec(&mut r, &tape), "TWO 2 \n");
    r.enter(r#"IF 1 THEN PRINT "ONE" ELSE PRINT "TWO":PRINT 2"#);
    assert_eq!(exec(&mut r, &tape), "ONE\n");
    r.enter(r#"IF 1 THEN PRINT "ONE";:PRINT 2"#);
    assert_eq!(exec(&mut r, &tape), "ONE 2 \n");
    r.enter(r#"IF 0 THEN PRINT "ONE";:PRINT 2"#);
    assert_eq!(exec(&mut r, &tape), "");
}

#[test]
fn test_if_line_numbers() {
    let s = run_program(&[
        "10 IF 1 THEN 40",
        "20 PRINT \"NO\"",
        "40 IF 0 GOTO 20 ELSE 60",
        "50 PRINT \"NO\"",
        "60 PRINT \"YES\"",
    ]);
    assert_eq!(s, "YES\n");
}

#[test]
fn test_if_goto() {
    let s = run_program(&[
        "10 IF 1 GOTO 30",
        "20 PRINT \"NO\"",
        "30 IF 2>1 GOTO 50 ELSE 20",
        "40 PRINT \"NO\"",
        "50 PRINT \"YES\"",
    ]);
    assert_eq!(s, "YES\n");
}

#[test]
fn test_gosub_needs_end_of_statement() {
    let s = run_program(&["10 GOSUB 100 PRINT \"JUNK\"", "20 END", "100 RETURN"]);
    assert_eq!(s, "?SYNTAX ERROR IN 10\n");
    let s = run_program(&["10 IF 1 THEN GOSUB 100 ELSE 30", "20 END", "30 PRINT \"NO\"", "100 PRINT \"SUB\":RETURN"]);
    assert_eq!(s, "SUB\n");
}

#[test]
fn test_gosub_return() {
    let s = run_program(&[
        r#"10 GOSUB 100"#,
        r#"20 PRINT "WORLD""#,
        r#"90 END"#,
        r#"100 PRINT "HELLO ";"#,
        r#"110 RETURN"#,
    ]);
    assert_eq!(s, "HELLO WORLD\n");
}

#[test]
fn test_return_mid_line() {
    let s = run_program(&["10 GOSUB 100:PRINT \"B\"", "20 END", "100 PRINT \"A\";:RETURN"]);
    assert_eq!(s, "AB\n");
}

#[test]
fn test_on_gosub() {
    let s = run_program(&[
        "10 FOR I=0 TO 4",
        "20 ON I GOSUB 100,200,300",
        "30 NEXT",
        "40 END",
        "100 PRINT \"A\";:RETURN",
        "200 PRINT \"B\";:RETURN",
        "300 PRINT \"C\";:RETURN",
    ]);
    assert_eq!(s, "ABC");
}

#[test]
fn test_on_goto() {
    let s = run_program(&[
        "10 ON 2 GOTO 30,40",
        "30 PRINT 30:END",
        "40 PRINT 40",
    ]);
    assert_eq!(s, " 40 \n");
    assert_eq!(
        run_program(&["10 ON -1 GOTO 10"]),
        "?ILLEGAL QUANTITY IN 10\n"
    );
}

#[test]
fn test_data_read_restore() {
    let s = run_program(&[
        "10 READ A,B$",
        "20 PRINT A;B$",
        "30 RESTORE",
        "40 READ C",
        "50 PRINT C",
        "60 DATA 5,\"HI, THERE\"",
    ]);
    assert_eq!(s, " 5 HI, THERE\n 5 \n");
}

#[test]
fn test_data_unquoted_and_negative() {
    let s = run_program(&[
        "10 DATA HELLO WORLD, -2.5",
        "20 READ A$,B",
        "30 PRINT A$;B",
    ]);
    assert_eq!(s, "HELLO WORLD-2.5 \n");
}

#[test]
fn test_data_keeps_source_text() {
    let (mut r, tape) = new_runtime();
    enter(
        &mut r,
        &[
            "10 data Hello  World , x:print \"ok\"",
            "20 READ A$,B$:PRINT A$;\"|\";B$",
            "LIST",
        ],
    );
    assert_eq!(
        exec(&mut r, &tape),
        "10 DATA Hello  World , x:PRINT \"ok\"\n20 READ A$,B$:PRINT A$;\"|\";B$\n"
    );
    r.enter("RUN");
    assert_eq!(exec(&mut r, &tape), "ok\nHello  World|x\n");
}

#[test]
fn test_restore_to_line() {
    let s = run_program(&[
        "10 DATA 1",
        "20 DATA 2",
        "30 RESTORE 20",
        "40 READ A",
        "50 PRINT A",
    ]);
    assert_eq!(s, " 2 \n");
}

#[test]
fn test_read_errors() {
    assert_eq!(
        run_program(&["10 READ A,B", "20 DATA 1"]),
        "?OUT OF DATA IN 10\n"
    );
    assert_eq!(
        run_program(&["10 READ A", "20 DATA \"X\""]),
        "?SYNTAX ERROR IN 20\n"
    );
}

#[test]
fn test_def_fn() {
    let s = run_program(&[
        "10 DEF FN SQ(X)=X*X",
        "20 X=3",
        "30 PRINT FN SQ(4);X",
    ]);
    assert_eq!(s, " 16  3 \n");
    let s = run_program(&["10 DEF FN A$(X$)=X$+\"!\"", "20 PRINT FN A$(\"HI\")"]);
    assert_eq!(s, "HI!\n");
    let s = run_program(&["10 DEF FN T(A,B)=A-B", "20 PRINT FN T(5,2)"]);
    assert_eq!(s, " 3 \n");
}

#[test]
fn test_def_fn_errors() {
    assert_eq!(direct("DEF FN A(X)=X"), "?ILLEGAL DIRECT\n");
    assert_eq!(direct("PRINT FN Q(1)"), "?UNDEFINED FUNCTION\n");
    assert_eq!(
        run_program(&["10 DEF FN A(X)=X", "20 PRINT FN A(\"S\")"]),
        "?TYPE MISMATCH IN 20\n"
    );
}

#[test]
fn test_list() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["20 for i=1 to 10", "10 print \"HI\";a"]);
    r.enter("LIST");
    assert_eq!(
        exec(&mut r, &tape),
        "10 PRINT \"HI\";A\n20 FOR I=1 TO 10\n"
    );
    r.enter("LIST 20");
    assert_eq!(exec(&mut r, &tape), "20 FOR I=1 TO 10\n");
    r.enter("LIST -10");
    assert_eq!(exec(&mut r, &tape), "10 PRINT \"HI\";A\n");
    r.enter("LIST 15-");
    assert_eq!(exec(&mut r, &tape), "20 FOR I=1 TO 10\n");
}

#[test]
fn test_delete() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 END", "20 END", "30 END"]);
    r.enter("DELETE 10-20");
    assert_eq!(exec(&mut r, &tape), "");
    r.enter("LIST");
    assert_eq!(exec(&mut r, &tape), "30 END\n");
    r.enter("30");
    assert!(r.listing().is_empty());
    r.enter("DELETE");
    assert_eq!(exec(&mut r, &tape), "?SYNTAX ERROR\n");
    assert_eq!(
        run_program(&["10 DELETE 20", "20 END"]),
        "?UNABLE TO EDIT IN 10\n"
    );
}

#[test]
fn test_new() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 A=1", "20 NEW"]);
    r.enter("RUN:PRINT 9");
    assert_eq!(exec(&mut r, &tape), "");
    r.enter("PRINT A");
    assert_eq!(exec(&mut r, &tape), " 0 \n");
    r.enter("LIST");
    assert_eq!(exec(&mut r, &tape), "");
}

#[test]
fn test_run_from_line_and_clear() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 PRINT A", "20 A=5:PRINT A"]);
    r.enter("A=7");
    exec(&mut r, &tape);
    r.enter("RUN 20");
    assert_eq!(exec(&mut r, &tape), " 5 \n");
    r.enter("CLEAR:PRINT A");
    assert_eq!(exec(&mut r, &tape), " 0 \n");
    r.enter("RUN 15");
    assert_eq!(exec(&mut r, &tape), "?UNDEFINED STATEMENT\n");
}

#[test]
fn test_print_zones_and_separators() {
    assert_eq!(direct("PRINT 1,2"), format!(" 1 {} 2 \n", " ".repeat(11)));
    assert_eq!(direct("PRINT \"A\";\"B\","), format!("AB{}", " ".repeat(12)));
    assert_eq!(direct("PRINT"), "\n");
    assert_eq!(direct("PRINT -1;\"X\""), "-1 X\n");
}

#[test]
fn test_rem_and_empty_statements() {
    assert_eq!(direct("PRINT 1::PRINT 2:REM PRINT 3"), " 1 \n 2 \n");
}

#[test]
fn test_system() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 PRINT 1", "20 SYSTEM", "30 PRINT 2"]);
    r.enter("RUN");
    assert_eq!(r.execute(100), Event::Exit);
    assert_eq!(tape.take_output(), " 1 \n");
}

#[test]
fn test_interrupt_infinite_loop() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 GOTO 10"]);
    r.enter("RUN");
    assert_eq!(r.execute(100), Event::Running);
    r.interrupt();
    assert!(matches!(r.execute(100), Event::Error(e) if e.is_break()));
    assert_eq!(tape.take_output(), "BREAK IN 10\n");
    assert!(!r.is_running());
}

#[test]
fn test_editing_while_running() {
    let (mut r, tape) = new_runtime();
    enter(&mut r, &["10 GOTO 10"]);
    r.enter("RUN");
    assert_eq!(r.execute(10), Event::Running);
    assert!(!r.enter("20 END"));
    assert!(matches!(r.execute(10), Event::Error(_)));
    assert_eq!(tape.take_output(), "?UNABLE TO EDIT\n");
}
