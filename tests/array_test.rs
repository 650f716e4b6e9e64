mod common;
use common::*;

#[test]
fn test_dim_and_fill() {
    let s = run_program(&[
        "10 DIM A(3)",
        "20 FOR I=0 TO 3:A(I)=I*I:NEXT",
        "30 PRINT A(3);A(0)",
    ]);
    assert_eq!(s, " 9  0 \n");
}

#[test]
fn test_implicit_dimension() {
    assert_eq!(direct("PRINT A(10)"), " 0 \n");
    assert_eq!(direct("PRINT A(11)"), "?BAD SUBSCRIPT\n");
    assert_eq!(direct("A(-1)=1"), "?BAD SUBSCRIPT\n");
}

#[test]
fn test_redimension() {
    assert_eq!(
        run_program(&["10 DIM A(5)", "20 DIM A(5)"]),
        "?REDIMENSIONED ARRAY IN 20\n"
    );
    assert_eq!(
        run_program(&["10 A(1)=1", "20 DIM A(5)"]),
        "?REDIMENSIONED ARRAY IN 20\n"
    );
    assert_eq!(
        run_program(&["10 DIM A(2)", "20 CLEAR", "30 DIM A(2)", "40 PRINT \"OK\""]),
        "OK\n"
    );
}

#[test]
fn test_two_dimensions() {
    let s = run_program(&["10 DIM B(2,3)", "20 B(2,3)=7", "30 PRINT B(2,3);B(0,0)"]);
    assert_eq!(s, " 7  0 \n");
    assert_eq!(
        run_program(&["10 DIM B(2,3)", "20 PRINT B(1)"]),
        "?SYNTAX ERROR IN 20; WRONG NUMBER OF SUBSCRIPTS\n"
    );
    assert_eq!(
        run_program(&["10 DIM B(2,3)", "20 PRINT B(3,0)"]),
        "?BAD SUBSCRIPT IN 20\n"
    );
}

#[test]
fn test_string_arrays() {
    let s = run_program(&[
        "10 DIM N$(2)",
        "20 N$(1)=\"X\"",
        "30 PRINT N$(1);N$(0);\".\"",
    ]);
    assert_eq!(s, "X.\n");
    assert_eq!(
        run_program(&["10 DIM N$(2)", "20 N$(1)=5"]),
        "?TYPE MISMATCH IN 20\n"
    );
}

#[test]
fn test_dim_errors() {
    assert_eq!(direct("DIM C(-1)"), "?ILLEGAL QUANTITY\n");
    assert_eq!(direct("DIM C(30000,30000)"), "?OUT OF MEMORY\n");
    assert_eq!(direct("DIM C"), "?SYNTAX ERROR\n");
}

#[test]
fn test_dim_list() {
    let s = run_program(&["10 DIM A(1),B$(1)", "20 A(1)=1:B$(1)=\"B\"", "30 PRINT A(1);B$(1)"]);
    assert_eq!(s, " 1 B\n");
}
