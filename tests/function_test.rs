mod common;
use common::*;

#[test]
fn test_string_functions() {
    assert_eq!(direct(r#"PRINT LEN("HELLO");ASC("A");CHR$(66)"#), " 5  65 B\n");
    assert_eq!(
        direct(r#"PRINT LEFT$("HELLO",2);RIGHT$("HELLO",3);MID$("HELLO",2,2)"#),
        "HELLOEL\n"
    );
    assert_eq!(direct(r#"PRINT MID$("HELLO",4);"|""#), "LO|\n");
    assert_eq!(direct(r#"PRINT STR$(12);VAL("3.5X")"#), " 12 3.5 \n");
    assert_eq!(direct(r#"PRINT VAL("")"#), " 0 \n");
}

#[test]
fn test_string_function_bounds() {
    assert_eq!(direct(r#"PRINT LEFT$("A",0)"#), "?ILLEGAL QUANTITY\n");
    assert_eq!(direct(r#"PRINT MID$("A",0)"#), "?ILLEGAL QUANTITY\n");
    assert_eq!(direct(r#"PRINT ASC("")"#), "?ILLEGAL QUANTITY\n");
    assert_eq!(direct("PRINT CHR$(-1)"), "?ILLEGAL QUANTITY\n");
}

#[test]
fn test_math_functions() {
    assert_eq!(direct("PRINT INT(-2.5);ABS(-3);SGN(-7);SQR(16)"), "-3  3 -1  4 \n");
    assert_eq!(direct("PRINT SGN(0);INT(2.9);EXP(0);LOG(1)"), " 0  2  1  0 \n");
    assert_eq!(direct("PRINT LOG(0)"), "?ILLEGAL QUANTITY\n");
    assert_eq!(direct("PRINT SQR(-1)"), "?ILLEGAL QUANTITY\n");
}

#[test]
fn test_rnd() {
    assert_eq!(direct("PRINT RND(-1)=RND(-1)"), "-1 \n");
    assert_eq!(direct("X=RND(1):PRINT X=RND(0)"), "-1 \n");
    assert_eq!(direct("X=RND(1):PRINT X>=0 AND X<1"), "-1 \n");
}

#[test]
fn test_print_functions() {
    assert_eq!(direct(r#"PRINT "A";TAB(5);"B""#), "A    B\n");
    assert_eq!(direct(r#"PRINT "A";SPC(3);"B""#), "A   B\n");
    assert_eq!(direct(r#"PRINT "ABC";POS(0)"#), "ABC 3 \n");
}

#[test]
fn test_wrong_arguments() {
    assert_eq!(
        direct("PRINT SIN(1,2)"),
        "?SYNTAX ERROR; WRONG NUMBER OF ARGUMENTS\n"
    );
    assert_eq!(direct(r#"PRINT SIN("X")"#), "?TYPE MISMATCH\n");
    assert_eq!(direct("PRINT LEN(1)"), "?TYPE MISMATCH\n");
}
