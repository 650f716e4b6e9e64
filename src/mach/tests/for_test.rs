use super::*;
use crate::mach::{Frame, MAX_STACK};

#[test]
fn test_breaking_out_of_loop_with_goto() {
    let (mut r, t) = runtime();
    enter(
        &mut r,
        &[
            "10fory=1to2",
            "20forx=8to9",
            "30?y;x",
            "40goto60",
            "50next",
            "60nexty",
            "run",
        ],
    );
    assert_eq!(run(&mut r, &t), " 1  8 \n 2  8 \n");
    assert!(r.env.stack.is_empty());
}

#[test]
fn test_reused_variable_replaces_frame() {
    let (mut r, t) = runtime();
    enter(&mut r, &["10 FOR I=1 TO 2:FOR I=5 TO 6:PRINT I;:NEXT", "run"]);
    assert_eq!(run(&mut r, &t), " 5  6 ");
    assert!(r.env.stack.is_empty());
}

#[test]
fn test_nested_for_overflow() {
    let (mut r, t) = runtime();
    for i in 1..=60 {
        r.enter(&format!("{} FOR V{}=1 TO 2", i, i));
    }
    r.enter("run");
    assert_eq!(
        run(&mut r, &t),
        "?OUT OF MEMORY IN 51; STACK OVERFLOW\n"
    );
    assert_eq!(r.env.stack.len(), MAX_STACK);
}

#[test]
fn test_next_on_gosub_frame() {
    let (mut r, t) = runtime();
    enter(&mut r, &["10 FOR I=1 TO 2:GOSUB 30", "20 END", "30 NEXT", "run"]);
    assert_eq!(run(&mut r, &t), "?NEXT WITHOUT FOR IN 30\n");
    assert!(matches!(r.env.stack.last(), Some(Frame::Gosub { .. })));
}

#[test]
fn test_return_on_for_frame() {
    let (mut r, t) = runtime();
    enter(&mut r, &["10 GOSUB 20:END", "20 FOR I=1 TO 2:RETURN", "run"]);
    assert_eq!(run(&mut r, &t), "?RETURN WITHOUT GOSUB IN 20\n");
    assert_eq!(r.env.stack.len(), 2);
}

#[test]
fn test_loop_in_direct_mode() {
    let (mut r, t) = runtime();
    r.enter("for i=1 to 3:print i;:next:print");
    assert_eq!(run(&mut r, &t), " 1  2  3 \n");
}
