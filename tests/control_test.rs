mod common;
use common::*;
use forth::mach::Runtime;
use std::sync::atomic::Ordering;

#[test]
fn test_if_else_then() {
    let mut r = Runtime::default();
    enter(&mut r, ": sign dup 0 < if drop -1 else drop 1 then ;");
    assert_eq!(enter(&mut r, "-5 sign ."), "-1 ");
    assert_eq!(enter(&mut r, "5 sign ."), "1 ");
    assert_eq!(enter(&mut r, "0 sign ."), "1 ");
}

#[test]
fn test_if_without_else() {
    let mut r = Runtime::default();
    enter(&mut r, ": answer? 0 > if 42 then ;");
    assert_eq!(enter(&mut r, "5 answer? ."), "42 ");
    enter(&mut r, "0 answer?");
    assert_eq!(r.depth(), 0);
}

#[test]
fn test_nested_if() {
    let mut r = Runtime::default();
    enter(&mut r, ": classify dup 0 < if drop -1 else 0 > if 1 else 0 then then ;");
    assert_eq!(enter(&mut r, "-7 classify ."), "-1 ");
    assert_eq!(enter(&mut r, "7 classify ."), "1 ");
    assert_eq!(enter(&mut r, "0 classify ."), "0 ");
}

#[test]
fn test_begin_until() {
    let mut r = Runtime::default();
    enter(&mut r, ": countdown begin dup . 1 - dup 0 <= until drop ;");
    assert_eq!(enter(&mut r, "5 countdown"), "5 4 3 2 1 ");
}

#[test]
fn test_begin_while_repeat() {
    let mut r = Runtime::default();
    enter(&mut r, ": down begin dup 0 > while dup . 1 - repeat drop ;");
    assert_eq!(enter(&mut r, "3 down"), "3 2 1 ");
    // A false guard on entry skips the body entirely.
    assert_eq!(enter(&mut r, "0 down"), "");
}

#[test]
fn test_for_next() {
    let mut r = Runtime::default();
    enter(&mut r, ": counts for r@ . next ;");
    assert_eq!(enter(&mut r, "3 counts"), "3 2 1 0 ");
    assert_eq!(enter(&mut r, "0 counts"), "0 ");
}

#[test]
fn test_exit_leaves_early() {
    let mut r = Runtime::default();
    enter(&mut r, ": early 1 exit 2 ;");
    assert_eq!(enter(&mut r, "early .s"), "1 \n");
}

#[test]
fn test_compile_only_words() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "1 2 if"), "COMPILE ONLY if\n");
    assert_eq!(enter(&mut r, "begin"), "COMPILE ONLY begin\n");
    assert_eq!(enter(&mut r, "3 for"), "COMPILE ONLY for\n");
}

#[test]
fn test_unmatched_closers() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ": bad then ;"), "UNMATCHED BRANCH then\n");
    assert_eq!(enter(&mut r, "bad"), "UNDEFINED WORD bad\n");
    assert_eq!(enter(&mut r, ";"), "UNMATCHED BRANCH ;\n");
    assert_eq!(enter(&mut r, ": worse begin repeat ;"), "UNMATCHED BRANCH repeat\n");
}

#[test]
fn test_open_control_structure_at_semicolon() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(&mut r, ": bad if 1 ;"),
        "UNMATCHED BRANCH; OPEN CONTROL STRUCTURE\n"
    );
    assert_eq!(enter(&mut r, "bad"), "UNDEFINED WORD bad\n");
}

#[test]
fn test_interrupt_breaks_a_loop() {
    let mut r = Runtime::default();
    enter(&mut r, ": spin begin again ;");
    r.interrupter().store(true, Ordering::SeqCst);
    assert_eq!(enter(&mut r, "spin"), "BREAK\n");
    // The machine recovers for the next command.
    assert_eq!(enter(&mut r, "3 4 + ."), "7 ");
}
