mod common;
use common::*;
use forth::mach::Runtime;

#[test]
fn test_scalar_arithmetic() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "3 4 + ."), "7 ");
    assert_eq!(enter(&mut r, "10 3 - ."), "7 ");
    assert_eq!(enter(&mut r, "6 7 * ."), "42 ");
    assert_eq!(enter(&mut r, "15 4 mod ."), "3 ");
    assert_eq!(enter(&mut r, "1 2 / ."), "0.5 ");
}

#[test]
fn test_division_by_zero() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "1 0 /"), "DIVISION BY ZERO\n");
}

#[test]
fn test_stack_words() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "1 2 3 .s"), "1 2 3 \n");
    assert_eq!(enter(&mut r, "rot .s"), "2 3 1 \n");
    assert_eq!(enter(&mut r, "drop swap over .s"), "3 2 3 \n");
    assert_eq!(enter(&mut r, "dup . . . ."), "3 3 2 3 ");
}

#[test]
fn test_undefined_word_leaves_stack() {
    let mut r = Runtime::default();
    enter(&mut r, "1 2");
    assert_eq!(enter(&mut r, "foobar"), "UNDEFINED WORD foobar\n");
    assert_eq!(r.depth(), 2);
    assert_eq!(enter(&mut r, ".s"), "1 2 \n");
}

#[test]
fn test_error_discards_rest_of_line() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "foobar 9 9 9"), "UNDEFINED WORD foobar\n");
    assert_eq!(r.depth(), 0);
}

#[test]
fn test_underflow_is_not_fatal() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "+"), "STACK UNDERFLOW DATA\n");
    assert_eq!(enter(&mut r, "3 4 + ."), "7 ");
}

#[test]
fn test_radix() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "hex FF ."), "FF ");
    assert_eq!(enter(&mut r, "decimal 255 ."), "255 ");
    assert_eq!(enter(&mut r, "2 base! 101 . decimal"), "101 ");
    assert_eq!(enter(&mut r, "base@ ."), "10 ");
}

#[test]
fn test_case_insensitive_lookup() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "3 4 + DUP * ."), "49 ");
}

#[test]
fn test_comparisons_are_epsilon_aware() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "0.1 0.2 + 0.3 = ."), "-1 ");
    assert_eq!(enter(&mut r, "1 2 < . 2 1 < ."), "-1 0 ");
    assert_eq!(enter(&mut r, "5 5 >= . 5 5 <= ."), "-1 -1 ");
    assert_eq!(enter(&mut r, "1 2 <> ."), "-1 ");
}

#[test]
fn test_colon_definition() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ": double dup + ;"), "");
    assert_eq!(enter(&mut r, "21 double ."), "42 ");
    assert_eq!(enter(&mut r, ": quad double double ;  3 quad ."), "12 ");
}

#[test]
fn test_redefinition_shadows_by_name_only() {
    let mut r = Runtime::default();
    enter(&mut r, ": greet 1 ;");
    enter(&mut r, ": caller greet ;");
    enter(&mut r, ": greet 2 ;");
    // New callers see the new definition.
    assert_eq!(enter(&mut r, "greet ."), "2 ");
    // The already-compiled caller still invokes the old one by index.
    assert_eq!(enter(&mut r, "caller ."), "1 ");
}

#[test]
fn test_nested_definition_is_an_error() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ": a : b ;"), "NESTED DEFINITION b\n");
    // The partial definition of `a` was abandoned.
    assert_eq!(enter(&mut r, "a"), "UNDEFINED WORD a\n");
}

#[test]
fn test_abandoned_definition_keeps_old_meaning() {
    let mut r = Runtime::default();
    enter(&mut r, ": x 10 ;");
    assert_eq!(enter(&mut r, ": x 20 nosuchword ;"), "UNDEFINED WORD nosuchword\n");
    assert_eq!(enter(&mut r, "x ."), "10 ");
}

#[test]
fn test_variable_and_constant() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "variable x  7 x !  x @ ."), "7 ");
    assert_eq!(enter(&mut r, "5 constant five  five ."), "5 ");
    assert_eq!(enter(&mut r, ": bump x @ 1 + x ! ;  bump bump x @ ."), "9 ");
}

#[test]
fn test_dot_quote_and_output_words() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ".\" hello world\""), "hello world");
    assert_eq!(enter(&mut r, ": greet .\" hi\" cr ;  greet greet"), "hi\nhi\n");
    assert_eq!(enter(&mut r, "42 emit space 42 emit"), "* *");
}

#[test]
fn test_comments() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "1 ( this is ignored ) 2 + ."), "3 ");
    assert_eq!(enter(&mut r, "7 . \\ the rest is ignored 9 9"), "7 ");
}

#[test]
fn test_immediate_word_runs_while_compiling() {
    let mut r = Runtime::default();
    enter(&mut r, ": mark 42 ; immediate");
    // `mark` executes during compilation, leaving 42 before `probe` runs.
    assert_eq!(enter(&mut r, ": probe mark ;"), "");
    assert_eq!(enter(&mut r, ". probe"), "42 ");
    assert_eq!(r.depth(), 0);
}

#[test]
fn test_see_decompiles() {
    let mut r = Runtime::default();
    enter(&mut r, ": double dup + ;");
    assert_eq!(enter(&mut r, "see double"), ": double dup + ;\n");
    assert_eq!(enter(&mut r, "see dup"), "dup is a primitive (DUP)\n");
    assert_eq!(enter(&mut r, "see nosuchword"), "UNDEFINED WORD nosuchword\n");
}

#[test]
fn test_words_lists_definitions() {
    let mut r = Runtime::default();
    enter(&mut r, ": apogee 1 ;");
    let listing = enter(&mut r, "words");
    assert!(listing.contains("apogee"));
    assert!(listing.contains("gemm"));
}

#[test]
fn test_missing_name_after_colon() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ":"), "MISSING NAME :\n");
    assert_eq!(enter(&mut r, "variable"), "MISSING NAME variable\n");
}

#[test]
fn test_min_max_abs_negate() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "3 7 min . 3 7 max ."), "3 7 ");
    assert_eq!(enter(&mut r, "-5 abs . 5 negate ."), "5 -5 ");
}

#[test]
fn test_return_stack_words() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, ": keep >r dup r> + ;  10 3 keep . ."), "13 10 ");
}
