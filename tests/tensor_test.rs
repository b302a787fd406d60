mod common;
use common::*;
use forth::mach::Runtime;

#[test]
fn test_literal_prints_back() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "[ 1 2 3 ] ."), "[1 2 3] ");
    assert_eq!(enter(&mut r, "[ [ 1 2 ] [ 3 4 ] ] ."), "[[1 2] [3 4]] ");
}

#[test]
fn test_element_wise_arithmetic() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(&mut r, "[ [ 1 2 ] [ 3 4 ] ] [ [ 5 6 ] [ 7 8 ] ] + ."),
        "[[6 8] [10 12]] "
    );
    assert_eq!(enter(&mut r, "[ 4 9 ] [ 1 3 ] - ."), "[3 6] ");
    assert_eq!(enter(&mut r, "[ 2 3 ] [ 4 5 ] * ."), "[8 15] ");
}

#[test]
fn test_scalar_broadcast_keeps_operand_order() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "[ 1 2 3 ] 10 * ."), "[10 20 30] ");
    assert_eq!(enter(&mut r, "1 [ 1 2 ] - ."), "[0 -1] ");
    assert_eq!(enter(&mut r, "[ 10 20 ] 2 / ."), "[5 10] ");
}

#[test]
fn test_shape_mismatch() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "[ 1 2 ] [ 1 2 3 ] +"), "SHAPE MISMATCH\n");
    assert_eq!(r.depth(), 0);
}

#[test]
fn test_matmul() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(&mut r, "[ [ 1 2 ] [ 3 4 ] ] [ [ 5 6 ] [ 7 8 ] ] matmul ."),
        "[[19 22] [43 50]] "
    );
    assert_eq!(
        enter(&mut r, "[ [ 1 2 3 ] ] [ [ 1 2 ] ] matmul"),
        "SHAPE MISMATCH; MATMUL\n"
    );
    assert_eq!(enter(&mut r, "[ 1 2 ] [ 1 2 ] matmul"), "SHAPE MISMATCH; MATMUL\n");
}

#[test]
fn test_transpose() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(&mut r, "[ [ 1 2 3 ] [ 4 5 6 ] ] transpose ."),
        "[[1 4] [2 5] [3 6]] "
    );
    assert_eq!(enter(&mut r, "[ 1 2 3 ] transpose"), "SHAPE MISMATCH; TRANSPOSE RANK\n");
}

#[test]
fn test_gemm_matches_matmul_with_unit_alpha() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(
            &mut r,
            "[ [ 1 2 ] [ 3 4 ] ] [ [ 5 6 ] [ 7 8 ] ] [ [ 0 0 ] [ 0 0 ] ] 1 0 gemm ."
        ),
        "[[19 22] [43 50]] "
    );
}

#[test]
fn test_gemm_accumulates_into_destination() {
    let mut r = Runtime::default();
    // C starts at all ones; alpha 2, beta 10.
    assert_eq!(
        enter(
            &mut r,
            "[ [ 1 0 ] [ 0 1 ] ] [ [ 1 2 ] [ 3 4 ] ] [ [ 1 1 ] [ 1 1 ] ] 2 10 gemm ."
        ),
        "[[12 14] [16 18]] "
    );
}

#[test]
fn test_inverse_is_unimplemented() {
    let mut r = Runtime::default();
    assert_eq!(
        enter(&mut r, "[ [ 1 0 ] [ 0 1 ] ] inverse"),
        "INTERNAL ERROR; INVERSE NOT IMPLEMENTED\n"
    );
}

#[test]
fn test_literal_errors() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "]"), "UNMATCHED BRANCH ]\n");
    assert_eq!(enter(&mut r, "[ ]"), "SHAPE MISMATCH; EMPTY BRACKET\n");
    assert_eq!(
        enter(&mut r, "[ [ 1 2 ] [ 3 ] ]"),
        "SHAPE MISMATCH; RAGGED LITERAL\n"
    );
    assert_eq!(enter(&mut r, "[ 1 [ 2 ] ]"), "SHAPE MISMATCH; MIXED NESTING\n");
    assert_eq!(enter(&mut r, "[ 1 foo ]"), "TYPE MISMATCH foo; IN TENSOR LITERAL\n");
    // A failed literal never leaves the reader open.
    assert_eq!(enter(&mut r, "7 ."), "7 ");
}

#[test]
fn test_compiled_literal_reuses_one_handle() {
    let mut r = Runtime::default();
    enter(&mut r, ": t2 [ 1 2 ] ;");
    // Both calls push the same pooled handle.
    assert_eq!(enter(&mut r, "t2 t2 = ."), "-1 ");
    assert_eq!(enter(&mut r, "t2 t2 + ."), "[2 4] ");
}

#[test]
fn test_tensor_equality_is_by_handle() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "[ 1 ] dup = ."), "-1 ");
    assert_eq!(enter(&mut r, "[ 1 ] [ 1 ] = ."), "0 ");
}

#[test]
fn test_exp_applies_element_wise() {
    let mut r = Runtime::default();
    assert_eq!(enter(&mut r, "[ 0 0 ] exp ."), "[1 1] ");
}

#[test]
fn test_type_mismatch_on_scalar_only_words() {
    let mut r = Runtime::default();
    assert!(enter(&mut r, "[ 1 2 ] [ 1 2 ] mod").starts_with("TYPE MISMATCH"));
    assert!(enter(&mut r, "[ 1 2 ] negate").starts_with("TYPE MISMATCH"));
}
