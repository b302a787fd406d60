use crate::mach::{DataStack, Stack, Val};

#[test]
fn test_cached_top_tracks_head() {
    // The cache must equal the model's head after every operation.
    let mut stack = DataStack::new(16);
    let mut model: Vec<f32> = Vec::new();
    let script: &[(bool, f32)] = &[
        (true, 1.0),
        (true, 2.0),
        (false, 0.0),
        (true, 3.0),
        (true, 4.0),
        (false, 0.0),
        (false, 0.0),
        (true, 5.0),
        (false, 0.0),
        (false, 0.0),
    ];
    for (push, value) in script {
        if *push {
            stack.push(Val::Scalar(*value)).unwrap();
            model.push(*value);
        } else {
            let got = stack.pop().unwrap().scalar().unwrap();
            assert_eq!(got, model.pop().unwrap());
        }
        assert_eq!(stack.depth(), model.len());
        match model.last() {
            Some(head) => {
                assert_eq!(stack.peek().unwrap().scalar().unwrap(), *head);
                let dump = stack.dump();
                assert_eq!(dump.last().unwrap().scalar().unwrap(), *head);
                assert_eq!(dump.len(), model.len());
            }
            None => assert!(stack.peek().is_err()),
        }
    }
}

#[test]
fn test_data_stack_bounds() {
    let mut stack = DataStack::new(2);
    stack.push(Val::Scalar(1.0)).unwrap();
    stack.push(Val::Scalar(2.0)).unwrap();
    assert!(stack.push(Val::Scalar(3.0)).is_err());
    stack.pop().unwrap();
    stack.pop().unwrap();
    assert!(stack.pop().is_err());
}

#[test]
fn test_return_stack_bounds() {
    let mut stack: Stack<Val> = Stack::new("RETURN", 2);
    stack.push(Val::Scalar(1.0)).unwrap();
    stack.push(Val::Scalar(2.0)).unwrap();
    assert!(stack.push(Val::Scalar(3.0)).is_err());
    assert_eq!(stack.pop().unwrap().scalar().unwrap(), 2.0);
}

#[test]
fn test_pick_reaches_below_cache() {
    let mut stack = DataStack::new(8);
    for v in 1..=4 {
        stack.push(Val::Scalar(v as f32)).unwrap();
    }
    assert_eq!(stack.pick(0).unwrap().scalar().unwrap(), 4.0);
    assert_eq!(stack.pick(1).unwrap().scalar().unwrap(), 3.0);
    assert_eq!(stack.pick(3).unwrap().scalar().unwrap(), 1.0);
    assert!(stack.pick(4).is_err());
}
