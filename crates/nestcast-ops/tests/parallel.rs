#![cfg(feature = "parallel")]

//! The parallel variants must agree with the serial engine exactly.

use nestcast_core::{NestedArray, Shape};
use nestcast_ops::{
    broadcast_add_explicit, broadcast_add_implicit, broadcast_combine_explicit_parallel,
    broadcast_combine_implicit_parallel, AxisAlignment,
};

fn counting_array(shape: &Shape) -> NestedArray<i64> {
    let mut array = NestedArray::filled(shape, 0i64);
    let mut walk = vec![0usize; shape.ndim()];
    let mut next = 0i64;
    loop {
        array.set(&walk, next).unwrap();
        next += 1;
        let mut axis = shape.ndim();
        loop {
            if axis == 0 {
                return array;
            }
            axis -= 1;
            walk[axis] += 1;
            if walk[axis] < shape.dims()[axis] {
                break;
            }
            walk[axis] = 0;
        }
    }
}

#[test]
fn parallel_implicit_matches_serial() {
    let left_shape = Shape::new(vec![4, 3, 1]);
    let right_shape = Shape::new(vec![1, 3, 5]);
    let left = counting_array(&left_shape);
    let right = counting_array(&right_shape);

    let (serial, serial_shape) =
        broadcast_add_implicit(&left, &left_shape, &right, &right_shape).unwrap();
    let (parallel, parallel_shape) = broadcast_combine_implicit_parallel(
        &left,
        &left_shape,
        &right,
        &right_shape,
        |a: &i64, b: &i64| a + b,
    )
    .unwrap();

    assert_eq!(serial_shape, parallel_shape);
    assert_eq!(serial, parallel);
}

#[test]
fn parallel_explicit_matches_serial() {
    use AxisAlignment::{Both, Left, Right};

    let left = counting_array(&Shape::new(vec![4, 3, 2]));
    let right = counting_array(&Shape::new(vec![5, 3, 2]));
    let alignment = [Right, Both, Left];

    let (serial, serial_shape) = broadcast_add_explicit(&left, &right, &alignment).unwrap();
    let (parallel, parallel_shape) =
        broadcast_combine_explicit_parallel(&left, &right, &alignment, |a: &i64, b: &i64| a + b)
            .unwrap();

    assert_eq!(serial_shape, parallel_shape);
    assert_eq!(serial, parallel);
}

#[test]
fn parallel_scalar_operands() {
    let (out, out_shape) = broadcast_combine_implicit_parallel(
        &NestedArray::Leaf(2i64),
        &Shape::scalar(),
        &NestedArray::Leaf(3i64),
        &Shape::scalar(),
        |a: &i64, b: &i64| a + b,
    )
    .unwrap();
    assert_eq!(out_shape, Shape::scalar());
    assert_eq!(out, NestedArray::Leaf(5));
}
