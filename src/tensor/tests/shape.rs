use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_stack_images_into_batch() {
    let a = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 2]);
    let b = Tensor::new(&[5., 6., 7., 8.], &[1, 2, 2]);
    let c = Tensor::new(&[9., 10., 11., 12.], &[1, 2, 2]);

    let batch = Tensor::stack(&[&a, &b, &c]).unwrap();
    assert_eq!(batch.shape(), &[3, 1, 2, 2]);
    assert_eq!(batch[[0, 0, 0, 0]], 1.);
    assert_eq!(batch[[1, 0, 1, 0]], 7.);
    assert_eq!(batch[[2, 0, 1, 1]], 12.);
}

#[test]
fn test_stack_empty_list() {
    assert_eq!(Tensor::stack(&[]), Err(TensorError::EmptyList));
}

#[test]
fn test_stack_inconsistent_shape() {
    let a = Tensor::zeros(&[3, 2, 2]);
    let b = Tensor::zeros(&[1, 2, 2]);
    assert_eq!(
        Tensor::stack(&[&a, &b]),
        Err(TensorError::InconsistentShape {
            expected: vec![3, 2, 2],
            got: vec![1, 2, 2]
        })
    );
}

#[test]
fn test_select_first() {
    let a = Tensor::new(&[1., 2.], &[1, 2]);
    let b = Tensor::new(&[3., 4.], &[1, 2]);
    let batch = Tensor::stack(&[&a, &b]).unwrap();

    assert_eq!(batch.select_first(1).unwrap(), b);
    assert_eq!(
        batch.select_first(2),
        Err(TensorError::IndexOutOfBounds { index: 2, len: 2 })
    );
}
