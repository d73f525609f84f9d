use crate::tensor::Tensor;

#[test]
fn test_index_chw() {
    // [c=2, h=2, w=3]
    let data = (0..12).map(|x| x as f32).collect::<Vec<_>>();
    let tensor = Tensor::new(&data, &[2, 2, 3]);
    assert_eq!(tensor[[0, 0, 0]], 0.);
    assert_eq!(tensor[[0, 1, 2]], 5.);
    assert_eq!(tensor[[1, 0, 0]], 6.);
    assert_eq!(tensor[[1, 1, 2]], 11.);
}

#[test]
fn test_index_mut() {
    let mut tensor = Tensor::zeros(&[2, 2]);
    tensor[[1, 0]] = 7.5;
    assert_eq!(tensor.to_vec(), vec![0., 0., 7.5, 0.]);
}

#[test]
#[should_panic(expected = "索引维数(2)与张量维数(3)不一致")]
fn test_index_with_wrong_rank() {
    let tensor = Tensor::zeros(&[1, 2, 2]);
    let _ = tensor[[0, 0]];
}
