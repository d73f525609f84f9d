use std::ops::{Index, IndexMut};

use super::Tensor;

impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        assert_eq!(
            N,
            self.dimension(),
            "索引维数({})与张量维数({})不一致",
            N,
            self.dimension()
        );
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        assert_eq!(
            N,
            self.dimension(),
            "索引维数({})与张量维数({})不一致",
            N,
            self.dimension()
        );
        &mut self.data[&index[..]]
    }
}
