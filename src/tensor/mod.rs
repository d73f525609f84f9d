//! 张量模块
//!
//! 数据加载只需要一个轻量的`f32`张量：承载单张图像`[C, H, W]`或一个批次`[N, C, H, W]`。
//! 底层是`ndarray`的动态维数组。

use ndarray::{Array, ArrayViewD, ArrayViewMutD, IxDyn};

use crate::errors::TensorError;

mod index;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    /// 需要可恢复的错误时请用[`Tensor::from_vec`]。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::from_vec(data.to_vec(), shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// 用已有的数据（按行优先排列）创建张量，数据长度与形状不符时返回错误
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Tensor, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            });
        }
        Array::from_shape_vec(IxDyn(shape), data)
            .map(|data| Tensor { data })
            .map_err(|_| TensorError::IncompatibleShape)
    }

    /// 创建一个元素全为0的张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.data.view_mut()
    }
}
