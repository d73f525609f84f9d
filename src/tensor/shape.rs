use ndarray::{Axis, stack};

use super::Tensor;
use crate::errors::TensorError;

impl Tensor {
    /// 将多个形状相同的张量沿新增的首个维度堆叠起来，返回一个新的张量。
    /// 如：n个形状为`[c, h, w]`的图像张量，堆叠后形状为`[n, c, h, w]`。
    ///
    /// 列表为空或形状不一致时返回错误。
    pub fn stack(tensors: &[&Self]) -> Result<Self, TensorError> {
        let first = tensors.first().ok_or(TensorError::EmptyList)?;
        if let Some(bad) = tensors.iter().find(|t| !t.is_same_shape(first)) {
            return Err(TensorError::InconsistentShape {
                expected: first.shape().to_vec(),
                got: bad.shape().to_vec(),
            });
        }

        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = stack(Axis(0), &views).map_err(|_| TensorError::IncompatibleShape)?;
        Ok(Tensor { data })
    }

    /// 取出首个维度上第`index`个切片，如从`[n, c, h, w]`中取出第`index`张`[c, h, w]`图像
    pub fn select_first(&self, index: usize) -> Result<Self, TensorError> {
        let len = self.shape().first().copied().unwrap_or(0);
        if index >= len {
            return Err(TensorError::IndexOutOfBounds { index, len });
        }
        Ok(Tensor {
            data: self.data.index_axis(Axis(0), index).to_owned(),
        })
    }
}
