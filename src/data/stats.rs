//! 逐通道统计量
//!
//! 在（通常不带归一化的）数据集上计算每个通道的均值和总体标准差，
//! 结果可直接作为加载器的`Normalization::Stats`。

use rayon::prelude::*;

use crate::data::datasets::ImageFolderDataset;
use crate::data::error::DataError;
use crate::data::transforms::Normalization;
use crate::tensor::Tensor;

/// 逐通道的均值与标准差
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl ChannelStats {
    /// 转换为归一化配置；某个通道的标准差为 0（如纯色数据集）时返回错误
    pub fn into_normalization(self) -> Result<Normalization, DataError> {
        Normalization::stats(self.mean, self.std)
    }
}

#[derive(Debug, Default)]
struct Moments {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
    count: u64,
}

impl Moments {
    fn of(tensor: &Tensor) -> Self {
        let view = tensor.view();
        let mut moments = Moments::default();
        for plane in view.outer_iter() {
            moments.sum.push(plane.iter().map(|&x| f64::from(x)).sum());
            moments
                .sum_sq
                .push(plane.iter().map(|&x| f64::from(x) * f64::from(x)).sum());
        }
        moments.count = view.outer_iter().next().map_or(0, |p| p.len() as u64);
        moments
    }

    fn merge(self, other: Self) -> Result<Self, DataError> {
        if self.count == 0 {
            return Ok(other);
        }
        if other.count == 0 {
            return Ok(self);
        }
        if self.sum.len() != other.sum.len() {
            return Err(DataError::ChannelMismatch {
                expected: self.sum.len(),
                got: other.sum.len(),
            });
        }
        let add = |a: Vec<f64>, b: Vec<f64>| -> Vec<f64> {
            a.iter().zip(&b).map(|(x, y)| x + y).collect()
        };
        Ok(Moments {
            sum: add(self.sum, other.sum),
            sum_sq: add(self.sum_sq, other.sum_sq),
            count: self.count + other.count,
        })
    }
}

/// 并行遍历数据集的所有样本，计算逐通道均值与总体标准差
///
/// 任何一个样本读取失败都会使整个计算失败。
pub fn compute_channel_stats(dataset: &ImageFolderDataset) -> Result<ChannelStats, DataError> {
    let moments = (0..dataset.len())
        .into_par_iter()
        .map(|i| dataset.get(i).map(|(image, _)| Moments::of(&image)))
        .try_reduce(Moments::default, Moments::merge)?;

    if moments.count == 0 {
        return Err(DataError::NoImagesFound(dataset.root().to_path_buf()));
    }
    let n = moments.count as f64;
    let mean = moments.sum.iter().map(|s| s / n).collect::<Vec<_>>();
    let std = moments
        .sum_sq
        .iter()
        .zip(&mean)
        .map(|(sq, m)| (sq / n - m * m).max(0.).sqrt() as f32)
        .collect();
    Ok(ChannelStats {
        mean: mean.into_iter().map(|m| m as f32).collect(),
        std,
    })
}
