//! 数据变换
//!
//! 一条变换流水线由若干确定性的步骤按顺序组成：
//! 图像域步骤（如缩放）→ `ToTensor` → 张量域步骤（如归一化）。
//! 流水线在构造时校验顺序，之后对每个样本完全一致地执行。

use image::RgbImage;

use crate::data::error::DataError;
use crate::tensor::Tensor;
use crate::vision::Vision;

/// 数据加载器默认的方形分辨率
pub const DEFAULT_IMAGE_SIZE: u32 = 128;

/// 归一化配置：要么不归一化，要么给出逐通道的 mean/std
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Normalization {
    #[default]
    None,
    Stats { mean: Vec<f32>, std: Vec<f32> },
}

impl Normalization {
    /// 校验后创建`Stats`：二者非空、长度一致，且 std 全为正的有限值
    pub fn stats(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, DataError> {
        if mean.is_empty() || mean.len() != std.len() {
            return Err(DataError::NormalizationLengthMismatch {
                mean_len: mean.len(),
                std_len: std.len(),
            });
        }
        if let Some((channel, &value)) = std
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.is_finite() && **s > 0.))
        {
            return Err(DataError::InvalidStd { channel, value });
        }
        Ok(Normalization::Stats { mean, std })
    }

    /// 从两个可选参数创建：都省略为`None`，都给出为`Stats`，只给一个则报错
    pub fn from_parts(mean: Option<Vec<f32>>, std: Option<Vec<f32>>) -> Result<Self, DataError> {
        match (mean, std) {
            (None, None) => Ok(Normalization::None),
            (Some(mean), Some(std)) => Self::stats(mean, std),
            _ => Err(DataError::PartialNormalization),
        }
    }

    /// 归一化参数覆盖的通道数；不归一化时为 None
    pub fn channels(&self) -> Option<usize> {
        match self {
            Normalization::None => None,
            Normalization::Stats { mean, .. } => Some(mean.len()),
        }
    }

    /// 校验通道数与图像一致
    pub fn check_channels(&self, expected: usize) -> Result<(), DataError> {
        match self.channels() {
            Some(got) if got != expected => Err(DataError::ChannelMismatch { expected, got }),
            _ => Ok(()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Normalization::None)
    }
}

/// 单个变换步骤
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// 精确缩放到`width`x`height`（图像域）
    Resize { width: u32, height: u32 },
    /// `[H, W, C]`的u8图像 → `[C, H, W]`、取值[0, 1]的张量
    ToTensor,
    /// 逐通道`(x - mean[c]) / std[c]`（张量域）
    Normalize { mean: Vec<f32>, std: Vec<f32> },
}

impl Transform {
    fn is_image_step(&self) -> bool {
        matches!(self, Transform::Resize { .. })
    }

    fn is_tensor_step(&self) -> bool {
        matches!(self, Transform::Normalize { .. })
    }
}

/// 一条已校验的变换流水线
#[derive(Debug, Clone, PartialEq)]
pub struct Compose {
    steps: Vec<Transform>,
}

impl Compose {
    /// 校验步骤顺序后创建流水线
    ///
    /// 规则：恰好一个`ToTensor`；图像域步骤在它之前，张量域步骤在它之后。
    pub fn new(steps: Vec<Transform>) -> Result<Self, DataError> {
        let to_tensor_positions = steps
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Transform::ToTensor)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let pivot = match to_tensor_positions.as_slice() {
            [pivot] => *pivot,
            [] => {
                return Err(DataError::InvalidTransform(
                    "缺少 ToTensor 步骤".to_string(),
                ));
            }
            _ => {
                return Err(DataError::InvalidTransform(
                    "ToTensor 步骤只能出现一次".to_string(),
                ));
            }
        };

        if let Some(i) = steps[..pivot].iter().position(Transform::is_tensor_step) {
            return Err(DataError::InvalidTransform(format!(
                "第 {} 步是张量域变换，必须位于 ToTensor 之后",
                i
            )));
        }
        if let Some(i) = steps[pivot + 1..].iter().position(Transform::is_image_step) {
            return Err(DataError::InvalidTransform(format!(
                "第 {} 步是图像域变换，必须位于 ToTensor 之前",
                pivot + 1 + i
            )));
        }
        for step in &steps {
            match step {
                Transform::Resize { width, height } if *width == 0 || *height == 0 => {
                    return Err(DataError::InvalidTransform(format!(
                        "缩放尺寸必须大于 0，实际为 {}x{}",
                        width, height
                    )));
                }
                Transform::Normalize { mean, std } => {
                    Normalization::stats(mean.clone(), std.clone())?;
                }
                _ => {}
            }
        }

        Ok(Self { steps })
    }

    /// 加载器使用的标准流水线：Resize(size, size) → ToTensor → [Normalize]
    pub fn standard(size: u32, normalization: &Normalization) -> Result<Self, DataError> {
        let mut steps = vec![
            Transform::Resize {
                width: size,
                height: size,
            },
            Transform::ToTensor,
        ];
        if let Normalization::Stats { mean, std } = normalization {
            steps.push(Transform::Normalize {
                mean: mean.clone(),
                std: std.clone(),
            });
        }
        Self::new(steps)
    }

    /// 跳过顺序校验，只用于测试`apply`对非法流水线的处理
    #[cfg(test)]
    pub(crate) fn unchecked(steps: Vec<Transform>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Transform] {
        &self.steps
    }

    /// 依次执行所有步骤
    pub fn apply(&self, image: RgbImage) -> Result<Tensor, DataError> {
        let mut image = image;
        let mut tensor: Option<Tensor> = None;
        for step in &self.steps {
            match step {
                Transform::Resize { width, height } => {
                    image = Vision::resize_exact(&image, *width, *height);
                }
                Transform::ToTensor => tensor = Some(Vision::image_to_tensor(&image)),
                Transform::Normalize { mean, std } => {
                    let t = tensor.as_mut().ok_or_else(|| {
                        DataError::InvalidTransform("Normalize 必须位于 ToTensor 之后".to_string())
                    })?;
                    normalize(t, mean, std)?;
                }
            }
        }
        // 构造时已保证恰好有一个 ToTensor
        tensor.ok_or_else(|| DataError::InvalidTransform("缺少 ToTensor 步骤".to_string()))
    }
}

/// 对`[C, H, W]`张量原地做逐通道归一化
pub fn normalize(tensor: &mut Tensor, mean: &[f32], std: &[f32]) -> Result<(), DataError> {
    if mean.len() != std.len() {
        return Err(DataError::NormalizationLengthMismatch {
            mean_len: mean.len(),
            std_len: std.len(),
        });
    }
    let channels = tensor.shape().first().copied().unwrap_or(0);
    if channels != mean.len() {
        return Err(DataError::ChannelMismatch {
            expected: channels,
            got: mean.len(),
        });
    }
    for (c, mut plane) in tensor.view_mut().outer_iter_mut().enumerate() {
        let (m, s) = (mean[c], std[c]);
        plane.mapv_inplace(|x| (x - m) / s);
    }
    Ok(())
}
