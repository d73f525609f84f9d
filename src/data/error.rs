//! 数据加载错误类型定义

use std::path::PathBuf;

use thiserror::Error;

use crate::errors::TensorError;

/// 数据加载相关错误
///
/// 配置类错误（路径、批大小、归一化参数等）在构造时立即返回；
/// IO/解码错误在访问具体样本时返回；任何错误都不会被吞掉或跳过。
#[derive(Debug, Error)]
pub enum DataError {
    /// 目录不存在或不是目录
    #[error("目录不存在: {0}")]
    DirectoryNotFound(PathBuf),

    /// 数据集目录下没有任何类别子目录
    #[error("未找到任何类别子目录: {0}")]
    NoClassFound(PathBuf),

    /// 所有类别子目录下都没有可识别的图像文件
    #[error("未找到任何图像文件: {0}")]
    NoImagesFound(PathBuf),

    /// 某些类别子目录下没有可识别的图像文件
    #[error("以下类别在 {root} 下没有任何图像文件: {classes:?}")]
    EmptyClass { root: PathBuf, classes: Vec<String> },

    /// 类别子目录名不是合法的 UTF-8
    #[error("类别目录名不是合法的 UTF-8: {0}")]
    InvalidClassName(PathBuf),

    /// 批大小必须大于 0
    #[error("批大小必须大于 0，实际为 {0}")]
    InvalidBatchSize(usize),

    /// 数据集划分名称只能是 train 或 test
    #[error("未知的数据集划分: {0}（只能是 train 或 test）")]
    InvalidDatasetType(String),

    /// mean 与 std 只给了其中一个
    #[error("归一化参数不完整: mean 与 std 必须同时给出或同时省略")]
    PartialNormalization,

    /// mean 与 std 长度不一致（或为空）
    #[error("归一化参数长度不匹配: mean 长度 {mean_len}, std 长度 {std_len}")]
    NormalizationLengthMismatch { mean_len: usize, std_len: usize },

    /// std 中存在非正数或非有限值
    #[error("std 必须全部为正数，第 {channel} 个通道为 {value}")]
    InvalidStd { channel: usize, value: f32 },

    /// 归一化参数的通道数与图像通道数不一致
    #[error("通道数不匹配: 图像有 {expected} 个通道，归一化参数有 {got} 个")]
    ChannelMismatch { expected: usize, got: usize },

    /// 变换流水线的步骤顺序不合法
    #[error("非法的变换流水线: {0}")]
    InvalidTransform(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 张量操作失败（如批次内图像形状不一致）
    #[error("张量错误: {0}")]
    Tensor(#[from] TensorError),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 图像读取或解码失败
    #[error("图像读取失败 {path}: {source}")]
    ImageError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 配置文件解析失败
    #[error("配置解析失败: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// 预取线程池创建失败
    #[error("线程池创建失败: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// 预取线程意外退出
    #[error("预取线程意外断开")]
    WorkerDisconnected,
}
