//! 数据加载模块
//!
//! 提供数据集加载、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`CustomDataLoader`]: 雪地检测数据集的加载器（按划分加载、缩放、归一化、批量预取）
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`ImageFolderDataset`]: 按目录组织的图像分类数据集
//! - [`transforms`]: 变换流水线（缩放、转张量、归一化）
//! - [`LoaderConfig`]: 批处理与预取参数，可从 JSON 读取
//! - [`compute_channel_stats`]: 计算逐通道均值/标准差
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use snow_loader::data::{CustomDataLoader, DatasetType, Normalization};
//!
//! let norm = Normalization::stats(vec![0.5; 3], vec![0.25; 3])?;
//! let loader = CustomDataLoader::new("data/snow", 32, DatasetType::Train, norm)?;
//!
//! for epoch in 0..10 {
//!     for batch in loader.iter() {
//!         let batch = batch?;
//!         model.forward(&batch.images)?;
//!     }
//! }
//! ```

pub mod config;
mod custom;
mod dataloader;
pub mod datasets;
pub mod error;
mod stats;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::{CustomDataLoaderConfig, LoaderConfig, default_num_workers};
pub use custom::CustomDataLoader;
pub use dataloader::{
    DataLoader, DataLoaderBuilder, DataLoaderIter, ImageBatch, accelerator_available,
};
pub use datasets::{DatasetType, ImageFolderDataset, discover_labels, discover_samples};
pub use error::DataError;
pub use stats::{ChannelStats, compute_channel_stats};
pub use transforms::{Compose, DEFAULT_IMAGE_SIZE, Normalization, Transform};
