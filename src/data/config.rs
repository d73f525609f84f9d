//! 加载器配置
//!
//! `LoaderConfig`是预取/批处理的调优参数，缺省字段取默认值；
//! `CustomDataLoaderConfig`在其基础上加上数据路径、批大小、划分和归一化参数，
//! 可以整体从 JSON 文件读取。
//!
//! ```json
//! {
//!     "data_path": "data/snow",
//!     "batch_size": 32,
//!     "dataset_type": "train",
//!     "mean": [0.5, 0.5, 0.5],
//!     "std": [0.25, 0.25, 0.25],
//!     "num_workers": 4
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::datasets::DatasetType;
use crate::data::error::DataError;
use crate::data::transforms::{DEFAULT_IMAGE_SIZE, Normalization};

/// 预取队列默认能缓存的批次数
pub const DEFAULT_PREFETCH_BATCHES: usize = 2;

/// 默认的预取线程数：可用的 CPU 并行度，取不到时为 1
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// 批处理与预取的调优参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 图像缩放后的边长（方形）
    pub image_size: u32,
    /// 预取线程数；0 表示在调用方线程上同步加载
    pub num_workers: usize,
    /// 预取队列深度（批次数），至少为 1
    pub prefetch_batches: usize,
    /// 是否启用锁页内存；None 表示根据是否检测到加速设备自动决定
    pub pin_memory: Option<bool>,
    /// 打乱顺序用的随机种子；None 表示每个 epoch 都重新随机
    pub seed: Option<u64>,
    /// 是否丢弃最后一个不完整的批次
    pub drop_last: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            num_workers: default_num_workers(),
            prefetch_batches: DEFAULT_PREFETCH_BATCHES,
            pin_memory: None,
            seed: None,
            drop_last: false,
        }
    }
}

impl LoaderConfig {
    /// 从 JSON 文件读取
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        read_json(path.as_ref())
    }
}

/// `CustomDataLoader`的完整构造参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDataLoaderConfig {
    pub data_path: PathBuf,
    pub batch_size: usize,
    pub dataset_type: DatasetType,
    #[serde(default)]
    pub mean: Option<Vec<f32>>,
    #[serde(default)]
    pub std: Option<Vec<f32>>,
    #[serde(flatten)]
    pub loader: LoaderConfig,
}

impl CustomDataLoaderConfig {
    pub fn new<P: AsRef<Path>>(data_path: P, batch_size: usize, dataset_type: DatasetType) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            batch_size,
            dataset_type,
            mean: None,
            std: None,
            loader: LoaderConfig::default(),
        }
    }

    /// 从 JSON 文件读取
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        read_json(path.as_ref())
    }

    /// 从 JSON 字符串读取
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 将 mean/std 解析为`Normalization`；只给出其中一个时报错
    pub fn normalization(&self) -> Result<Normalization, DataError> {
        Normalization::from_parts(self.mean.clone(), self.std.clone())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, DataError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
