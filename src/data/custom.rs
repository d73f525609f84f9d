/*
 * @Description  : CustomDataLoader - 雪地检测数据集的加载器
 *
 * 目录布局：<data_path>/<train|test>/<类别名>/<图像文件>
 * 构造时：
 * 1. 建立变换流水线：Resize(128x128) → ToTensor → [Normalize(mean, std)]
 * 2. 扫描对应划分的目录，类别名按字典序映射为整数标签
 * 3. 包装成 DataLoader：仅训练集打乱；按 CPU 并行度预取；检测到加速设备时启用锁页内存
 * 构造完成后不可变。
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data::config::{CustomDataLoaderConfig, LoaderConfig};
use crate::data::dataloader::{DataLoader, DataLoaderIter, ImageBatch};
use crate::data::datasets::{DatasetType, ImageFolderDataset};
use crate::data::error::DataError;
use crate::data::transforms::{Compose, Normalization};
use crate::tensor::Tensor;
use crate::vision::RGB_CHANNELS;

/// 雪地检测数据集的加载器
///
/// # 示例
/// ```ignore
/// use snow_loader::data::{CustomDataLoader, DatasetType, Normalization};
///
/// let train = CustomDataLoader::new("data/snow", 32, DatasetType::Train, Normalization::None)?;
/// println!("训练样本数: {}", train.len());
/// for batch in train.iter() {
///     let batch = batch?;
///     // batch.images: [N, 3, 128, 128], batch.labels: Vec<usize>
/// }
/// ```
#[derive(Debug)]
pub struct CustomDataLoader {
    data_path: PathBuf,
    dataset_type: DatasetType,
    normalization: Normalization,
    loader: DataLoader,
}

impl CustomDataLoader {
    /// 以默认的加载器参数创建（128x128，预取线程数为 CPU 并行度）
    ///
    /// # 参数
    /// - `data_path`: 数据集根目录，其下有 train/test 子目录
    /// - `batch_size`: 批大小，必须大于 0
    /// - `dataset_type`: 加载哪个划分
    /// - `normalization`: 是否按给定的 mean/std 归一化
    pub fn new<P: AsRef<Path>>(
        data_path: P,
        batch_size: usize,
        dataset_type: DatasetType,
        normalization: Normalization,
    ) -> Result<Self, DataError> {
        Self::with_config(
            data_path,
            batch_size,
            dataset_type,
            normalization,
            &LoaderConfig::default(),
        )
    }

    /// 同`new`，但显式指定加载器参数
    pub fn with_config<P: AsRef<Path>>(
        data_path: P,
        batch_size: usize,
        dataset_type: DatasetType,
        normalization: Normalization,
        config: &LoaderConfig,
    ) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::InvalidBatchSize(batch_size));
        }
        normalization.check_channels(RGB_CHANNELS)?;
        let transform = Compose::standard(config.image_size, &normalization)?;

        let data_path = data_path.as_ref().to_path_buf();
        let dataset = ImageFolderDataset::new(data_path.join(dataset_type.as_str()), transform)?;
        let loader = DataLoader::builder(batch_size)
            .config(config)
            .shuffle(dataset_type.shuffles())
            .build(dataset)?;

        println!(
            "[data] 已加载 {} 划分: {} 个样本, 类别 {:?}, 批大小 {}, 预取线程 {}, 锁页内存 {}",
            dataset_type,
            loader.len(),
            loader.dataset().classes(),
            batch_size,
            loader.num_workers(),
            loader.pin_memory()
        );

        Ok(Self {
            data_path,
            dataset_type,
            normalization,
            loader,
        })
    }

    /// 由完整配置创建；mean/std 只给出其中一个时报错
    pub fn from_config(config: &CustomDataLoaderConfig) -> Result<Self, DataError> {
        let normalization = config.normalization()?;
        Self::with_config(
            &config.data_path,
            config.batch_size,
            config.dataset_type,
            normalization,
            &config.loader,
        )
    }

    /// 获取第 index 个样本：(变换后的图像`[3, 128, 128]`, 标签)
    pub fn get(&self, index: usize) -> Result<(Tensor, usize), DataError> {
        self.loader.dataset().get(index)
    }

    /// 返回该划分的样本数量
    pub fn len(&self) -> usize {
        self.loader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loader.is_empty()
    }

    /// 开始一个新的 epoch
    pub fn iter(&self) -> DataLoaderIter {
        self.loader.iter()
    }

    pub fn num_batches(&self) -> usize {
        self.loader.num_batches()
    }

    pub fn batch_size(&self) -> usize {
        self.loader.batch_size()
    }

    pub fn dataset_type(&self) -> DatasetType {
        self.dataset_type
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    /// 按标签索引排列的类别名
    pub fn classes(&self) -> &[String] {
        self.loader.dataset().classes()
    }

    pub fn class_to_idx(&self) -> &BTreeMap<String, usize> {
        self.loader.dataset().class_to_idx()
    }

    pub fn dataset(&self) -> &ImageFolderDataset {
        self.loader.dataset()
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }
}

impl<'a> IntoIterator for &'a CustomDataLoader {
    type Item = Result<ImageBatch, DataError>;
    type IntoIter = DataLoaderIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
