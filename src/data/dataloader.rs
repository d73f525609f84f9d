/*
 * @Description  : DataLoader - PyTorch 风格的图像批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle / seed)
 * - 丢弃不完整批次 (drop_last)
 * - 多线程预取 (num_workers / prefetch_batches)：生产者线程把批次放进有界队列，
 *   每个批次内的样本在 rayon 线程池上并行读取、变换
 */

use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, bounded};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::data::config::{DEFAULT_PREFETCH_BATCHES, LoaderConfig};
use crate::data::datasets::ImageFolderDataset;
use crate::data::error::DataError;
use crate::tensor::Tensor;

/// 一个批次：图像`[N, C, H, W]`、对应标签，以及这些样本在数据集中的位置
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    pub images: Tensor,
    pub labels: Vec<usize>,
    pub indices: Vec<usize>,
}

impl ImageBatch {
    /// 批次中的样本数
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 取出批次中第 i 张图像`[C, H, W]`
    pub fn image(&self, i: usize) -> Result<Tensor, DataError> {
        Ok(self.images.select_first(i)?)
    }
}

/// 是否检测到可用的加速设备（CUDA 设备节点）
pub fn accelerator_available() -> bool {
    ["/dev/nvidiactl", "/dev/nvidia0"]
        .iter()
        .any(|p| Path::new(p).exists())
}

/// DataLoader 构造器
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::builder(32)
///     .shuffle(true)
///     .num_workers(4)
///     .build(dataset)?;
/// ```
#[derive(Debug, Clone)]
pub struct DataLoaderBuilder {
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    num_workers: usize,
    prefetch_batches: usize,
    pin_memory: Option<bool>,
}

impl DataLoaderBuilder {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
            num_workers: 0,
            prefetch_batches: DEFAULT_PREFETCH_BATCHES,
            pin_memory: None,
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置预取线程数，0 表示在调用方线程上同步加载
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// 设置预取队列深度（批次数）
    pub fn prefetch_batches(mut self, prefetch_batches: usize) -> Self {
        self.prefetch_batches = prefetch_batches;
        self
    }

    /// 强制设置是否启用锁页内存；不设置则根据是否检测到加速设备决定
    pub fn pin_memory(mut self, pin_memory: bool) -> Self {
        self.pin_memory = Some(pin_memory);
        self
    }

    /// 应用一份`LoaderConfig`中的批处理/预取参数（不含 shuffle，其由划分决定）
    pub fn config(mut self, config: &LoaderConfig) -> Self {
        self.drop_last = config.drop_last;
        self.seed = config.seed;
        self.num_workers = config.num_workers;
        self.prefetch_batches = config.prefetch_batches;
        self.pin_memory = config.pin_memory;
        self
    }

    /// 校验参数、创建线程池并得到 DataLoader
    pub fn build(
        self,
        dataset: impl Into<Arc<ImageFolderDataset>>,
    ) -> Result<DataLoader, DataError> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidBatchSize(self.batch_size));
        }
        let pool = if self.num_workers > 0 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.num_workers)
                .thread_name(|i| format!("data-worker-{}", i))
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(DataLoader {
            dataset: dataset.into(),
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            drop_last: self.drop_last,
            seed: self.seed,
            num_workers: self.num_workers,
            prefetch_batches: self.prefetch_batches.max(1),
            pin_memory: self.pin_memory.unwrap_or_else(accelerator_available),
            pool,
        })
    }
}

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// 构造后不可变；每次调用`iter()`开始一个新的 epoch。
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 32)?;
///
/// for batch in loader.iter() {
///     let batch = batch?;
///     model.forward(&batch.images)?;
/// }
/// ```
#[derive(Debug)]
pub struct DataLoader {
    dataset: Arc<ImageFolderDataset>,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    num_workers: usize,
    prefetch_batches: usize,
    pin_memory: bool,
    pool: Option<Arc<ThreadPool>>,
}

impl DataLoader {
    /// 创建一个顺序、同步加载的 DataLoader
    ///
    /// # 参数
    /// - `dataset`: 数据集
    /// - `batch_size`: 批大小，必须大于 0
    pub fn new(
        dataset: impl Into<Arc<ImageFolderDataset>>,
        batch_size: usize,
    ) -> Result<Self, DataError> {
        DataLoaderBuilder::new(batch_size).build(dataset)
    }

    pub fn builder(batch_size: usize) -> DataLoaderBuilder {
        DataLoaderBuilder::new(batch_size)
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn dataset(&self) -> &ImageFolderDataset {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_drop_last(&self) -> bool {
        self.drop_last
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn prefetch_batches(&self) -> usize {
        self.prefetch_batches
    }

    /// 是否启用锁页内存
    ///
    /// 本库的批次总是驻留在主机内存中，该标记只向下游的设备拷贝环节表明意图。
    pub fn pin_memory(&self) -> bool {
        self.pin_memory
    }

    /// 创建一个 epoch 的迭代器
    ///
    /// 每个元素是`Result<ImageBatch, DataError>`；一旦出现错误，本轮迭代随即结束。
    pub fn iter(&self) -> DataLoaderIter {
        let batches = self.epoch_batches();
        let remaining = batches.len();
        let inner = match &self.pool {
            None => IterKind::Sync {
                dataset: Arc::clone(&self.dataset),
                batches: batches.into_iter(),
            },
            Some(pool) => IterKind::Prefetch {
                rx: spawn_prefetch(
                    Arc::clone(&self.dataset),
                    Arc::clone(pool),
                    batches,
                    self.prefetch_batches,
                ),
            },
        };
        DataLoaderIter {
            inner,
            remaining,
            finished: false,
        }
    }

    /// 生成本 epoch 的样本顺序并切分成批次
    fn epoch_batches(&self) -> Vec<Vec<usize>> {
        let n = self.dataset.len();
        let mut indices: Vec<usize> = (0..n).collect();

        // 如果需要打乱
        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        indices
            .chunks(self.batch_size)
            .filter(|chunk| !(self.drop_last && chunk.len() < self.batch_size))
            .map(<[usize]>::to_vec)
            .collect()
    }
}

impl<'a> IntoIterator for &'a DataLoader {
    type Item = Result<ImageBatch, DataError>;
    type IntoIter = DataLoaderIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 生产者线程：按顺序在线程池上加载每个批次并送入有界队列。
/// 队列满时阻塞；消费端丢弃迭代器后发送失败，线程随即退出。
fn spawn_prefetch(
    dataset: Arc<ImageFolderDataset>,
    pool: Arc<ThreadPool>,
    batches: Vec<Vec<usize>>,
    depth: usize,
) -> Receiver<Result<ImageBatch, DataError>> {
    let (tx, rx) = bounded(depth);
    thread::spawn(move || {
        for indices in batches {
            let result = pool.install(|| load_batch(&dataset, &indices, true));
            let failed = result.is_err();
            if let Err(e) = &result {
                eprintln!("[data] 预取批次失败，本轮迭代终止: {}", e);
            }
            if tx.send(result).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// 读取并变换一组样本，拼成一个批次
fn load_batch(
    dataset: &ImageFolderDataset,
    indices: &[usize],
    parallel: bool,
) -> Result<ImageBatch, DataError> {
    let samples = if parallel {
        indices
            .par_iter()
            .map(|&i| dataset.get(i))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        indices
            .iter()
            .map(|&i| dataset.get(i))
            .collect::<Result<Vec<_>, _>>()?
    };

    let images = samples.iter().map(|(image, _)| image).collect::<Vec<_>>();
    Ok(ImageBatch {
        images: Tensor::stack(&images)?,
        labels: samples.iter().map(|(_, label)| *label).collect(),
        indices: indices.to_vec(),
    })
}

enum IterKind {
    Sync {
        dataset: Arc<ImageFolderDataset>,
        batches: std::vec::IntoIter<Vec<usize>>,
    },
    Prefetch {
        rx: Receiver<Result<ImageBatch, DataError>>,
    },
}

/// DataLoader 迭代器
pub struct DataLoaderIter {
    inner: IterKind,
    remaining: usize,
    finished: bool,
}

impl DataLoaderIter {
    /// 本轮尚未产出的批次数
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for DataLoaderIter {
    type Item = Result<ImageBatch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = match &mut self.inner {
            IterKind::Sync { dataset, batches } => {
                let dataset: &ImageFolderDataset = dataset;
                batches
                    .next()
                    .map(|indices| load_batch(dataset, &indices, false))
            }
            IterKind::Prefetch { rx } => match rx.recv() {
                Ok(item) => Some(item),
                // 生产者提前退出（如线程 panic）
                Err(_) if self.remaining > 0 => Some(Err(DataError::WorkerDisconnected)),
                Err(_) => None,
            },
        };

        match &item {
            Some(Ok(_)) => self.remaining = self.remaining.saturating_sub(1),
            Some(Err(_)) | None => self.finished = true,
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}
