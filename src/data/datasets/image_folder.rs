/*
 * @Description  : ImageFolder 数据集
 *
 * 目录布局：
 *   <root>/<类别名>/<图像文件>
 * 每个直接子目录是一个类别，类别索引按目录名的字典序分配；
 * 类别目录下（含更深层子目录）所有可识别扩展名的文件都是该类别的样本。
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::error::DataError;
use crate::data::transforms::Compose;
use crate::tensor::Tensor;
use crate::vision::Vision;

/// 被当作图像样本的文件扩展名（不区分大小写）
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "ppm", "bmp", "pgm", "tif", "tiff", "webp",
];

/// 扫描`root`下的类别子目录，返回按名称字典序排列的`(类别名, 索引)`
///
/// `root`不存在时返回`DirectoryNotFound`，没有任何子目录时返回`NoClassFound`，
/// 子目录名不是合法 UTF-8 时返回`InvalidClassName`。
pub fn discover_labels<P: AsRef<Path>>(root: P) -> Result<Vec<(String, usize)>, DataError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(DataError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => names.push(name.to_string()),
                None => return Err(DataError::InvalidClassName(path)),
            }
        }
    }
    if names.is_empty() {
        return Err(DataError::NoClassFound(root.to_path_buf()));
    }

    names.sort();
    Ok(names.into_iter().enumerate().map(|(i, n)| (n, i)).collect())
}

/// 收集每个类别目录下的图像文件，返回`(文件路径, 类别索引)`
///
/// 顺序是确定的：先按类别顺序，类别内按路径排序（同一目录中文件先于子目录）。
/// 非图像文件会被忽略，但不会在此处尝试解码。
pub fn discover_samples<P: AsRef<Path>>(
    root: P,
    labels: &[(String, usize)],
) -> Result<Vec<(PathBuf, usize)>, DataError> {
    let root = root.as_ref();
    let mut samples = Vec::new();
    for (name, index) in labels {
        collect_images(&root.join(name), *index, &mut samples)?;
    }
    Ok(samples)
}

fn collect_images(
    dir: &Path,
    label: usize,
    samples: &mut Vec<(PathBuf, usize)>,
) -> Result<(), DataError> {
    let mut entries = fs::read_dir(dir)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|p| p.is_dir());
    samples.extend(
        files
            .into_iter()
            .filter(|p| is_image_file(p))
            .map(|p| (p, label)),
    );
    for sub in dirs {
        collect_images(&sub, label, samples)?;
    }
    Ok(())
}

fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// 按目录组织的图像分类数据集
///
/// 构造时只扫描目录，不解码图像；每次`get`才读取并变换对应文件。
/// 构造后不可变，可以通过`Arc`在多个预取线程间只读共享。
///
/// # 示例
/// ```ignore
/// let transform = Compose::standard(128, &Normalization::None)?;
/// let dataset = ImageFolderDataset::new("data/train", transform)?;
/// let (image, label) = dataset.get(0)?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageFolderDataset {
    root: PathBuf,
    classes: Vec<String>,
    class_to_idx: BTreeMap<String, usize>,
    samples: Vec<(PathBuf, usize)>,
    transform: Compose,
}

impl ImageFolderDataset {
    /// 扫描`root`并创建数据集
    ///
    /// 目录不存在、没有类别、没有任何图像文件，或者某个类别目录下没有图像文件时返回错误。
    pub fn new<P: AsRef<Path>>(root: P, transform: Compose) -> Result<Self, DataError> {
        let root = root.as_ref().to_path_buf();
        let labels = discover_labels(&root)?;
        let samples = discover_samples(&root, &labels)?;
        if samples.is_empty() {
            return Err(DataError::NoImagesFound(root));
        }
        let empty = labels
            .iter()
            .filter(|(_, index)| !samples.iter().any(|(_, label)| label == index))
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        if !empty.is_empty() {
            return Err(DataError::EmptyClass {
                root,
                classes: empty,
            });
        }

        let classes = labels.iter().map(|(name, _)| name.clone()).collect();
        let class_to_idx = labels.into_iter().collect();
        Ok(Self {
            root,
            classes,
            class_to_idx,
            samples,
            transform,
        })
    }

    /// 返回数据集中的样本数量
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// 数据集是否为空（成功构造的数据集不会为空）
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 获取第 index 个样本
    ///
    /// # 返回
    /// (image, label) 元组，image 为变换流水线的输出（标准流水线下为`[3, H, W]`）
    pub fn get(&self, index: usize) -> Result<(Tensor, usize), DataError> {
        let (path, label) = self.samples.get(index).ok_or(DataError::IndexOutOfBounds {
            index,
            len: self.len(),
        })?;
        let image = Vision::load_rgb_image(path).map_err(|source| DataError::ImageError {
            path: path.clone(),
            source,
        })?;
        Ok((self.transform.apply(image)?, *label))
    }

    /// 第 index 个样本的标签，不读取文件
    pub fn label(&self, index: usize) -> Option<usize> {
        self.samples.get(index).map(|(_, label)| *label)
    }

    /// 第 index 个样本的文件路径
    pub fn sample_path(&self, index: usize) -> Option<&Path> {
        self.samples.get(index).map(|(path, _)| path.as_path())
    }

    /// 按类别索引排列的类别名
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn class_to_idx(&self) -> &BTreeMap<String, usize> {
        &self.class_to_idx
    }

    pub fn samples(&self) -> &[(PathBuf, usize)] {
        &self.samples
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn transform(&self) -> &Compose {
        &self.transform
    }
}
