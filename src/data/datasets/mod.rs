//! 数据集
//!
//! - ImageFolder：`<root>/<类别名>/<图像文件>`布局的分类数据集
//! - DatasetType：train/test 划分

mod image_folder;
mod split;

pub use image_folder::{IMAGE_EXTENSIONS, ImageFolderDataset, discover_labels, discover_samples};
pub use split::DatasetType;
