//! # Snow Loader
//!
//! 雪地检测图像分类任务的数据加载库：
//! 按`<root>/<train|test>/<类别名>/<图像>`的目录布局加载图像，
//! 缩放到固定分辨率、转换为张量、可选地逐通道归一化，并以多线程预取的方式按批次迭代。
//!
//! 入口见[`data::CustomDataLoader`]。

pub mod data;
pub mod errors;
pub mod tensor;
pub mod utils;
pub mod vision;
