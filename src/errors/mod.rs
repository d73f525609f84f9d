use thiserror::Error;

/// 张量构造、堆叠等操作的错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },

    #[error("张量列表为空")]
    EmptyList,

    #[error("张量形状不一致：期望{expected:?}，实际{got:?}")]
    InconsistentShape { expected: Vec<usize>, got: Vec<usize> },

    #[error("张量形状不兼容")]
    IncompatibleShape,

    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
