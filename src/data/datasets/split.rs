//! 数据集划分（train/test）

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::error::DataError;

/// 数据集的一个命名划分，对应数据根目录下的同名子目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Train,
    Test,
}

impl DatasetType {
    /// 子目录名
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Train => "train",
            DatasetType::Test => "test",
        }
    }

    /// 只有训练集在每个 epoch 打乱顺序
    pub fn shuffles(&self) -> bool {
        matches!(self, DatasetType::Train)
    }
}

impl Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(DatasetType::Train),
            "test" => Ok(DatasetType::Test),
            other => Err(DataError::InvalidDatasetType(other.to_string())),
        }
    }
}
