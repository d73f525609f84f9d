//! 加载器配置单元测试

use std::fs;
use std::str::FromStr;

use crate::assert_err;
use crate::data::config::{
    CustomDataLoaderConfig, DEFAULT_PREFETCH_BATCHES, LoaderConfig, default_num_workers,
};
use crate::data::datasets::DatasetType;
use crate::data::error::DataError;
use crate::data::transforms::Normalization;

#[test]
fn test_loader_config_default() {
    let config = LoaderConfig::default();
    assert_eq!(config.image_size, 128);
    assert_eq!(config.prefetch_batches, DEFAULT_PREFETCH_BATCHES);
    assert_eq!(config.num_workers, default_num_workers());
    assert!(config.num_workers >= 1);
    assert_eq!(config.pin_memory, None);
    assert_eq!(config.seed, None);
    assert!(!config.drop_last);
}

#[test]
fn test_loader_config_partial_json() {
    let config: LoaderConfig = serde_json::from_str(r#"{"num_workers": 0, "seed": 9}"#).unwrap();
    assert_eq!(config.num_workers, 0);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.image_size, 128);
    assert_eq!(config.prefetch_batches, DEFAULT_PREFETCH_BATCHES);
}

#[test]
fn test_custom_config_from_json_minimal() {
    let config = CustomDataLoaderConfig::from_json_str(
        r#"{"data_path": "data/snow", "batch_size": 16, "dataset_type": "test"}"#,
    )
    .unwrap();

    assert_eq!(config, CustomDataLoaderConfig::new("data/snow", 16, DatasetType::Test));
    assert_eq!(config.normalization().unwrap(), Normalization::None);
}

#[test]
fn test_custom_config_from_json_full() {
    let config = CustomDataLoaderConfig::from_json_str(
        r#"{
            "data_path": "/tmp/snow",
            "batch_size": 8,
            "dataset_type": "train",
            "mean": [0.5, 0.5, 0.5],
            "std": [0.25, 0.25, 0.25],
            "image_size": 64,
            "num_workers": 2,
            "pin_memory": false,
            "drop_last": true
        }"#,
    )
    .unwrap();

    assert_eq!(config.dataset_type, DatasetType::Train);
    assert_eq!(config.loader.image_size, 64);
    assert_eq!(config.loader.num_workers, 2);
    assert_eq!(config.loader.pin_memory, Some(false));
    assert!(config.loader.drop_last);
    assert_eq!(
        config.normalization().unwrap(),
        Normalization::Stats {
            mean: vec![0.5; 3],
            std: vec![0.25; 3]
        }
    );
}

#[test]
fn test_custom_config_partial_normalization() {
    let config = CustomDataLoaderConfig::from_json_str(
        r#"{"data_path": "d", "batch_size": 1, "dataset_type": "train", "mean": [0.5, 0.5, 0.5]}"#,
    )
    .unwrap();
    assert_err!(config.normalization(), DataError::PartialNormalization);
}

#[test]
fn test_custom_config_bad_json() {
    let result = CustomDataLoaderConfig::from_json_str(
        r#"{"data_path": "d", "batch_size": 1, "dataset_type": "validation"}"#,
    );
    assert_err!(result, DataError::ConfigError(_));

    let result = CustomDataLoaderConfig::from_json_str(r#"{"data_path": "d"}"#);
    assert_err!(result, DataError::ConfigError(_));
}

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loader.json");
    fs::write(
        &path,
        r#"{"data_path": "snow", "batch_size": 4, "dataset_type": "train", "seed": 3}"#,
    )
    .unwrap();

    let config = CustomDataLoaderConfig::from_json_file(&path).unwrap();
    assert_eq!(config.batch_size, 4);
    assert_eq!(config.loader.seed, Some(3));

    let loader = LoaderConfig::from_json_file(&path).unwrap();
    assert_eq!(loader.seed, Some(3));

    assert_err!(
        CustomDataLoaderConfig::from_json_file(dir.path().join("missing.json")),
        DataError::IoError(_)
    );
}

#[test]
fn test_dataset_type_parse() {
    assert_eq!(DatasetType::from_str("train").unwrap(), DatasetType::Train);
    assert_eq!("test".parse::<DatasetType>().unwrap(), DatasetType::Test);
    assert_err!(
        DatasetType::from_str("Train"),
        DataError::InvalidDatasetType(s) if s == "Train"
    );
    assert_eq!(DatasetType::Train.to_string(), "train");
    assert!(DatasetType::Train.shuffles());
    assert!(!DatasetType::Test.shuffles());
}
