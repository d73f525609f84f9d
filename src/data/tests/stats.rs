//! 逐通道统计量单元测试

use approx::assert_abs_diff_eq;
use image::Rgb;

use super::{make_split, write_image};
use crate::assert_err;
use crate::data::datasets::ImageFolderDataset;
use crate::data::error::DataError;
use crate::data::stats::compute_channel_stats;
use crate::data::transforms::{Compose, Normalization};

fn dataset(root: &std::path::Path) -> ImageFolderDataset {
    ImageFolderDataset::new(root, Compose::standard(8, &Normalization::None).unwrap()).unwrap()
}

#[test]
fn test_channel_stats_solid_color() {
    let dir = tempfile::tempdir().unwrap();
    let class_dir = dir.path().join("snow");
    for i in 0..3 {
        write_image(&class_dir, &format!("{}.png", i), 8, 8, Rgb([255, 51, 0]));
    }

    let stats = compute_channel_stats(&dataset(dir.path())).unwrap();
    let expected_mean: [f32; 3] = [1.0, 0.2, 0.0];
    for c in 0..3 {
        assert_abs_diff_eq!(stats.mean[c], expected_mean[c], epsilon = 1e-5);
        assert_abs_diff_eq!(stats.std[c], 0.0, epsilon = 1e-5);
    }
    // 标准差为 0 的通道无法用于归一化
    assert_err!(stats.into_normalization(), DataError::InvalidStd { .. });
}

#[test]
fn test_channel_stats_two_colors() {
    let dir = tempfile::tempdir().unwrap();
    // 黑白各一张：每个通道取值一半为 0、一半为 1
    write_image(&dir.path().join("a"), "black.png", 8, 8, Rgb([0, 0, 0]));
    write_image(&dir.path().join("b"), "white.png", 8, 8, Rgb([255, 255, 255]));

    let stats = compute_channel_stats(&dataset(dir.path())).unwrap();
    for c in 0..3 {
        assert_abs_diff_eq!(stats.mean[c], 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(stats.std[c], 0.5, epsilon = 1e-5);
    }

    let norm = stats.into_normalization().unwrap();
    assert_eq!(norm.channels(), Some(3));
}

#[test]
fn test_channel_stats_propagates_errors() {
    let dir = tempfile::tempdir().unwrap();
    make_split(dir.path(), "train", &[("snow", 2)], (8, 8));
    std::fs::write(dir.path().join("train").join("snow").join("bad.png"), b"??").unwrap();

    let result = compute_channel_stats(&dataset(&dir.path().join("train")));
    assert_err!(result, DataError::ImageError { .. });
}
