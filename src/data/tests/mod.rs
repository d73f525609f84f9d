//! data 模块单元测试
//!
//! 所有测试都在临时目录中现场生成图像文件，不依赖外部数据。

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

mod config;
mod stats;

/// 第`class_idx`个类别所用的纯色
pub(super) fn class_color(class_idx: usize) -> Rgb<u8> {
    Rgb([(class_idx * 60) as u8, 100, 200])
}

/// 在`dir`下写一张纯色 png
pub(super) fn write_image(dir: &Path, name: &str, width: u32, height: u32, color: Rgb<u8>) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, color).save(&path).unwrap();
    path
}

/// 生成`<root>/<split>/<类别名>/img_<i>.png`，`layout`为(类别名, 图像数)。
/// 类别在 layout 中的位置决定颜色，与字典序无关。
pub(super) fn make_split(root: &Path, split: &str, layout: &[(&str, usize)], size: (u32, u32)) {
    for (pos, (class, count)) in layout.iter().enumerate() {
        let dir = root.join(split).join(class);
        for i in 0..*count {
            write_image(&dir, &format!("img_{:03}.png", i), size.0, size.1, class_color(pos));
        }
    }
}

/// 标准的雪地数据集：train 有 7 张（snow 4 / no_snow 3），test 有 5 张
pub(super) fn make_snow_dataset(root: &Path) {
    make_split(root, "train", &[("snow", 4), ("no_snow", 3)], (128, 128));
    make_split(root, "test", &[("snow", 2), ("no_snow", 3)], (128, 128));
}
