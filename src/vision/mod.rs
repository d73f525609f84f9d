/*
 * @Description  : 本模块提供数据加载所需的计算机视觉功能：解码、缩放、图像与张量互转。
 *                 在本模块中，不严谨地说：
 *                 1. 所谓的image/图像是指解码后统一转换成的RGB格式图像；
 *                 2. 图像张量一律采用`[C, H, W]`（通道在前）排列。
 */

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageResult, Rgb, RgbImage};

use crate::tensor::Tensor;

#[cfg(test)]
mod tests;

/// 解码后的图像统一为RGB，故通道数恒为3
pub const RGB_CHANNELS: usize = 3;

pub struct Vision;

impl Vision {
    /// 从本地加载图像，无论原始格式（灰度、带透明通道、调色板……）都转换为RGB
    pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> ImageResult<RgbImage> {
        Ok(image::open(path)?.to_rgb8())
    }

    /// 将图像精确缩放到`width`x`height`，不保持长宽比；采用双线性（Triangle）插值
    pub fn resize_exact(image: &RgbImage, width: u32, height: u32) -> RgbImage {
        if image.width() == width && image.height() == height {
            return image.clone();
        }
        imageops::resize(image, width, height, FilterType::Triangle)
    }

    /// 将`[H, W, C]`排列、取值[0, 255]的图像转换为`[C, H, W]`排列、取值[0, 1]的张量
    pub fn image_to_tensor(image: &RgbImage) -> Tensor {
        let (width, height) = image.dimensions();
        let (w, h) = (width as usize, height as usize);
        let plane = w * h;
        let mut data = vec![0.; RGB_CHANNELS * plane];
        for (x, y, pixel) in image.enumerate_pixels() {
            let offset = y as usize * w + x as usize;
            for c in 0..RGB_CHANNELS {
                data[c * plane + offset] = f32::from(pixel[c]) / 255.;
            }
        }
        Tensor::new(&data, &[RGB_CHANNELS, h, w])
    }

    /// `image_to_tensor`的逆操作：`[3, H, W]`、取值[0, 1]的张量转换回RGB图像，超出范围的值会被截断。
    /// 张量不是3通道图像时返回None
    pub fn tensor_to_image(tensor: &Tensor) -> Option<RgbImage> {
        let &[c, h, w] = tensor.shape() else {
            return None;
        };
        if c != RGB_CHANNELS {
            return None;
        }
        let view = tensor.view();
        Some(RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            let to_u8 = |v: f32| (v.clamp(0., 1.) * 255.).round() as u8;
            Rgb([
                to_u8(view[[0, y, x]]),
                to_u8(view[[1, y, x]]),
                to_u8(view[[2, y, x]]),
            ])
        }))
    }
}
