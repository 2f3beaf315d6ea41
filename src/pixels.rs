//! # 像素数组
//!
//! [`PixelArray`] 是核心操作唯一接受的图像表示：形状为 (height, width, 3) 的
//! 8 位无符号 RGB 网格，按行优先、通道交错 (R,G,B,R,G,B,…) 的顺序存储。
//! 文件格式的解码与 Alpha 通道的剥离都在进入核心之前完成。

use crate::constants::CHANNELS;
use crate::error::{Result, StegoError};
use image::{DynamicImage, RgbImage};

/// 经过校验的 RGB 像素数组。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArray {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelArray {
    /// 由原始的通道交错缓冲区构造像素数组。
    ///
    /// # Errors
    ///
    /// * 宽或高为零时返回 [`StegoError::InvalidDimensions`]。
    /// * `data.len() != width * height * 3` 时返回 [`StegoError::InvalidPixelBuffer`]。
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(StegoError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(StegoError::InvalidPixelBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// 逐像素调用 `f(x, y)` 生成像素数组。
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 返回 (height, width, channels)。
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }

    /// 像素 (x, y) 的 R, G, B 值。坐标越界时返回 `None`。
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.data[offset..offset + CHANNELS];
        Some([p[0], p[1], p[2]])
    }

    /// 行优先、通道交错的线性通道序列。
    /// 第 i 个元素就是隐写位流中第 i 位所在的通道。
    pub fn channels(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// 转换为 `image` 库的 RGB 图像，以便无损编码写回文件。
    pub fn into_rgb_image(self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data)
    }
}

impl TryFrom<RgbImage> for PixelArray {
    type Error = StegoError;

    /// 直接接管图像的缓冲区，仍经过 [`PixelArray::new`] 的尺寸校验。
    fn try_from(img: RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }
}

impl TryFrom<DynamicImage> for PixelArray {
    type Error = StegoError;

    /// 任何颜色类型都先转换为 RGB8，Alpha 通道被丢弃。
    fn try_from(img: DynamicImage) -> Result<Self> {
        Self::try_from(img.into_rgb8())
    }
}
