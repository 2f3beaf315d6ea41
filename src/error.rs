//! # 错误类型
//!
//! 核心隐写与质量度量操作的所有失败情形都汇集在 [`StegoError`] 中。
//! 每个错误都是同步、局部的，直接返回给调用者，不会在内部重试。

use std::string::FromUtf8Error;
use thiserror::Error;

/// 核心操作的结果类型别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写、提取、容量估计以及质量度量可能产生的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 图像宽或高为零。
    #[error("invalid image dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    /// 原始像素缓冲区长度与 `width * height * 3` 不符。
    #[error("pixel buffer holds {actual} bytes but a {width}x{height} RGB image needs {expected}")]
    InvalidPixelBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// 载荷的位数无法用 32 位头部表示。
    #[error("payload of {payload_bytes} bytes is too large for a 32-bit length header")]
    PayloadTooLarge { payload_bytes: usize },

    /// 载荷加头部超出了图像可用的 LSB 槽位。
    #[error("capacity exceeded: need {required} bits but the image only has {available}")]
    CapacityExceeded { required: u64, available: u64 },

    /// 读写的通道区间超出了像素数据的边界。
    #[error("channel region {offset}..{offset}+{len} exceeds the {available} available channel values")]
    RegionOutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// 可用的位数不足以读取完整的 32 位头部。
    #[error("truncated header: only {available} bits available, 32 required")]
    TruncatedHeader { available: usize },

    /// 头部声明的长度不是 8 的倍数，或超出了剩余位数。
    #[error("invalid payload length {declared} bits ({available} bits available after the header)")]
    InvalidPayloadLength { declared: u32, available: usize },

    /// 提取出的字节不是合法的 UTF-8。
    #[error("extracted payload is not valid UTF-8")]
    InvalidEncoding(#[from] FromUtf8Error),

    /// 质量度量的两幅图像尺寸不同。
    #[error("image shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },

    /// 图像小于 SSIM 窗口。
    #[error("image {width}x{height} is smaller than the {window}x{window} SSIM window")]
    ImageTooSmall {
        width: u32,
        height: u32,
        window: usize,
    },
}
