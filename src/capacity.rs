//! # 容量模型
//!
//! 纯算术：每个像素的 R、G、B 通道各提供 1 个 LSB，
//! 因此一幅 `width x height` 的图像可容纳 `3 * width * height` 位。

use crate::constants::{BITS_PER_BYTE, CHANNELS, HEADER_BITS};
use crate::error::{Result, StegoError};

/// 一次容量估计的结果。构造后不再修改。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub pixels: u64,
    pub capacity_bits: u64,
    pub capacity_bytes: u64,
    pub header_bits: u64,
    pub payload_bits: u64,
    pub total_bits: u64,
    pub fits: bool,
    /// 每像素嵌入的位数 (三个通道合计)。
    pub bpp: f64,
}

impl CapacityReport {
    /// 嵌入后仍未使用的 LSB 槽位数。
    pub fn remaining_bits(&self) -> u64 {
        self.capacity_bits.saturating_sub(self.total_bits)
    }
}

/// 计算图像可容纳的总位数 (含头部)。
///
/// # Errors
///
/// 宽或高为零时返回 [`StegoError::InvalidDimensions`]。
pub fn capacity_bits(width: u32, height: u32) -> Result<u64> {
    if width == 0 || height == 0 {
        return Err(StegoError::InvalidDimensions { width, height });
    }
    Ok((width as u64 * height as u64).saturating_mul(CHANNELS as u64))
}

/// 估计 `payload` 是否能放入 `width x height` 的图像中。
///
/// `payload` 是秘密文本的 UTF-8 字节；文本的编码由调用者完成，
/// 参见 [`estimate_text`]。
pub fn estimate_capacity(width: u32, height: u32, payload: &[u8]) -> Result<CapacityReport> {
    let capacity_bits = capacity_bits(width, height)?;
    let pixels = width as u64 * height as u64;
    let header_bits = HEADER_BITS as u64;
    let payload_bits = payload.len() as u64 * BITS_PER_BYTE as u64;
    let total_bits = payload_bits + header_bits;

    Ok(CapacityReport {
        width,
        height,
        pixels,
        capacity_bits,
        capacity_bytes: capacity_bits / BITS_PER_BYTE as u64,
        header_bits,
        payload_bits,
        total_bits,
        fits: total_bits <= capacity_bits,
        bpp: total_bits as f64 / pixels as f64,
    })
}

/// [`estimate_capacity`] 的文本版本。
pub fn estimate_text(width: u32, height: u32, text: &str) -> Result<CapacityReport> {
    estimate_capacity(width, height, text.as_bytes())
}
