//! # LSB 隐写核心
//!
//! 嵌入与提取共用同一个全局位索引：第 i 位存放在
//! [`PixelArray::channels`] 中第 i 个通道值的最低位。

use crate::capacity::estimate_capacity;
use crate::constants::{HEADER_BITS, NEAR_FULL_RATIO};
use crate::error::{Result, StegoError};
use crate::framer::{bits_to_bytes, decode_header, pack, validate_length};
use crate::pixels::PixelArray;
use log::{debug, warn};

/// 校验通道区间 `dix..dix + len` 落在 `available` 之内，返回区间终点。
fn region_end(dix: usize, len: usize, available: usize) -> Result<usize> {
    dix.checked_add(len)
        .filter(|&end| end <= available)
        .ok_or(StegoError::RegionOutOfBounds {
            offset: dix,
            len,
            available,
        })
}

/// 从偏移 `dix` 开始，把 `bits` 依次写入各通道值的最低位，其余 7 位保持不变。
pub fn modify(bits: &[u8], pix: &mut [u8], dix: usize) -> Result<()> {
    let end = region_end(dix, bits.len(), pix.len())?;

    for (byte, &bit) in pix[dix..end].iter_mut().zip(bits) {
        *byte = (*byte & 0xFE) | (bit & 1);
    }

    Ok(())
}

/// 从偏移 `dix` 开始读取 `size` 个通道值的最低位。
pub fn recover(pix: &[u8], dix: usize, size: usize) -> Result<Vec<u8>> {
    let end = region_end(dix, size, pix.len())?;

    Ok(pix[dix..end].iter().map(|&byte| byte & 1).collect())
}

/// 把 `text` 隐藏到 `cover` 中，返回新的隐写图像。
///
/// 操作是全有或全无的：失败时不会产生任何部分修改，`cover` 本身始终不被改动。
///
/// # Errors
///
/// * 载荷加头部超出容量时返回 [`StegoError::CapacityExceeded`]。
/// * 载荷位数无法用 32 位表示时返回 [`StegoError::PayloadTooLarge`]。
pub fn embed(cover: &PixelArray, text: &str) -> Result<PixelArray> {
    let payload = text.as_bytes();
    let report = estimate_capacity(cover.width(), cover.height(), payload)?;

    debug!(
        "embedding {} payload bits + {} header bits into {} available",
        report.payload_bits, report.header_bits, report.capacity_bits
    );

    if !report.fits {
        return Err(StegoError::CapacityExceeded {
            required: report.total_bits,
            available: report.capacity_bits,
        });
    }
    if report.total_bits as f64 > report.capacity_bits as f64 * NEAR_FULL_RATIO {
        warn!(
            "payload uses {:.1}% of the image capacity",
            report.total_bits as f64 * 100.0 / report.capacity_bits as f64
        );
    }

    let bits = pack(payload)?;
    let mut stego = cover.clone();
    modify(&bits, stego.channels_mut(), 0)?;

    Ok(stego)
}

/// 从隐写图像中恢复文本。
///
/// 只读取头部声明的位数；不会用替换字符掩盖非法 UTF-8。
///
/// # Errors
///
/// * 通道总数少于 32 时返回 [`StegoError::TruncatedHeader`]。
/// * 头部长度不是 8 的倍数或超出剩余容量时返回 [`StegoError::InvalidPayloadLength`]。
/// * 载荷不是合法 UTF-8 时返回 [`StegoError::InvalidEncoding`]。
pub fn extract(stego: &PixelArray) -> Result<String> {
    let pix = stego.channels();
    if pix.len() < HEADER_BITS {
        return Err(StegoError::TruncatedHeader {
            available: pix.len(),
        });
    }

    let header_bits = recover(pix, 0, HEADER_BITS)?;
    let declared = decode_header(&header_bits)?;
    let len = validate_length(declared, pix.len() - HEADER_BITS)?;

    debug!("header declares {} payload bits", len);

    let payload_bits = recover(pix, HEADER_BITS, len)?;
    Ok(String::from_utf8(bits_to_bytes(&payload_bits))?)
}
