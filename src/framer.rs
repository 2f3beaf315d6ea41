//! # 位流封装
//!
//! 位流 = 32 位大端长度头部 + 载荷的各个位，每个字节从最高位开始。
//! 头部的值是载荷的 **位数**。位以取值为 0 或 1 的 `u8` 表示。

use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::{Result, StegoError};

/// 把字节序列展开为位序列，每个字节 MSB 在前。
pub fn bytes_to_bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
}

/// 把位序列按 MSB 在前的顺序每 8 位组合成一个字节。
/// 末尾不足 8 位的部分被忽略。
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// 计算载荷对应的头部值 (载荷位数)。
///
/// # Errors
///
/// 位数超过 `u32::MAX` 时返回 [`StegoError::PayloadTooLarge`]。
pub fn header_for(payload_len: usize) -> Result<u32> {
    payload_len
        .checked_mul(BITS_PER_BYTE)
        .and_then(|bits| u32::try_from(bits).ok())
        .ok_or(StegoError::PayloadTooLarge {
            payload_bytes: payload_len,
        })
}

/// 生成完整的位流：头部 32 位 + 载荷位。
pub fn pack(payload: &[u8]) -> Result<Vec<u8>> {
    let header = header_for(payload.len())?;

    let mut bits = Vec::with_capacity(HEADER_BITS + payload.len() * BITS_PER_BYTE);
    bits.extend(bytes_to_bits(&header.to_be_bytes()));
    bits.extend(bytes_to_bits(payload));

    Ok(bits)
}

/// 从位序列的前 32 位解析大端头部。
///
/// # Errors
///
/// 少于 32 位时返回 [`StegoError::TruncatedHeader`]。
pub fn decode_header(bits: &[u8]) -> Result<u32> {
    let header_bits = bits.get(..HEADER_BITS).ok_or(StegoError::TruncatedHeader {
        available: bits.len(),
    })?;

    Ok(header_bits
        .iter()
        .fold(0u32, |acc, &bit| (acc << 1) | (bit & 1) as u32))
}

/// 校验头部声明的位数，返回需要继续读取的位数。
///
/// `available` 是头部之后实际可读的位数。
///
/// # Errors
///
/// 声明值不是 8 的倍数或超过 `available` 时返回 [`StegoError::InvalidPayloadLength`]。
pub fn validate_length(declared: u32, available: usize) -> Result<usize> {
    let len = declared as usize;
    if len % BITS_PER_BYTE != 0 || len > available {
        return Err(StegoError::InvalidPayloadLength {
            declared,
            available,
        });
    }
    Ok(len)
}

/// [`pack`] 的逆操作：返回原始载荷字节，文本解码由调用者负责。
pub fn unpack(bits: &[u8]) -> Result<Vec<u8>> {
    let declared = decode_header(bits)?;
    let body = &bits[HEADER_BITS..];
    let len = validate_length(declared, body.len())?;

    Ok(bits_to_bytes(&body[..len]))
}
