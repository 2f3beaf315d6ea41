//! # 图像质量度量
//!
//! 计算载体图像与隐写图像之间的 PSNR 与 SSIM。
//!
//! SSIM 按 Wang 等人 (2004) 的标准形式：11x11、σ = 1.5 的高斯加权窗口，
//! 不做填充，只统计完全落在图像内部的窗口位置。每个通道单独计算后取平均。

use crate::constants::{CHANNELS, MAX_SAMPLE, SSIM_K1, SSIM_K2, SSIM_SIGMA, SSIM_WINDOW};
use crate::error::{Result, StegoError};
use crate::pixels::PixelArray;
use rayon::prelude::*;
use std::fmt;

/// 两幅图像的相似度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    pub ssim: f64,
    /// 分贝；两幅图像逐像素相同时为 `f64::INFINITY`。
    pub psnr: f64,
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSIM: {:.6}, PSNR: {:.2} dB", self.ssim, self.psnr)
    }
}

fn ensure_same_shape(reference: &PixelArray, other: &PixelArray) -> Result<()> {
    if reference.shape() != other.shape() {
        return Err(StegoError::ShapeMismatch {
            left: reference.shape(),
            right: other.shape(),
        });
    }
    Ok(())
}

/// 所有通道值上的均方误差。
pub fn mse(reference: &PixelArray, other: &PixelArray) -> Result<f64> {
    ensure_same_shape(reference, other)?;

    let squared: u64 = reference
        .channels()
        .par_iter()
        .zip(other.channels().par_iter())
        .map(|(&a, &b)| {
            let d = a.abs_diff(b) as u64;
            d * d
        })
        .sum();

    Ok(squared as f64 / reference.channels().len() as f64)
}

/// 峰值信噪比 `10·log10(255² / MSE)`。
///
/// # Errors
///
/// 形状不同时返回 [`StegoError::ShapeMismatch`]。
pub fn psnr(reference: &PixelArray, other: &PixelArray) -> Result<f64> {
    let mse = mse(reference, other)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (MAX_SAMPLE * MAX_SAMPLE / mse).log10())
}

/// 归一化的一维高斯核；二维窗口是它与自身的外积。
fn gaussian_kernel() -> [f64; SSIM_WINDOW] {
    let radius = (SSIM_WINDOW / 2) as f64;
    let mut kernel = [0.0; SSIM_WINDOW];
    for (i, k) in kernel.iter_mut().enumerate() {
        let d = i as f64 - radius;
        *k = (-(d * d) / (2.0 * SSIM_SIGMA * SSIM_SIGMA)).exp();
    }
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// 只保留完整窗口 ("valid") 的可分离高斯滤波。
/// 输出大小为 `(width - 10) x (height - 10)`。
fn filter_valid(plane: &[f64], width: usize, height: usize, kernel: &[f64]) -> Vec<f64> {
    let n = kernel.len();
    let out_w = width - n + 1;
    let out_h = height - n + 1;

    let mut horizontal = Vec::with_capacity(height * out_w);
    for row in plane.chunks_exact(width) {
        for x in 0..out_w {
            horizontal.push(kernel.iter().zip(&row[x..x + n]).map(|(k, v)| k * v).sum::<f64>());
        }
    }

    let mut out = Vec::with_capacity(out_h * out_w);
    for y in 0..out_h {
        for x in 0..out_w {
            out.push(
                kernel
                    .iter()
                    .enumerate()
                    .map(|(j, k)| k * horizontal[(y + j) * out_w + x])
                    .sum::<f64>(),
            );
        }
    }
    out
}

fn channel_plane(pixels: &PixelArray, channel: usize) -> Vec<f64> {
    pixels
        .channels()
        .iter()
        .skip(channel)
        .step_by(CHANNELS)
        .map(|&v| v as f64)
        .collect()
}

fn channel_ssim(x: &[f64], y: &[f64], width: usize, height: usize) -> f64 {
    let kernel = gaussian_kernel();
    let c1 = (SSIM_K1 * MAX_SAMPLE).powi(2);
    let c2 = (SSIM_K2 * MAX_SAMPLE).powi(2);

    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(y).map(|(a, b)| a * b).collect();

    let mu_x = filter_valid(x, width, height, &kernel);
    let mu_y = filter_valid(y, width, height, &kernel);
    let e_xx = filter_valid(&xx, width, height, &kernel);
    let e_yy = filter_valid(&yy, width, height, &kernel);
    let e_xy = filter_valid(&xy, width, height, &kernel);

    let total: f64 = (0..mu_x.len())
        .map(|i| {
            let (mx, my) = (mu_x[i], mu_y[i]);
            let var_x = e_xx[i] - mx * mx;
            let var_y = e_yy[i] - my * my;
            let cov = e_xy[i] - mx * my;

            ((2.0 * mx * my + c1) * (2.0 * cov + c2))
                / ((mx * mx + my * my + c1) * (var_x + var_y + c2))
        })
        .sum();

    total / mu_x.len() as f64
}

/// 结构相似性指数，三个通道的平均值。
///
/// # Errors
///
/// * 形状不同时返回 [`StegoError::ShapeMismatch`]。
/// * 宽或高小于 11 时返回 [`StegoError::ImageTooSmall`]。
pub fn ssim(reference: &PixelArray, other: &PixelArray) -> Result<f64> {
    ensure_same_shape(reference, other)?;

    let (height, width, _) = reference.shape();
    if width < SSIM_WINDOW || height < SSIM_WINDOW {
        return Err(StegoError::ImageTooSmall {
            width: reference.width(),
            height: reference.height(),
            window: SSIM_WINDOW,
        });
    }

    let per_channel: Vec<f64> = (0..CHANNELS)
        .into_par_iter()
        .map(|c| {
            let x = channel_plane(reference, c);
            let y = channel_plane(other, c);
            channel_ssim(&x, &y, width, height)
        })
        .collect();

    Ok(per_channel.iter().sum::<f64>() / CHANNELS as f64)
}

/// 同时计算 SSIM 与 PSNR。
pub fn compute_quality(reference: &PixelArray, stego: &PixelArray) -> Result<QualityReport> {
    Ok(QualityReport {
        ssim: ssim(reference, stego)?,
        psnr: psnr(reference, stego)?,
    })
}
