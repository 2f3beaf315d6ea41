//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O (通过 `image` 库解码与无损编码)、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{CapacityReport, estimate_text};
use crate::cli::{CapacityArgs, HideArgs, MetricsArgs, RecoverArgs, SecretArgs};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::error::StegoError;
use crate::pixels::PixelArray;
use crate::quality::compute_quality;
use crate::steganography::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 读取图像并转换为 RGB 像素数组，Alpha 通道被丢弃。
fn load_pixels(path: &Path) -> Result<PixelArray> {
    let img = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    PixelArray::try_from(img).with_context(|| {
        format!(
            "Image has no usable pixels: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 读取秘密文本：优先使用命令行给出的字符串，否则读取文本文件。
fn read_secret(secret: &SecretArgs) -> Result<String> {
    if let Some(message) = &secret.message {
        return Ok(message.clone());
    }

    let path = secret
        .text
        .as_ref()
        .context("Either --text or --message must be provided.")?;

    fs::read_to_string(path).with_context(|| {
        format!(
            "Unable to read text file (it must be valid UTF-8): {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 输出文件已存在且未指定 `--force` 时拒绝覆盖。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {} \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn sibling_path(image: &Path, file_name: String) -> PathBuf {
    image
        .parent()
        .map(|dir| dir.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// 隐写图像的默认输出路径：`<目录>/doctored_<文件名>`。
pub fn default_dest(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(image, format!("{DOCTORED_PREFIX}{name}"))
}

/// 恢复文本的默认输出路径：`<目录>/recovered_<文件名主干>.txt`。
pub fn default_text(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(image, format!("{RECOVERED_PREFIX}{stem}.txt"))
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和秘密文本、检查隐写空间是否足够、调用隐写核心函数嵌入文本，
/// 最后将结果以无损格式写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件 (例如扩展名对应的格式不受支持)。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));
    ensure_writable(&dest, args.force)?;

    let cover = load_pixels(&args.image)?;
    let text = read_secret(&args.secret)?;

    let stego = embed(&cover, &text).map_err(|err| match err {
        StegoError::CapacityExceeded {
            required,
            available,
        } => anyhow::anyhow!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context(format!(
            "Failed to hide the text in {}.",
            args.image.to_string_lossy().red().bold()
        )),
    })?;
    let report = estimate_text(cover.width(), cover.height(), &text)?;

    stego
        .into_rgb_image()
        .context("The stego pixel buffer does not match the image dimensions.")?
        .save(&dest)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {} \nUse a lossless format such as PNG or BMP.",
                dest.to_string_lossy().red().bold()
            )
        })?;

    info!(
        "embedded {} bits into {} ({:.4} bpp)",
        report.total_bits,
        dest.display(),
        report.bpp
    );
    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    println!(
        "Used {} of {} bits ({:.4} bpp).",
        report.total_bits.to_string().green(),
        report.capacity_bits.to_string().green(),
        report.bpp
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数提取文本，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有合法的隐藏信息 (头部损坏或文本不是 UTF-8)。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args.text.unwrap_or_else(|| default_text(&args.image));
    ensure_writable(&dest, args.force)?;

    let stego = load_pixels(&args.image)?;

    let text = extract(&stego).with_context(|| {
        format!(
            "Failed to recover the hidden text from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!("recovered {} bytes from {}", text.len(), args.image.display());
    if args.print {
        println!("{text}");
    }
    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令：只读取图像尺寸，估计文本所需的位数。
pub fn handle_capacity(args: CapacityArgs) -> Result<CapacityReport> {
    let (width, height) = image::image_dimensions(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let text = read_secret(&args.secret)?;
    let report = estimate_text(width, height, &text)?;

    println!(
        "Image: {} ({}x{}, pixels={})",
        args.image.to_string_lossy().bold(),
        report.width,
        report.height,
        report.pixels
    );
    println!(
        "Capacity: {} bits ({} bytes)",
        report.capacity_bits, report.capacity_bytes
    );
    println!(
        "Payload: {} bits + header {} bits",
        report.payload_bits, report.header_bits
    );
    println!(
        "Total used: {} bits ({:.4} bpp)",
        report.total_bits, report.bpp
    );
    println!(
        "Fits: {}",
        if report.fits {
            "yes".green().bold()
        } else {
            "no".red().bold()
        }
    );

    Ok(report)
}

/// 处理 'Metrics' 命令：比较参考图像与隐写图像。
pub fn handle_metrics(args: MetricsArgs) -> Result<()> {
    let reference = load_pixels(&args.reference)?;
    let stego = load_pixels(&args.stego)?;

    let report = compute_quality(&reference, &stego).with_context(|| {
        format!(
            "Unable to compare {} with {}.",
            args.reference.to_string_lossy().red().bold(),
            args.stego.to_string_lossy().red().bold()
        )
    })?;

    println!("SSIM: {:.6}", report.ssim);
    println!("PSNR: {:.2} dB", report.psnr);

    Ok(())
}
