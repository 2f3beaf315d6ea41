//! # lsb_stego 库
//!
//! 本库包含 LSB 文本隐写工具的核心逻辑：容量模型、位流封装、
//! 嵌入与提取，以及 SSIM/PSNR 质量度量。
//!
//! 核心操作都是无状态、可重入的纯函数，只处理 [`pixels::PixelArray`]；
//! 文件读写与命令行交互位于 `cli` 与 `handler` 模块。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod framer;
pub mod handler;
pub mod pixels;
pub mod quality;
pub mod steganography;

pub use capacity::{CapacityReport, capacity_bits, estimate_capacity, estimate_text};
pub use error::{Result, StegoError};
pub use pixels::PixelArray;
pub use quality::{QualityReport, compute_quality, psnr, ssim};
pub use steganography::{embed, extract};
