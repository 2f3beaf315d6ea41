//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 基于 LSB (最低有效位) 的文本隐写工具，附带容量估计与 SSIM/PSNR 质量评估。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "基于 LSB (最低有效位) 的文本隐写工具：在无损格式图像 (PNG, BMP, TIFF, WebP, QOI) 的 RGB 通道中隐藏或恢复 UTF-8 文本，估计所需容量，并评估隐写前后的图像质量。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 估计文本所需的位数以及能否放入图像 (bpp)。
    Capacity(CapacityArgs),

    /// 计算载体图像与隐写图像之间的 SSIM 和 PSNR。
    Metrics(MetricsArgs),
}

/// 秘密文本的来源：文本文件或命令行字符串，二选一。
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SecretArgs {
    /// 要隐藏的文本内容的文件路径 (必须是 UTF-8)。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出的秘密文本。
    #[arg(short, long)]
    pub message: Option<String>,
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub secret: SecretArgs,

    /// 结果图像的输出路径。默认为输入图像旁的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的输出路径。默认为图像旁的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 同时把恢复的文本打印到标准输出。
    #[arg(short, long)]
    pub print: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 载体图像的文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub secret: SecretArgs,
}

/// 'metrics' 命令所需的参数。
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// 参考图像 (通常是载体图像)。
    #[arg(short, long)]
    pub reference: PathBuf,

    /// 待比较的隐写图像。
    #[arg(short, long)]
    pub stego: PathBuf,
}
