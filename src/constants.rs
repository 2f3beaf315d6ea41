/// 长度头部所占的位数。
/// 头部是一个大端序的 `u32`，其值为载荷的位数 (而非字节数)。
pub const HEADER_BITS: usize = 32;

/// 每个像素参与隐写的颜色通道数 (R, G, B)。
/// Alpha 通道在进入核心之前已被剥离。
pub const CHANNELS: usize = 3;

/// 每个字节的位数。
pub const BITS_PER_BYTE: usize = 8;

/// 8 位采样的最大值，PSNR 与 SSIM 的动态范围。
pub const MAX_SAMPLE: f64 = 255.0;

/// SSIM 高斯窗口的边长 (像素)。
pub const SSIM_WINDOW: usize = 11;

/// SSIM 高斯窗口的标准差。
pub const SSIM_SIGMA: f64 = 1.5;

/// SSIM 稳定常数 C1 = (K1·L)² 中的 K1。
pub const SSIM_K1: f64 = 0.01;

/// SSIM 稳定常数 C2 = (K2·L)² 中的 K2。
pub const SSIM_K2: f64 = 0.03;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 剩余容量低于该比例时发出警告。
pub const NEAR_FULL_RATIO: f64 = 0.9;
