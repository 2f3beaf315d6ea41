use image::{ImageBuffer, Rgba};
use lsb_stego::{
    PixelArray, StegoError,
    cli::{CapacityArgs, HideArgs, MetricsArgs, RecoverArgs, SecretArgs},
    compute_quality, embed, extract,
    handler::{handle_capacity, handle_hide, handle_metrics, handle_recover},
};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素 (含 Alpha 通道) 的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn random_pixels(width: u32, height: u32) -> PixelArray {
    let mut raw = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw);
    PixelArray::new(width, height, raw).unwrap()
}

fn from_file(path: &Path) -> SecretArgs {
    SecretArgs {
        text: Some(path.to_path_buf()),
        message: None,
    }
}

fn inline(message: &str) -> SecretArgs {
    SecretArgs {
        text: None,
        message: Some(message.to_string()),
    }
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        secret: from_file(&source_text_path),
        dest: Some(hidden_image_path.clone()),
        force: false,
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_recover
    let recover_args = RecoverArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        force: false,
        print: false,
    };
    handle_recover(recover_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";

    // 不提供 dest 路径，文本直接由命令行给出
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        secret: inline(original_text),
        dest: None,
        force: false,
    };
    handle_hide(hide_args)?;

    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 不提供 text 输出路径
    let recover_args = RecoverArgs {
        image: expected_hidden_path,
        text: None,
        force: false,
        print: true,
    };
    handle_recover(recover_args)?;

    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);

    // 场景一：目标文件已存在，不使用 --force
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        secret: inline("some text"),
        dest: Some(dest_path.clone()),
        force: false,
    });
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 场景二：使用 --force 强制覆盖
    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        secret: inline("some text"),
        dest: Some(dest_path.clone()),
        force: true,
    });
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    // 恢复时同样受到保护
    let text_path = dir.path().join("out.txt");
    fs::write(&text_path, "keep me")?;
    let result = handle_recover(RecoverArgs {
        image: dest_path,
        text: Some(text_path.clone()),
        force: false,
        print: false,
    });
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&text_path)?, "keep me");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会写出任何文件
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(5000))?;

    let result = handle_hide(HideArgs {
        image: image_path,
        secret: from_file(&text_path),
        dest: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证容量估计命令在边界条件上的结果
#[test]
fn test_handle_capacity_boundary() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.png");
    create_test_image(&image_path, 4, 4);

    let report = handle_capacity(CapacityArgs {
        image: image_path.clone(),
        secret: inline("Hi"),
    })?;
    assert_eq!(report.capacity_bits, 48);
    assert_eq!(report.total_bits, 48);
    assert!(report.fits);
    assert_eq!(report.bpp, 3.0);

    let report = handle_capacity(CapacityArgs {
        image: image_path,
        secret: inline("Hi!"),
    })?;
    assert!(!report.fits);

    Ok(())
}

/// 验证质量度量命令可以比较载体与隐写图像，并拒绝尺寸不同的图像
#[test]
fn test_handle_metrics() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.png");
    let stego_path = dir.path().join("stego.bmp");
    let other_path = dir.path().join("other.png");

    create_test_image(&cover_path, 64, 48);
    create_test_image(&other_path, 48, 64);

    handle_hide(HideArgs {
        image: cover_path.clone(),
        secret: inline("metrics"),
        dest: Some(stego_path.clone()),
        force: false,
    })?;

    handle_metrics(MetricsArgs {
        reference: cover_path.clone(),
        stego: stego_path,
    })?;

    let result = handle_metrics(MetricsArgs {
        reference: cover_path,
        stego: other_path,
    });
    assert!(result.is_err());

    Ok(())
}

/// 对随机图像和多种文本验证核心 API 的往返正确性与最小扰动
#[test]
fn test_core_round_trip_on_random_images() {
    let long = "long payload ".repeat(100);
    let texts: [&str; 5] = ["", "a", "Hi", "多字节字符 🦀 mixed with ASCII", &long];

    for text in texts {
        let cover = random_pixels(80, 60);
        let stego = embed(&cover, text).unwrap();

        assert_eq!(extract(&stego).unwrap(), text);
        assert!(
            cover
                .channels()
                .iter()
                .zip(stego.channels())
                .all(|(c, s)| c.abs_diff(*s) <= 1)
        );

        let quality = compute_quality(&cover, &stego).unwrap();
        assert!(quality.ssim > 0.99);
        assert!(quality.psnr > 50.0);
    }
}

/// 翻转头部中的位使声明长度超出剩余容量时，必须报告错误而不是截断
#[test]
fn test_corrupted_header_is_rejected() {
    let cover = random_pixels(12, 12);
    let mut raw = embed(&cover, "corrupt me").unwrap().into_raw();
    for byte in &mut raw[..8] {
        *byte |= 1;
    }
    let stego = PixelArray::new(12, 12, raw).unwrap();

    assert!(matches!(
        extract(&stego),
        Err(StegoError::InvalidPayloadLength { .. })
    ));
}

/// 未隐藏任何信息的图像通常无法通过头部校验
#[test]
fn test_recover_from_clean_image_fails_cleanly() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("clean.png");
    let text_path: PathBuf = dir.path().join("clean.txt");

    // 全白图像：所有 LSB 为 1，头部声明 u32::MAX 位
    ImageBuffer::from_pixel(20, 20, Rgba([255u8, 255, 255, 255])).save(&image_path)?;

    let result = handle_recover(RecoverArgs {
        image: image_path,
        text: Some(text_path.clone()),
        force: false,
        print: false,
    });
    assert!(result.is_err());
    assert!(!text_path.exists());

    Ok(())
}

/// 验证隐藏命令在 4x4 图像上的容量边界：恰好放下 "Hi"，多一个字节即被拒绝
#[test]
fn test_handle_hide_capacity_boundary() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.png");
    let fits_path = dir.path().join("fits.png");
    let over_path = dir.path().join("over.png");
    create_test_image(&image_path, 4, 4);

    handle_hide(HideArgs {
        image: image_path.clone(),
        secret: inline("Hi"),
        dest: Some(fits_path.clone()),
        force: false,
    })?;
    assert!(fits_path.exists());

    let result = handle_hide(HideArgs {
        image: image_path,
        secret: inline("Hi!"),
        dest: Some(over_path.clone()),
        force: false,
    });
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Not enough space"));
    assert!(message.contains("56"));
    assert!(message.contains("48"));
    assert!(!over_path.exists());

    Ok(())
}
