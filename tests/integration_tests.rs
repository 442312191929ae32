use anyhow::Ok;
use image::{ImageBuffer, Rgba};
use lsb_vault::{
    cli::{CapacityArgs, HideArgs, HintArgs, RecoverArgs},
    codec::peek_hint,
    handler::{handle_capacity, handle_hide, handle_hint, handle_recover},
};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const PASSPHRASE: &str = "correct horse battery staple";

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
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

fn hide_args(image: &Path, text: &Path, dest: Option<PathBuf>) -> HideArgs {
    HideArgs {
        image: image.to_path_buf(),
        text: Some(text.to_path_buf()),
        message: None,
        hint: None,
        dest,
        force: false,
        passphrase: PASSPHRASE.to_string(),
    }
}

fn recover_args(image: &Path, text: Option<PathBuf>, passphrase: &str) -> RecoverArgs {
    RecoverArgs {
        image: image.to_path_buf(),
        text,
        force: false,
        passphrase: passphrase.to_string(),
    }
}

/// 验证从隐藏到恢复的完整流程，包括明文提示
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
    let mut args = hide_args(
        &original_image_path,
        &source_text_path,
        Some(hidden_image_path.clone()),
    );
    args.hint = Some("我们第一次见面的地方".to_string());
    handle_hide(args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 不需要口令即可读取提示
    handle_hint(HintArgs {
        image: hidden_image_path.clone(),
        scan_bytes: None,
    })?;
    let hidden = image::open(&hidden_image_path)?.to_rgba8();
    assert_eq!(
        peek_hint(&hidden, None)?.as_deref(),
        Some("我们第一次见面的地方")
    );

    // 4. 测试 handle_recover
    handle_recover(recover_args(
        &hidden_image_path,
        Some(recovered_text_path.clone()),
        PASSPHRASE,
    ))?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 5. 验证结果
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
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide，不提供 dest 路径
    handle_hide(hide_args(&original_image_path, &source_text_path, None))?;

    // 验证默认的隐藏图像文件是否已创建
    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 3. 测试 handle_recover，不提供 text 输出路径
    handle_recover(recover_args(&expected_hidden_path, None, PASSPHRASE))?;

    // 验证默认的恢复文本文件是否已创建
    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证直接通过 `--message` 给出文本，并且非 PNG 的无损输入也会输出为 PNG
#[test]
fn test_hide_inline_message_from_bmp() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("carrier.bmp");
    let dest_path = dir.path().join("carrier_out.png");
    let recovered_path = dir.path().join("out.txt");

    create_test_image(&image_path, 60, 40);

    handle_hide(HideArgs {
        image: image_path,
        text: None,
        message: Some("inline secret".to_string()),
        hint: Some("   ".to_string()),
        dest: Some(dest_path.clone()),
        force: false,
        passphrase: PASSPHRASE.to_string(),
    })?;

    let hidden = image::open(&dest_path)?.to_rgba8();
    assert_eq!(peek_hint(&hidden, None)?, None, "Blank hint must be omitted.");

    handle_recover(recover_args(&dest_path, Some(recovered_path.clone()), PASSPHRASE))?;
    assert_eq!(fs::read_to_string(&recovered_path)?, "inline secret");

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 执行并断言操作会失败
    let result = handle_hide(hide_args(&image_path, &text_path, Some(dest_path.clone())));
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let mut args = hide_args(&image_path, &text_path, Some(dest_path.clone()));
    args.force = true;

    // 执行并断言操作会成功
    let result = handle_hide(args);
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会生成输出文件
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    // 创建一个非常小的图片
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文本
    let large_text = "a".repeat(5000);
    fs::write(&text_path, large_text)?;

    // 2. 执行并断言错误
    let result = handle_hide(hide_args(&image_path, &text_path, Some(dest_path.clone())));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists());

    handle_capacity(CapacityArgs {
        image: image_path,
        message: None,
        hint: None,
    })?;

    Ok(())
}

/// 验证 capacity 命令可以在隐写前预估文本所需的空间
#[test]
fn test_capacity_with_planned_message() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("carrier.png");
    create_test_image(&image_path, 20, 20);

    handle_capacity(CapacityArgs {
        image: image_path.clone(),
        message: Some("fits easily".to_string()),
        hint: Some("pet".to_string()),
    })?;

    // 放不下时只是提示，不视为错误
    handle_capacity(CapacityArgs {
        image: image_path.clone(),
        message: Some("a".repeat(5000)),
        hint: None,
    })?;

    let result = handle_capacity(CapacityArgs {
        image: image_path,
        message: Some("text".to_string()),
        hint: Some("bad|END|hint".to_string()),
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("reserved token"));
    }

    Ok(())
}

/// 验证口令错误时返回拒绝访问，而不是输出错误的明文
#[test]
fn test_recover_with_wrong_passphrase() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("hidden.png");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "top secret")?;
    handle_hide(hide_args(&image_path, &text_path, Some(dest_path.clone())))?;

    let result = handle_recover(recover_args(
        &dest_path,
        Some(recovered_path.clone()),
        "not the passphrase",
    ));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("ACCESS DENIED"));
    }
    assert!(!recovered_path.exists());

    Ok(())
}

/// 验证从未隐写过的图像中恢复时报告没有数据
#[test]
fn test_recover_from_untouched_image() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    let recovered_path = dir.path().join("recovered.txt");

    ImageBuffer::from_pixel(30, 30, Rgba([0u8, 0, 0, 255])).save(&image_path)?;

    let result = handle_recover(recover_args(
        &image_path,
        Some(recovered_path.clone()),
        PASSPHRASE,
    ));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("NO DATA DETECTED"));
    }
    assert!(!recovered_path.exists());

    Ok(())
}
