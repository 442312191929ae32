//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、图像解码与编码、调用核心隐写流程以及向用户报告结果。

use crate::cipher::AesGcmSivCipher;
use crate::cli::{CapacityArgs, HideArgs, HintArgs, RecoverArgs};
use crate::codec::{DecodeOutcome, decode, encode, estimate_bits, peek_hint};
use crate::constants::{BITS_PER_BYTE, HINT_SCAN_BYTES};
use crate::error::StegoError;
use crate::steganography::capacity;
use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、加密文本并隐藏到图像像素中，最后将结果以 PNG 格式写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、提示与口令的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 图像文件没有足够的空间来隐藏文本。
/// * 提示中含有保留的分隔标记。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, "doctored_", "png"));
    ensure_writable(&dest, args.force)?;

    let mut picture = load_rgba(&args.image)?;

    let message = match (&args.text, &args.message) {
        (Some(path), _) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message.clone(),
        (None, None) => anyhow::bail!("Either --text or --message must be given."),
    };

    log::debug!(
        "Hiding {} bytes of text (hint: {}) into a carrier with {} usable bits",
        message.len(),
        args.hint.is_some(),
        capacity(&picture)
    );

    let written = encode(
        &mut picture,
        &message,
        &args.passphrase,
        args.hint.as_deref(),
        &AesGcmSivCipher::default(),
    )
    .map_err(|e| match e {
        StegoError::CapacityExceeded {
            required,
            available,
        } => anyhow!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context(format!(
            "Failed to hide the text in: {}",
            args.image.to_string_lossy().red().bold()
        )),
    })?;

    log::info!("Embedded {written} bits");

    picture
        .save_with_format(&dest, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;

    println!(
        "The text has been successfully encrypted, hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、提取并解密隐藏的文本，
/// 最后将恢复的文本内容写入目标文本文件。若图像中带有提示，一并打印出来。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有隐藏数据 (`NO DATA DETECTED`)。
/// * 口令错误或数据损坏 (`ACCESS DENIED`)。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, "recovered_", "txt"));
    ensure_writable(&dest, args.force)?;

    let picture = load_rgba(&args.image)?;

    let outcome = decode(&picture, &args.passphrase, &AesGcmSivCipher::default())
        .with_context(|| {
            format!(
                "Failed to read hidden data from '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    match outcome {
        DecodeOutcome::Revealed { hint, message } => {
            print_hint(hint.as_deref());
            fs::write(&dest, message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    dest.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The text has been successfully recovered and saved: {}",
                dest.to_string_lossy().green().bold()
            );
            Ok(())
        }
        DecodeOutcome::AccessDenied { hint } => {
            print_hint(hint.as_deref());
            Err(anyhow!("{}", "ACCESS DENIED: Incorrect Key".red().bold()))
        }
        DecodeOutcome::NoData => Err(anyhow!(
            "NO DATA DETECTED / CORRUPTED: '{}' does not contain a hidden message.",
            args.image.to_string_lossy().red().bold()
        )),
    }
}

/// 处理 'Hint' 命令的执行逻辑：只扫描图像开头部分，打印明文提示。
pub fn handle_hint(args: HintArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;
    let scan_bytes = args.scan_bytes.unwrap_or(HINT_SCAN_BYTES);
    log::debug!("Scanning the first {scan_bytes} pixel bytes for a hint");

    match peek_hint(&picture, Some(scan_bytes))? {
        Some(hint) => print_hint(Some(&hint)),
        None => println!("{}", "No hint found.".yellow()),
    }
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：打印图像可隐藏的比特数和字节数。
///
/// 给出 `--message` 时，还会打印该文本 (及提示) 加密成帧后所需的比特数，以及能否放入该图像。
///
/// # Errors
///
/// * 无法读取输入的图像文件。
/// * 文本为空，或提示中含有保留的分隔标记。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;
    let bits = capacity(&picture);

    println!(
        "{} ({}x{}): {} bits / {} bytes of framed payload",
        args.image.to_string_lossy().bold(),
        picture.width(),
        picture.height(),
        bits.to_string().green().bold(),
        (bits / BITS_PER_BYTE).to_string().green().bold()
    );

    if let Some(message) = &args.message {
        let required = estimate_bits(message, args.hint.as_deref(), &AesGcmSivCipher::default())
            .context("Unable to estimate the size of the hidden payload.")?;
        log::debug!("Estimated {required} bits for {} bytes of text", message.len());

        if required <= bits {
            println!(
                "Required: {} bits. The text fits into this image.",
                required.to_string().green().bold()
            );
        } else {
            println!(
                "Required: {} bits. {}",
                required.to_string().red().bold(),
                "Not enough space in the image to hide the text.".red()
            );
        }
    }
    Ok(())
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgba8();
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        picture.width(),
        picture.height()
    );
    Ok(picture)
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在输入文件所在目录下生成 `<prefix><文件名>.<extension>` 形式的默认输出路径。
fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let path = input.with_file_name(format!("{prefix}{stem}.{extension}"));
    log::debug!("No output path given, using {}", path.display());
    path
}

fn print_hint(hint: Option<&str>) {
    if let Some(hint) = hint {
        println!("{} {}", "Hint:".cyan().bold(), hint);
    }
}
