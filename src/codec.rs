//! # 隐写流程模块
//!
//! 把加密、载荷成帧和像素嵌入串联成完整的隐藏 / 恢复流程。
//! 所有函数都是对调用方缓冲区的同步纯变换，不做任何 I/O，也不记录日志。

use crate::cipher::Cipher;
use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};
use crate::payload::{find_hint, frame, from_bits, to_bits, unframe};
use crate::steganography::{read_bits, validate_layout, write_bits};

/// 一次恢复操作的结果。
///
/// 没有数据和口令错误都是正常的否定结果，而不是错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// 成功解密。
    Revealed {
        hint: Option<String>,
        message: String,
    },
    /// 找到了载荷，但无法用给定口令解密。
    AccessDenied { hint: Option<String> },
    /// 没有找到结束标记：图像中没有隐藏数据，或数据已损坏。
    NoData,
}

/// 给定密文和提示时，完整载荷帧所需的比特数。
pub fn required_bits(ciphertext: &str, hint: Option<&str>) -> Result<usize> {
    Ok(frame(ciphertext, hint)?.len() * BITS_PER_BYTE)
}

/// 预估把 `message` 加密成帧后需要的比特数，用于在隐写前检查载体容量。
///
/// 密文长度只取决于明文长度，与口令无关，因此这里使用空口令加密。
pub fn estimate_bits<C: Cipher + ?Sized>(
    message: &str,
    hint: Option<&str>,
    cipher: &C,
) -> Result<usize> {
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }
    required_bits(&cipher.encrypt(message, "")?, hint)
}

/// 加密 `message` 并把载荷帧隐藏到 RGBA 像素缓冲区中。
///
/// 返回写入的比特数。容量不足时缓冲区保持原样。
///
/// # Errors
///
/// * 缓冲区不是完整的 RGBA 像素 ([`StegoError::MalformedPixels`])。
/// * 消息为空 ([`StegoError::EmptyMessage`])。
/// * 提示中含有保留的分隔标记 ([`StegoError::DelimiterCollision`])。
/// * 图像容量不足 ([`StegoError::CapacityExceeded`])。
pub fn encode<C: Cipher + ?Sized>(
    pix: &mut [u8],
    message: &str,
    passphrase: &str,
    hint: Option<&str>,
    cipher: &C,
) -> Result<usize> {
    validate_layout(pix)?;
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }

    let ciphertext = cipher.encrypt(message, passphrase)?;
    let bits = to_bits(frame(&ciphertext, hint)?.as_bytes());
    write_bits(pix, &bits)?;

    Ok(bits.len())
}

/// 从像素缓冲区中恢复并解密隐藏的消息。
pub fn decode<C: Cipher + ?Sized>(
    pix: &[u8],
    passphrase: &str,
    cipher: &C,
) -> Result<DecodeOutcome> {
    let mut bits = read_bits(pix, None)?;
    bits.truncate_to_whole_bytes();
    let raw = from_bits(&bits)?;

    let Some(payload) = unframe(&raw) else {
        return Ok(DecodeOutcome::NoData);
    };

    Ok(match cipher.decrypt(&payload.ciphertext, passphrase) {
        Some(message) => DecodeOutcome::Revealed {
            hint: payload.hint,
            message,
        },
        None => DecodeOutcome::AccessDenied { hint: payload.hint },
    })
}

/// 只扫描缓冲区开头的 `scan_bytes` 个字节来查找明文提示，不需要口令。
pub fn peek_hint(pix: &[u8], scan_bytes: Option<usize>) -> Result<Option<String>> {
    let mut bits = read_bits(pix, scan_bytes)?;
    bits.truncate_to_whole_bytes();
    Ok(find_hint(&from_bits(&bits)?))
}
