//! # 载荷编解码模块
//!
//! 负责把密文 (以及可选的明文提示) 组装成带分隔标记的帧，
//! 并在字节与比特序列之间相互转换。
//!
//! 帧格式 (每个字节按高位在前展开为 8 bits)：
//!
//! ```text
//! [ "HINT:{" <hint> "}|SPLIT|" ]?  <ciphertext>  "|END|"
//! ```
//!
//! 文本一律按 UTF-8 字节处理。对纯 ASCII 文本而言，这与“每个字符 8 bits”的旧格式逐位一致。

use crate::constants::{BITS_PER_BYTE, END_MARKER, HINT_OPEN, HINT_SPLIT, SPLIT_TOKEN};
use crate::error::{Result, StegoError};

/// 有序比特序列，由 [`to_bits`] 生成并被像素嵌入模块按相同顺序消费。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// 丢弃末尾不足 8 bits 的残余部分。
    pub fn truncate_to_whole_bytes(&mut self) {
        let whole = self.bits.len() / BITS_PER_BYTE * BITS_PER_BYTE;
        self.bits.truncate(whole);
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// 从帧中解析出的两个段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unframed {
    pub hint: Option<String>,
    pub ciphertext: String,
}

/// 组装载荷帧。
///
/// 提示为空或只含空白字符时省略整个提示段。
///
/// # Errors
///
/// 提示或密文中出现 `|SPLIT|` 或 `|END|` 时返回 [`StegoError::DelimiterCollision`]，
/// 因为解帧只做朴素的子串查找，这类文本会破坏帧结构。
/// 段内容与其后的标记拼接后才形成的标记 (例如密文以 `|END` 结尾) 同样会被拒绝：
/// 组装后的帧中第一个 `|END|` 必须位于末尾，第一个 `}|SPLIT|` 必须紧跟在提示之后。
pub fn frame(ciphertext: &str, hint: Option<&str>) -> Result<String> {
    let hint = hint.filter(|h| !h.trim().is_empty());

    for text in hint.into_iter().chain([ciphertext]) {
        if let Some(token) = [SPLIT_TOKEN, END_MARKER]
            .into_iter()
            .find(|token| text.contains(token))
        {
            return Err(StegoError::DelimiterCollision { token });
        }
    }

    let framed = match hint {
        Some(hint) => format!("{HINT_OPEN}{hint}{HINT_SPLIT}{ciphertext}{END_MARKER}"),
        None => format!("{ciphertext}{END_MARKER}"),
    };

    if framed.find(END_MARKER) != Some(framed.len() - END_MARKER.len()) {
        return Err(StegoError::DelimiterCollision { token: END_MARKER });
    }
    if let Some(hint) = hint {
        if framed.find(HINT_SPLIT) != Some(HINT_OPEN.len() + hint.len()) {
            return Err(StegoError::DelimiterCollision { token: SPLIT_TOKEN });
        }
    }

    Ok(framed)
}

/// 把字节展开为比特序列，每个字节 8 bits，高位在前。
pub fn to_bits(bytes: &[u8]) -> BitSequence {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// [`to_bits`] 的逆运算。
///
/// # Errors
///
/// 比特数不是 8 的倍数时返回 [`StegoError::TruncatedBits`]，而不是悄悄截断最后一个字节。
/// 调用方应先用 [`BitSequence::truncate_to_whole_bytes`] 对齐。
pub fn from_bits(bits: &BitSequence) -> Result<Vec<u8>> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(StegoError::TruncatedBits { len: bits.len() });
    }

    Ok(bits
        .bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect())
}

/// 解析原始字节流中的载荷帧。
///
/// 先定位第一个 `|END|`，其后的内容全部丢弃；再在它之前查找 `}|SPLIT|`，
/// 找到则其前面 (去掉 `HINT:{` 标记) 为提示，后面为密文。
/// 找不到结束标记时返回 `None`，表示图像中没有数据或数据已损坏。
pub fn unframe(raw: &[u8]) -> Option<Unframed> {
    let end = find_subslice(raw, END_MARKER.as_bytes())?;
    let body = &raw[..end];

    let (hint, ciphertext) = match find_subslice(body, HINT_SPLIT.as_bytes()) {
        Some(split) => {
            let prefix = &body[..split];
            let hint = match find_subslice(prefix, HINT_OPEN.as_bytes()) {
                Some(open) => &prefix[open + HINT_OPEN.len()..],
                None => prefix,
            };
            (Some(hint), &body[split + HINT_SPLIT.len()..])
        }
        None => (None, body),
    };

    Some(Unframed {
        hint: hint
            .filter(|h| !h.is_empty())
            .map(|h| String::from_utf8_lossy(h).into_owned()),
        ciphertext: String::from_utf8_lossy(ciphertext).into_owned(),
    })
}

/// 在 (可能不完整的) 前缀字节中查找提示段，不要求存在结束标记。
///
/// 载荷总是从第一个像素开始写入，所以提示段必须以 `HINT:{` 开头。
pub fn find_hint(raw: &[u8]) -> Option<String> {
    let rest = raw.strip_prefix(HINT_OPEN.as_bytes())?;
    let split = find_subslice(rest, HINT_SPLIT.as_bytes())?;
    let hint = &rest[..split];

    (!hint.is_empty()).then(|| String::from_utf8_lossy(hint).into_owned())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
