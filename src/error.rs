//! # 错误类型模块
//!
//! 隐写核心 (载荷编解码、像素嵌入、加密适配) 返回的所有错误。
//! “没有隐藏数据”与“口令错误”不属于错误，见 [`crate::codec::DecodeOutcome`]。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Not enough space in the image to hide the text. Required: {required} bits, Available: {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    #[error("Pixel buffer length {len} is not a multiple of 4 (expected RGBA data)")]
    MalformedPixels { len: usize },

    #[error("Bit sequence length {len} is not a multiple of 8")]
    TruncatedBits { len: usize },

    #[error("Payload segment must not contain the reserved token '{token}'")]
    DelimiterCollision { token: &'static str },

    #[error("The message to hide is empty")]
    EmptyMessage,

    #[error("Encryption failed: {0}")]
    Encryption(String),
}

pub type Result<T> = std::result::Result<T, StegoError>;
