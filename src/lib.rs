//! # lsb_vault 库
//!
//! 本库包含加密 LSB 隐写工具的核心逻辑：
//! 载荷成帧 ([`payload`])、像素嵌入 ([`steganography`])、加密适配 ([`cipher`])
//! 以及把三者串联起来的隐藏 / 恢复流程 ([`codec`])。

// 声明库包含的所有模块。

pub mod cipher;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod payload;
pub mod steganography;
