//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::PASSPHRASE_ENV;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，先用口令加密文本，再把密文隐藏到无损格式图像 (如 PNG, BMP) 中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，先用口令加密文本，再把密文隐藏到无损格式图像 (如 PNG, BMP) 中，并可附带一段明文提示。"
)]
pub struct Cli {
    /// 输出调试日志 (也可以通过 RUST_LOG 环境变量控制)。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 加密文本并隐藏到无损格式图像中。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复并解密隐藏的文本。
    Recover(RecoverArgs),

    /// 只读取图像中的明文提示，不需要口令。
    Hint(HintArgs),

    /// 显示图像可隐藏的容量。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "message"])))]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 以明文形式与密文一同隐藏的提示，恢复时无需口令即可读取。
    #[arg(long)]
    pub hint: Option<String>,

    /// 隐写完成后，保存结果图像 (PNG) 的输出路径。
    /// 默认为输入图像所在目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 加密口令。
    #[arg(short, long, env = PASSPHRASE_ENV, hide_env_values = true)]
    pub passphrase: String,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为图像所在目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 解密口令。
    #[arg(short, long, env = PASSPHRASE_ENV, hide_env_values = true)]
    pub passphrase: String,
}

/// 'hint' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HintArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 最多扫描的像素字节数，默认只扫描图像开头的一小部分。
    #[arg(short, long)]
    pub scan_bytes: Option<usize>,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 打算隐藏的文本，给出时同时显示它加密成帧后所需的比特数。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 打算一同隐藏的明文提示，需与 `--message` 一起使用。
    #[arg(long, requires = "message")]
    pub hint: Option<String>,
}
