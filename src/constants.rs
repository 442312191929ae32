/// 每个像素占用的字节数 (R, G, B, A)。
pub const BYTES_PER_PIXEL: usize = 4;

/// 每个像素中可用于隐写的通道数。
/// 只使用 R、G、B 三个通道的最低有效位，Alpha 通道始终保持不变。
pub const USABLE_CHANNELS: usize = 3;

/// 每个字节被展开成的比特数 (高位在前)。
pub const BITS_PER_BYTE: usize = 8;

/// 提示段的起始标记。
pub const HINT_OPEN: &str = "HINT:{";

/// 提示段与密文段之间的分隔标记。
pub const HINT_SPLIT: &str = "}|SPLIT|";

/// 分隔标记中不含右花括号的部分，出现在提示文本中同样会破坏帧结构。
pub const SPLIT_TOKEN: &str = "|SPLIT|";

/// 载荷结束标记。
pub const END_MARKER: &str = "|END|";

/// 只查找提示时默认扫描的像素缓冲区字节数。
/// 20000 字节 = 5000 个像素 = 15000 bits，约可容纳 1875 个字符的前缀。
pub const HINT_SCAN_BYTES: usize = 20_000;

/// 未指定口令时读取的环境变量名。
pub const PASSPHRASE_ENV: &str = "LSB_VAULT_PASSPHRASE";
