use crate::constants::{BYTES_PER_PIXEL, USABLE_CHANNELS};
use crate::error::{Result, StegoError};
use crate::payload::BitSequence;

/// 检查缓冲区是否为完整的 RGBA 像素数据。
pub fn validate_layout(pix: &[u8]) -> Result<()> {
    if pix.len() % BYTES_PER_PIXEL != 0 {
        return Err(StegoError::MalformedPixels { len: pix.len() });
    }
    Ok(())
}

/// 可隐藏的比特数：每个像素的 R、G、B 各 1 bit。
pub fn capacity(pix: &[u8]) -> usize {
    pix.len() / BYTES_PER_PIXEL * USABLE_CHANNELS
}

/// 按像素顺序依次改写 R、G、B 通道的最低有效位 (跳过 Alpha)，比特用完即停止，其余字节保持不变。
pub fn write_bits(pix: &mut [u8], bits: &BitSequence) -> Result<()> {
    validate_layout(pix)?;

    let available = capacity(pix);
    if bits.len() > available {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available,
        });
    }

    let channels = pix
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .flat_map(|pixel| pixel.iter_mut().take(USABLE_CHANNELS));

    for (byte, bit) in channels.zip(bits.iter()) {
        *byte = (*byte & 0xFE) | bit as u8;
    }

    Ok(())
}

/// 按写入时的顺序读出 R、G、B 通道的最低有效位。
///
/// `limit_bytes` 限制最多查看多少个缓冲区字节 (按整像素向上取整)，
/// 用于只查找提示时的廉价前缀扫描；`None` 表示扫描整个缓冲区。
pub fn read_bits(pix: &[u8], limit_bytes: Option<usize>) -> Result<BitSequence> {
    validate_layout(pix)?;

    let pixels = limit_bytes.map_or(usize::MAX, |limit| limit.div_ceil(BYTES_PER_PIXEL));

    Ok(pix
        .chunks_exact(BYTES_PER_PIXEL)
        .take(pixels)
        .flat_map(|pixel| pixel[..USABLE_CHANNELS].iter().map(|byte| byte & 1 == 1))
        .collect())
}
