//! Main disassembler logic

use crate::decoder::decode;
use crate::error::Result;
use crate::formatter::format;

/// Disassemble a memory image into assembly text.
///
/// Walks from offset 0 and stops after the first `ret` or at the end of the
/// image. Decode errors abort the listing.
pub fn disassemble(bytes: &[u8]) -> Result<String> {
    let mut output = String::new();

    output.push_str("; TinyVM Disassembly\n");
    output.push_str(&format!("; Image size: {} bytes\n", bytes.len()));
    output.push('\n');

    let mut offset = 0;
    let mut count = 0;

    while offset < bytes.len() {
        let (inst, len) = decode(bytes, offset)?;

        // Address label
        output.push_str(&format!("{:04}:  ", offset));

        // Hex encoding, padded to the longest instruction
        let hex: Vec<String> = bytes[offset..offset + len]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect();
        output.push_str(&format!("{:<13}", hex.join(" ")));

        output.push_str(&format(&inst));
        output.push('\n');

        offset += len;
        count += 1;

        if inst.is_ret() {
            break;
        }
    }

    output.push_str(&format!("\n; {} instructions, {} bytes\n", count, offset));
    Ok(output)
}
