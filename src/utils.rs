use crate::disk::types::Block;

/// Render a byte count in a human-friendly unit.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a block as a classic hex dump: offset column, 16 bytes per row,
/// printable ASCII on the right.
pub fn hex_dump(block: &Block) -> String {
    let mut out = String::new();
    for (row, chunk) in block.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();
        out.push_str(&format!("{:04x}  {}  |{}|\n", row * 16, hex.join(" "), ascii));
    }
    out
}
