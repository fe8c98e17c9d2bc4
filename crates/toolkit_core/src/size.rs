const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Human-readable size using 1024-based units and at most two decimals.
///
/// `2_500_000` renders as `2.38 MB`, `1536` as `1.5 KB`, `0` as `0 Bytes`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < UNITS.len() && bytes / scale >= STEP {
        scale *= STEP;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    format!("{} {}", trim_decimals(&format!("{value:.2}")), UNITS[unit])
}

fn trim_decimals(fixed: &str) -> &str {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.')
}
