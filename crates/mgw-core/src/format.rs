const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human readable size with 1024-based units and at most two decimals,
/// trailing zeros dropped (`1536 -> "1.5 KB"`). Zero is `"0 Bytes"`.
pub fn format_bytes(bytes: i64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    if bytes < 0 {
        return format!("{bytes} Bytes");
    }

    let mut exp = 0;
    let mut whole = bytes;
    while whole >= 1024 && exp < BYTE_UNITS.len() - 1 {
        whole /= 1024;
        exp += 1;
    }
    let scaled = bytes as f64 / 1024_f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{rounded} {}", BYTE_UNITS[exp])
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.2}°C")
}
