use crate::format::{format_bytes, format_temperature};

#[test]
fn zero_bytes_keeps_plural_unit() {
    assert_eq!(format_bytes(0), "0 Bytes");
}

#[test]
fn bytes_scale_by_1024() {
    assert_eq!(format_bytes(1), "1 Bytes");
    assert_eq!(format_bytes(1023), "1023 Bytes");
    assert_eq!(format_bytes(1024), "1 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(1024 * 1024), "1 MB");
    assert_eq!(format_bytes(1024 * 1024 * 1024), "1 GB");
    assert_eq!(format_bytes(1024_i64.pow(4)), "1 TB");
}

#[test]
fn bytes_round_to_two_decimals() {
    // 1.2345 GB
    let bytes = (1.2345 * 1024.0 * 1024.0 * 1024.0) as i64;
    assert_eq!(format_bytes(bytes), "1.23 GB");
}

#[test]
fn sizes_past_terabytes_stay_in_tb() {
    assert_eq!(format_bytes(2048 * 1024_i64.pow(4)), "2048 TB");
}

#[test]
fn temperature_has_two_decimals_and_unit() {
    assert_eq!(format_temperature(47.25), "47.25°C");
    assert_eq!(format_temperature(80.0), "80.00°C");
}
