//! Human-readable byte sizes.

use thiserror::Error;

/// Unit labels, each 1024 times the previous one.
pub const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

const STEP: f64 = 1024.0;

/// Errors from [`format_bytes`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ByteFormatError {
    /// The value needs a unit larger than YB.
    #[error("{0} bytes is out of range (largest unit is YB)")]
    OutOfRange(f64),

    /// Negative, NaN or infinite input.
    #[error("{0} is not a valid byte count")]
    Invalid(f64),
}

/// Format a byte count as e.g. `"1.5 KB"`.
///
/// The value is rounded to two decimals with trailing zeros dropped, so
/// `1024` is `"1 KB"` and `1536` is `"1.5 KB"`. Zero is `"0 Bytes"`.
pub fn format_bytes(bytes: f64) -> Result<String, ByteFormatError> {
    if !bytes.is_finite() || bytes < 0.0 {
        return Err(ByteFormatError::Invalid(bytes));
    }
    if bytes == 0.0 {
        return Ok("0 Bytes".to_string());
    }

    let mut unit = 0;
    let mut value = bytes;
    while value >= STEP {
        value /= STEP;
        unit += 1;
    }

    let Some(label) = UNITS.get(unit) else {
        return Err(ByteFormatError::OutOfRange(bytes));
    };

    let rounded = (value * 100.0).round() / 100.0;
    Ok(format!("{} {}", rounded, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_bytes(0.0).unwrap(), "0 Bytes");
    }

    #[test]
    fn test_whole_units() {
        assert_eq!(format_bytes(1024.0).unwrap(), "1 KB");
        assert_eq!(format_bytes(1_048_576.0).unwrap(), "1 MB");
        assert_eq!(format_bytes(1024f64.powi(3)).unwrap(), "1 GB");
        assert_eq!(format_bytes(1024f64.powi(8)).unwrap(), "1 YB");
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(format_bytes(1536.0).unwrap(), "1.5 KB");
        assert_eq!(format_bytes(512.0).unwrap(), "512 Bytes");
        assert_eq!(format_bytes(1_500_000.0).unwrap(), "1.43 MB");
        assert_eq!(format_bytes(0.5).unwrap(), "0.5 Bytes");
    }

    #[test]
    fn test_disk_sized_value() {
        // 100 GiB + 256 MiB
        let bytes = 100.0 * 1024f64.powi(3) + 256.0 * 1024f64.powi(2);
        assert_eq!(format_bytes(bytes).unwrap(), "100.25 GB");
    }

    #[test]
    fn test_out_of_range() {
        let too_big = 1024f64.powi(9);
        assert_eq!(
            format_bytes(too_big),
            Err(ByteFormatError::OutOfRange(too_big))
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(format_bytes(-1.0), Err(ByteFormatError::Invalid(_))));
        assert!(matches!(format_bytes(f64::NAN), Err(ByteFormatError::Invalid(_))));
        assert!(matches!(format_bytes(f64::INFINITY), Err(ByteFormatError::Invalid(_))));
    }
}
