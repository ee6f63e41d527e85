//! Master volume wire encoding.
//!
//! Levels are shifted by 280 so that `[-80.5, +1.0]` dB lands in
//! `(199, 281]`. The wire code is the shifted value's digits after the
//! leading `2` (or `1`) with the decimal point dropped: whole levels give two
//! digits, half levels three. `-38.5` → `241.5` → `415`, `-80.0` → `200` →
//! `00`, `-80.5` → `199.5` → `995`.
//!
//! Decoding reverses this: two-digit codes are padded with a trailing zero,
//! and codes starting with `99` wrapped below `00`, so they lose another 100.

/// Lowest settable level in dB.
pub const MIN_LEVEL: f64 = -80.5;
/// Highest settable level in dB.
pub const MAX_LEVEL: f64 = 1.0;

const OFFSET: f64 = 280.0;
const WINDOW_LOW: f64 = 199.0;
const WINDOW_HIGH: f64 = 281.0;
const OVERFLOW_MARKER: &str = "99";

/// Encode a dB level, or `None` if it is outside the window or not a
/// half-decibel step.
pub(crate) fn encode_level(level: f64) -> Option<String> {
    let shifted = OFFSET + level;
    if !(shifted > WINDOW_LOW && shifted <= WINDOW_HIGH) {
        return None;
    }
    let halves = shifted * 2.0;
    if halves.fract() != 0.0 {
        return None;
    }

    let halves = halves as u32;
    let whole = halves / 2;
    let digits = if halves % 2 == 0 {
        whole.to_string()
    } else {
        format!("{whole}5")
    };
    Some(digits[1..].to_string())
}

/// Decode a volume body (`415`, `80`, `MAX 98`, `995`) into dB.
pub(crate) fn decode_level(body: &str) -> std::result::Result<f64, String> {
    let code = body
        .strip_prefix("MAX ")
        .or_else(|| body.strip_prefix("MIN "))
        .unwrap_or(body);
    let overflow = code.starts_with(OVERFLOW_MARKER);

    if code.is_empty() || !code.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(format!("expected a 2-3 digit number, got {code:?}"));
    }
    // Digits only, so this parse cannot fail and never overflows.
    let parsed = if code.len() == 2 {
        format!("{code}0").parse::<f64>()
    } else {
        code.parse::<f64>()
    };
    let value = parsed.map_err(|_| format!("expected a 2-3 digit number, got {code:?}"))?;

    let level = value / 10.0 - 80.0;
    Ok(if overflow { level - 100.0 } else { level })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn encode_known_codes() {
        assert_eq!(encode_level(-38.5).as_deref(), Some("415"));
        assert_eq!(encode_level(-80.0).as_deref(), Some("00"));
        assert_eq!(encode_level(-80.5).as_deref(), Some("995"));
        assert_eq!(encode_level(-30.0).as_deref(), Some("50"));
        assert_eq!(encode_level(0.0).as_deref(), Some("80"));
        assert_eq!(encode_level(1.0).as_deref(), Some("81"));
    }

    #[test]
    fn encode_rejects_outside_window() {
        assert_eq!(encode_level(-81.0), None);
        assert_eq!(encode_level(1.5), None);
        assert_eq!(encode_level(f64::NAN), None);
        assert_eq!(encode_level(f64::INFINITY), None);
    }

    #[test]
    fn encode_rejects_off_grid() {
        assert_eq!(encode_level(-38.25), None);
        assert_eq!(encode_level(-10.1), None);
    }

    #[test]
    fn decode_known_codes() {
        assert_close(decode_level("415").unwrap(), -38.5);
        assert_close(decode_level("00").unwrap(), -80.0);
        assert_close(decode_level("50").unwrap(), -30.0);
        assert_close(decode_level("81").unwrap(), 1.0);
    }

    #[test]
    fn decode_overflow_marker() {
        assert_close(decode_level("99").unwrap(), -81.0);
        assert_close(decode_level("995").unwrap(), -80.5);
    }

    #[test]
    fn decode_strips_max_and_min_prefixes() {
        assert_close(decode_level("MAX 995").unwrap(), -80.5);
        assert_close(decode_level("MAX 98").unwrap(), 18.0);
        assert_close(decode_level("MIN 00").unwrap(), -80.0);
    }

    #[test]
    fn decode_rejects_non_numeric() {
        assert!(decode_level("UP").is_err());
        assert!(decode_level("").is_err());
        assert!(decode_level("MAX").is_err());
        assert!(decode_level("+41").is_err());
        assert!(decode_level("4e1").is_err());
    }

    #[test]
    fn decode_tolerates_long_codes() {
        assert_close(decode_level("10000000000").unwrap(), 999_999_920.0);
        assert_close(decode_level("0415").unwrap(), -38.5);
    }

    #[test]
    fn roundtrip_every_half_step() {
        for step in -161..=2 {
            let level = f64::from(step) / 2.0;
            let code = encode_level(level).unwrap_or_else(|| panic!("{level} should encode"));
            assert_close(decode_level(&code).unwrap(), level);
        }
    }
}
