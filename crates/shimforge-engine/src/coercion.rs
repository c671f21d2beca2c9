//! Numeric coercions shared by the shim algorithms.
//!
//! `to_integer` and `to_length` reproduce the ES2015 abstract operations
//! `ToInteger` and `ToLength` exactly, including NaN, `-0` and the
//! infinities.

use crate::object_model::JsValue;

/// `Number.MAX_SAFE_INTEGER` (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// `Number.EPSILON` (2^-52).
pub const EPSILON: f64 = f64::EPSILON;

/// `ToNumber` for the primitive subset this host models. Symbols and objects
/// convert to NaN; there is no `ToPrimitive` hook.
pub fn to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined => f64::NAN,
        JsValue::Null => 0.0,
        JsValue::Bool(b) => f64::from(u8::from(*b)),
        JsValue::Number(n) => *n,
        JsValue::Str(s) => string_to_number(s),
        JsValue::Symbol(_) | JsValue::Object(_) => f64::NAN,
    }
}

fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// `StringToNumber` (ES2020 §7.1.4.1.1).
pub fn string_to_number(input: &str) -> f64 {
    let s = input.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut acc = 0.0_f64;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => acc = acc * f64::from(radix) + f64::from(d),
                None => return f64::NAN,
            }
        }
        return acc;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// `ToInteger`: NaN becomes `+0`; `±0` and `±Infinity` pass through;
/// everything else truncates toward zero.
pub fn to_integer(value: &JsValue) -> f64 {
    integer_from_number(to_number(value))
}

/// `ToInteger` on an already-converted number.
pub fn integer_from_number(number: f64) -> f64 {
    if number.is_nan() {
        0.0
    } else if number == 0.0 || number.is_infinite() {
        number
    } else {
        number.signum() * number.abs().floor()
    }
}

/// `ToLength`: `ToInteger` clamped into `[0, 2^53 - 1]`.
pub fn to_length(value: &JsValue) -> f64 {
    let len = to_integer(value);
    if len <= 0.0 {
        // Also folds -0 into +0.
        return 0.0;
    }
    len.min(MAX_SAFE_INTEGER)
}

/// `ToInteger` then clamp into `[0, len]`; the position rule of the string
/// affix tests.
pub fn clamp_position(value: &JsValue, len: usize) -> usize {
    let pos = to_integer(value);
    if pos <= 0.0 {
        0
    } else if pos >= len as f64 {
        len
    } else {
        pos as usize
    }
}

/// `Number::toString(10)` (ES2020 §6.1.6.1.20).
pub fn number_to_js_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n < 0.0 {
        return format!("-{}", number_to_js_string(-n));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.2345e3`.
    let sci = format!("{n:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exponent + 1;

    if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let sign = if point - 1 < 0 { '-' } else { '+' };
        let exp = (point - 1).abs();
        if k == 1 {
            format!("{digits}e{sign}{exp}")
        } else {
            let (head, tail) = digits.split_at(1);
            format!("{head}.{tail}e{sign}{exp}")
        }
    }
}
