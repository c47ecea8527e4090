// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded-precision float encoding
//!
//! Floats are rendered like printf `%.Ng`: `N` significant digits, fixed
//! notation for exponents in `[-4, N)`, scientific otherwise, trailing zeros
//! removed. Values closer to zero than the encoder's epsilon become `0`.

use cadscene_model::{CadError, Result};
use serde::{Deserialize, Serialize};

/// Smallest accepted number of significant digits
pub const MIN_DIGITS: usize = 1;

/// Largest accepted number of significant digits
pub const MAX_DIGITS: usize = 9;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format `value` with `digits` significant digits, `%g` style
///
/// `digits` below one is treated as one.
pub fn format_general(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        trim_fraction(&fixed).to_string()
    }
}

/// Encoder for one precision setting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericEncoder {
    digits: usize,
    epsilon: f64,
}

impl NumericEncoder {
    /// Create an encoder
    ///
    /// `digits` must lie in `1..=9`; `epsilon` must be finite and not
    /// negative.
    pub fn new(digits: usize, epsilon: f64) -> Result<Self> {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(CadError::invalid_input(format!(
                "significant digits must be in {}..={}, got {}",
                MIN_DIGITS, MAX_DIGITS, digits
            )));
        }
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(CadError::invalid_input(format!(
                "zero-snap epsilon must be finite and >= 0, got {}",
                epsilon
            )));
        }
        Ok(Self { digits, epsilon })
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Encode one value
    pub fn encode_value(&self, value: f64) -> String {
        if value.abs() < self.epsilon {
            "0".to_string()
        } else {
            format_general(value, self.digits)
        }
    }

    /// Encode a sequence, space separated, order preserved
    pub fn encode<T: Copy + Into<f64>>(&self, values: &[T]) -> String {
        let mut out = String::with_capacity(values.len() * (self.digits + 3));
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&self.encode_value((*value).into()));
        }
        out
    }
}

/// Join indices with single spaces, order preserved
pub fn encode_indices(indices: &[u32]) -> String {
    let mut out = String::with_capacity(indices.len() * 4);
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&index.to_string());
    }
    out
}

/// Concatenate index groups, each followed by the `-1` sentinel
pub fn encode_index_groups(groups: &[Vec<u32>]) -> String {
    groups
        .iter()
        .map(|group| {
            let mut tokens: Vec<String> = group.iter().map(|i| i.to_string()).collect();
            tokens.push("-1".to_string());
            tokens.join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Precision used for geometry buffers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericPrecision {
    /// Significant digits for vertex coordinates
    pub point_digits: usize,
    /// Significant digits for normals
    pub normal_digits: usize,
    /// Magnitudes below this are written as `0`
    pub epsilon: f64,
}

impl Default for NumericPrecision {
    fn default() -> Self {
        Self {
            point_digits: 4,
            normal_digits: 2,
            epsilon: 1e-3,
        }
    }
}

impl NumericPrecision {
    /// Encoder for vertex coordinates
    pub fn point_encoder(&self) -> Result<NumericEncoder> {
        NumericEncoder::new(self.point_digits, self.epsilon)
    }

    /// Encoder for normals
    pub fn normal_encoder(&self) -> Result<NumericEncoder> {
        NumericEncoder::new(self.normal_digits, self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_snap_is_sign_independent() {
        let encoder = NumericEncoder::new(4, 1e-3).unwrap();
        assert_eq!(encoder.encode(&[0.00001f64, 1.23456, -0.00002]), "0 1.235 0");
    }

    #[test]
    fn test_general_format_matches_printf() {
        assert_eq!(format_general(1.23456, 4), "1.235");
        assert_eq!(format_general(100.0, 4), "100");
        assert_eq!(format_general(0.5, 2), "0.5");
        assert_eq!(format_general(-0.70710678, 2), "-0.71");
        assert_eq!(format_general(123456.0, 4), "1.235e+05");
        assert_eq!(format_general(0.0001234, 4), "0.0001234");
        assert_eq!(format_general(0.00001234, 4), "1.234e-05");
        assert_eq!(format_general(9.9996, 4), "10");
        assert_eq!(format_general(1e100, 3), "1e+100");
        assert_eq!(format_general(0.65, 6), "0.65");
        assert_eq!(format_general(0.0, 6), "0");
    }

    #[test]
    fn test_encoded_points_stay_within_precision() {
        let encoder = NumericEncoder::new(4, 1e-3).unwrap();
        let values = [3.14159265f64, -271.828, 0.0123456, 98765.4];
        let decoded: Vec<f64> = encoder
            .encode(&values)
            .split(' ')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(decoded.len(), values.len());
        for (value, back) in values.iter().zip(&decoded) {
            assert_relative_eq!(*back, *value, max_relative = 5e-4);
        }
    }

    #[test]
    fn test_f32_input() {
        let encoder = NumericEncoder::new(4, 1e-3).unwrap();
        assert_eq!(encoder.encode(&[10.0f32, -2.5, 0.0]), "10 -2.5 0");
    }

    #[test]
    fn test_digits_are_validated() {
        assert!(NumericEncoder::new(0, 1e-3).is_err());
        assert!(NumericEncoder::new(10, 1e-3).is_err());
        assert!(NumericEncoder::new(9, 1e-3).is_ok());
        assert!(NumericEncoder::new(4, f64::NAN).is_err());
    }

    #[test]
    fn test_index_encoding() {
        assert_eq!(encode_indices(&[0, 1, 2, 2, 3, 0]), "0 1 2 2 3 0");
        assert_eq!(encode_indices(&[]), "");
        assert_eq!(
            encode_index_groups(&[vec![1, 2, 4], vec![5, 6, 7, 8]]),
            "1 2 4 -1 5 6 7 8 -1"
        );
    }

    #[test]
    fn test_default_precision() {
        let precision = NumericPrecision::default();
        assert_eq!(precision.point_encoder().unwrap().digits(), 4);
        assert_eq!(precision.normal_encoder().unwrap().digits(), 2);
        assert_eq!(precision.epsilon, 1e-3);
    }
}
