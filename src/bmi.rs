// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BMI input handling, formula and classification.
//!
//! Rounding follows JavaScript's `Number.prototype.toFixed`: the exact
//! decimal value of the double is rounded half away from zero. Rust's own
//! `{:.1}` formatting rounds exact ties to even, which differs for values
//! such as 22.25.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 100;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 220.0;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;

/// An f64 never has more than 1074 fractional decimal digits.
const MAX_FRACTION_DIGITS: usize = 1074;

/// Blocking validation failures; the calculation is aborted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BmiInputError {
    #[error("Please enter a valid weight between 20 and 200 kg.")]
    Weight,

    #[error("Please enter a valid age between 10 and 100.")]
    Age,
}

/// Keep digits and the first decimal point.
///
/// Any later `.` is dropped and the digits after it join the fraction, so
/// `"1.2.3"` becomes `"1.23"`.
pub fn sanitize_weight(text: &str) -> String {
    let mut seen_dot = false;
    text.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Keep digits only.
pub fn sanitize_age(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Clamp a height to the slider range.
pub fn clamp_height(height_cm: f64) -> f64 {
    if height_cm.is_nan() {
        return DEFAULT_HEIGHT_CM;
    }
    height_cm.clamp(MIN_HEIGHT_CM, MAX_HEIGHT_CM)
}

/// Check weight then age, returning the parsed values.
pub fn validate_inputs(weight: &str, age: &str) -> Result<(f64, u32), BmiInputError> {
    let weight = parse_float(weight)
        .filter(|w| (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(w))
        .ok_or(BmiInputError::Weight)?;
    let age = parse_int(age)
        .filter(|a| (MIN_AGE..=MAX_AGE).contains(a))
        .ok_or(BmiInputError::Age)?;
    Ok((weight, age))
}

/// Leading decimal number, like `parseFloat` on sanitized input.
fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .scan(false, |seen_dot, (i, c)| match c {
            '0'..='9' => Some(i + 1),
            '.' if !*seen_dot => {
                *seen_dot = true;
                Some(i + 1)
            }
            _ => None,
        })
        .last()?;
    let number = &text[..end];
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    // "12." and ".5" are valid prefixes in JavaScript
    let normalized = match (number.starts_with('.'), number.ends_with('.')) {
        (true, _) => format!("0{}", number),
        (false, true) => number.trim_end_matches('.').to_string(),
        (false, false) => number.to_string(),
    };
    normalized.parse().ok()
}

/// Leading integer, like `parseInt(text, 10)`.
fn parse_int(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Format with `digits` fractional digits, rounding the exact decimal value
/// half away from zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let negative = value < 0.0;
    let exact = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .map(|b| b - b'0')
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5');

    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if !carry {
                break;
            }
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
            }
        }
        if carry {
            kept.insert(0, 1);
        }
    }

    let split = kept.len() - digits;
    let to_str = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let mut out = String::new();
    if negative && kept.iter().any(|&d| d != 0) {
        out.push('-');
    }
    out.push_str(&to_str(&kept[..split]));
    if digits > 0 {
        out.push('.');
        out.push_str(&to_str(&kept[split..]));
    }
    out
}

/// `weight / (height/100)^2`, rounded to one decimal place.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    // to_fixed only emits digits and one '.', which always parses
    to_fixed(raw, 1).parse().unwrap_or(raw)
}

/// BMI tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "UNDERWEIGHT",
            BmiCategory::Normal => "NORMAL",
            BmiCategory::Overweight => "OVERWEIGHT",
            BmiCategory::Obese => "OBESE",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#3498DB",
            BmiCategory::Normal => "#2ECC71",
            BmiCategory::Overweight => "#F39C12",
            BmiCategory::Obese => "#E74C3C",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "You are below the healthy weight range. Consider a calorie-rich balanced diet and strength training."
            }
            BmiCategory::Normal => {
                "You have a healthy body weight. Keep up your balanced diet and regular exercise."
            }
            BmiCategory::Overweight => {
                "You are slightly above the healthy weight range. Regular cardio and portion control can help."
            }
            BmiCategory::Obese => {
                "Your weight may put your health at risk. Consider consulting a doctor for a personalised plan."
            }
        }
    }
}

/// Classify a (rounded) BMI value.
pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// A classified calculation, as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiResult {
    pub fn new(weight_kg: f64, height_cm: f64) -> Self {
        let bmi = compute_bmi(weight_kg, height_cm);
        Self {
            bmi,
            category: classify(bmi),
        }
    }
}
