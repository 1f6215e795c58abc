// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color parsing for overlay tints.
//!
//! Accepts `#RRGGBB`, `#RGB`, and pre-formatted `rgba(...)` strings.
//! Anything else is an error rather than a silently malformed style.

use egui::Color32;
use thiserror::Error;

/// Color parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    /// Input matched none of the accepted formats
    #[error("unrecognized color format: {0:?}")]
    UnrecognizedFormat(String),

    /// An `rgba(...)` string had malformed components
    #[error("malformed rgba components: {0:?}")]
    MalformedRgba(String),
}

/// Format a color as an `rgba(r, g, b, a)` string.
///
/// Hex input is decoded and combined with `opacity`. Input that is
/// already an `rgba(...)` string is returned unchanged and `opacity` is
/// ignored; callers wanting a different alpha must pass hex.
pub fn to_rgba(color: &str, opacity: f32) -> Result<String, ColorParseError> {
    if color.starts_with("rgba(") {
        return Ok(color.to_string());
    }
    let [r, g, b] = parse_hex(color)
        .ok_or_else(|| ColorParseError::UnrecognizedFormat(color.to_string()))?;
    Ok(format!("rgba({r}, {g}, {b}, {opacity})"))
}

/// Parse a color into a paintable [`Color32`].
///
/// Same recognition rules as [`to_rgba`]; an `rgba(...)` input carries
/// its own alpha and `opacity` is ignored for it.
pub fn to_color32(color: &str, opacity: f32) -> Result<Color32, ColorParseError> {
    if color.starts_with("rgba(") {
        return parse_rgba_string(color);
    }
    let [r, g, b] = parse_hex(color)
        .ok_or_else(|| ColorParseError::UnrecognizedFormat(color.to_string()))?;
    Ok(Color32::from_rgba_unmultiplied(r, g, b, alpha_byte(opacity)))
}

fn alpha_byte(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let digits = color.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            // Each nibble expands by duplication: f -> ff.
            let mut channels = [0u8; 3];
            for (i, c) in digits.chars().enumerate() {
                let nibble = c.to_digit(16)? as u8;
                channels[i] = (nibble << 4) | nibble;
            }
            Some(channels)
        }
        _ => None,
    }
}

fn parse_rgba_string(color: &str) -> Result<Color32, ColorParseError> {
    let malformed = || ColorParseError::MalformedRgba(color.to_string());
    let inner = color
        .strip_prefix("rgba(")
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(malformed());
    }
    let r: u8 = parts[0].parse().map_err(|_| malformed())?;
    let g: u8 = parts[1].parse().map_err(|_| malformed())?;
    let b: u8 = parts[2].parse().map_err(|_| malformed())?;
    let a: f32 = parts[3].parse().map_err(|_| malformed())?;
    Ok(Color32::from_rgba_unmultiplied(r, g, b, alpha_byte(a)))
}
