//! CSS color parsing.
//!
//! Understands the color syntaxes a browser reports for computed styles
//! plus the short hex form: `#rrggbb`, `#rgb`, `rgba(r,g,b,a)` and
//! `rgb(r,g,b)`. Patterns are tried in that order and only need to match
//! a prefix of the (whitespace-stripped) input. Anything else yields
//! [`CssColor::FALLBACK`].
//!
//! Alpha is carried as an integer: `rgba(10,20,30,0.5)` has alpha `0`.
//! Interpolation ignores it entirely and always emits `rgb(...)`.

use std::fmt;

/// RGB channels with an optional integer alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CssColor {
    pub rgb: [i64; 3],
    pub alpha: Option<i64>,
}

impl CssColor {
    /// Returned when no pattern matches.
    pub const FALLBACK: Self = Self {
        rgb: [255, 255, 255],
        alpha: Some(0),
    };

    pub const fn rgb(r: i64, g: i64, b: i64) -> Self {
        Self {
            rgb: [r, g, b],
            alpha: None,
        }
    }

    pub const fn rgba(r: i64, g: i64, b: i64, a: i64) -> Self {
        Self {
            rgb: [r, g, b],
            alpha: Some(a),
        }
    }

    /// Channels as a flat tuple: three values, or four when alpha is present.
    pub fn channels(&self) -> Vec<i64> {
        let mut out = self.rgb.to_vec();
        out.extend(self.alpha);
        out
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        write!(f, "rgb({r},{g},{b})")
    }
}

/// Parse a CSS color string, falling back to [`CssColor::FALLBACK`].
pub fn parse_color(css: &str) -> CssColor {
    let color: String = css.chars().filter(|c| !c.is_whitespace()).collect();
    parse_hex6(&color)
        .or_else(|| parse_hex3(&color))
        .or_else(|| parse_rgba(&color))
        .or_else(|| parse_rgb(&color))
        .unwrap_or(CssColor::FALLBACK)
}

fn hex_digits(s: &str, count: usize) -> Option<Vec<i64>> {
    let digits = s.get(..count)?;
    digits
        .chars()
        .map(|c| c.to_digit(16).map(i64::from))
        .collect()
}

fn parse_hex6(s: &str) -> Option<CssColor> {
    let n = hex_digits(s.strip_prefix('#')?, 6)?;
    Some(CssColor::rgb(
        n[0] * 16 + n[1],
        n[2] * 16 + n[3],
        n[4] * 16 + n[5],
    ))
}

fn parse_hex3(s: &str) -> Option<CssColor> {
    let n = hex_digits(s.strip_prefix('#')?, 3)?;
    Some(CssColor::rgb(n[0] * 17, n[1] * 17, n[2] * 17))
}

fn parse_rgba(s: &str) -> Option<CssColor> {
    let rest = s.strip_prefix("rgba(")?;
    let (r, rest) = channel(rest, ',')?;
    let (g, rest) = channel(rest, ',')?;
    let (b, rest) = channel(rest, ',')?;
    let alpha = alpha_group(rest)?;
    Some(CssColor::rgba(r, g, b, leading_int(alpha).unwrap_or(0)))
}

fn parse_rgb(s: &str) -> Option<CssColor> {
    let rest = s.strip_prefix("rgb(")?;
    let (r, rest) = channel(rest, ',')?;
    let (g, rest) = channel(rest, ',')?;
    let (b, _) = channel(rest, ')')?;
    Some(CssColor::rgb(r, g, b))
}

fn digit_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// One or more digits followed by `sep`.
fn channel(s: &str, sep: char) -> Option<(i64, &str)> {
    let len = digit_len(s);
    if len == 0 {
        return None;
    }
    let rest = s[len..].strip_prefix(sep)?;
    Some((decimal(&s[..len]), rest))
}

/// Alpha component followed by `)`: either an integer, or digits, any single
/// character, then digits (`0.5`, `.25`).
fn alpha_group(s: &str) -> Option<&str> {
    let lead = digit_len(s);
    if lead > 0 && s[lead..].starts_with(')') {
        return Some(&s[..lead]);
    }
    for split in (0..=lead).rev() {
        let Some(sep) = s[split..].chars().next() else {
            continue;
        };
        let tail_start = split + sep.len_utf8();
        let tail = digit_len(&s[tail_start..]);
        if tail > 0 && s[tail_start + tail..].starts_with(')') {
            return Some(&s[..tail_start + tail]);
        }
    }
    None
}

fn decimal(digits: &str) -> i64 {
    digits.parse().unwrap_or(i64::MAX)
}

/// Leading base-10 integer, if the string starts with one.
fn leading_int(s: &str) -> Option<i64> {
    let len = digit_len(s);
    (len > 0).then(|| decimal(&s[..len]))
}
