use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while_m_n};
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_opt};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Squared euclidean distance in RGB space
    pub fn distance(&self, other: &RgbColor) -> u32 {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2) as u32;
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

/// Returns the number a style value stands for, if the whole (trimmed) value reads as a
/// finite number. `"12"` and `"0.5"` are numeric, `"12px"` is not.
pub fn parse_numeric(input: &str) -> Option<f64> {
    let (_, n) = all_consuming(double::<&str, nom::error::Error<&str>>)(input.trim()).ok()?;
    if !n.is_finite() {
        return None;
    }
    // `-0` and `0` must intern identically
    Some(if n == 0.0 { 0.0 } else { n })
}

#[cfg(test)]
#[test]
fn test_parse_numeric() {
    assert_eq!(parse_numeric("12"), Some(12.0));
    assert_eq!(parse_numeric(" 0.5 "), Some(0.5));
    assert_eq!(parse_numeric("-3"), Some(-3.0));
    assert_eq!(parse_numeric("1e3"), Some(1000.0));
    assert_eq!(parse_numeric("-0"), Some(0.0));
    assert_eq!(parse_numeric("12px"), None);
    assert_eq!(parse_numeric(""), None);
    assert_eq!(parse_numeric("inf"), None);
    assert_eq!(parse_numeric("NaN"), None);
    assert_eq!(parse_numeric("auto"), None);
}

/// A color channel, saturating at 255
fn channel(input: &str) -> IResult<&str, u8> {
    map(digit1, |d: &str| d.parse::<u32>().map_or(255, |v| v.min(255)) as u8)(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

/// `rgb(1, 2, 3)`
fn rgb_triplet(input: &str) -> IResult<&str, RgbColor> {
    let (input, (_, r, _, g, _, b, _, _)) = tuple((
        tag_no_case("rgb("),
        channel,
        comma,
        channel,
        comma,
        channel,
        multispace0,
        char(')'),
    ))(input)?;
    Ok((input, RgbColor::new(r, g, b)))
}

/// `rgba(1, 2, 3, 1)`. Only integer alpha is recognized.
fn rgba_quad(input: &str) -> IResult<&str, RgbColor> {
    let (input, (_, r, _, g, _, b, _, _a, _, _)) = tuple((
        tag_no_case("rgba("),
        channel,
        comma,
        channel,
        comma,
        channel,
        comma,
        digit1,
        multispace0,
        char(')'),
    ))(input)?;
    Ok((input, RgbColor::new(r, g, b)))
}

fn hex_digits(input: &str) -> IResult<&str, &str> {
    preceded(tag("#"), take_while_m_n(3, 6, |c: char| c.is_ascii_hexdigit()))(input)
}

/// Decodes `#rgb`, `#rgba` and `#rrggbb`; any other length is not a color
fn hex_color(input: &str) -> IResult<&str, RgbColor> {
    map_opt(hex_digits, |digits: &str| {
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 | 4 => Some(RgbColor::new(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
            )),
            6 => Some(RgbColor::new(byte(0)?, byte(2)?, byte(4)?)),
            _ => None,
        }
    })(input)
}

/// Decodes a complete color literal as found by the extractor
pub fn parse_color_literal(input: &str) -> Option<RgbColor> {
    all_consuming(terminated(alt((rgb_triplet, rgba_quad, hex_color)), multispace0))(input.trim())
        .ok()
        .map(|(_, color)| color)
}

#[cfg(test)]
#[test]
fn test_parse_color_literal() {
    assert_eq!(parse_color_literal("rgb(255, 0, 0)"), Some(RgbColor::new(255, 0, 0)));
    assert_eq!(parse_color_literal("RGB(1,2,3)"), Some(RgbColor::new(1, 2, 3)));
    assert_eq!(parse_color_literal("rgba(0, 0, 255, 1)"), Some(RgbColor::new(0, 0, 255)));
    assert_eq!(parse_color_literal("#fff"), Some(RgbColor::new(255, 255, 255)));
    assert_eq!(parse_color_literal("#FF8000"), Some(RgbColor::new(255, 128, 0)));
    assert_eq!(parse_color_literal("#abcde"), None);
    assert_eq!(parse_color_literal("rgba(0, 0, 0, 0.5)"), None);
    assert_eq!(parse_color_literal("red"), None);
}

/// Finds the first position in `input` where `parser` succeeds, returning the byte
/// offset, the matched text and the parser output
fn find_first<'a, O>(
    input: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Option<(usize, &'a str, O)> {
    input.char_indices().find_map(|(start, _)| {
        let rest = &input[start..];
        parser(rest).ok().map(|(remaining, out)| {
            let end = start + rest.len() - remaining.len();
            (start, &input[start..end], out)
        })
    })
}

/// First `rgb(r, g, b)` occurrence: its byte offset, text and decoded color
pub(crate) fn find_rgb(input: &str) -> Option<(usize, &str, RgbColor)> {
    find_first(input, rgb_triplet)
}

/// First `rgba(r, g, b, a)` occurrence
pub(crate) fn find_rgba(input: &str) -> Option<&str> {
    find_first(input, rgba_quad).map(|(_, text, _)| text)
}

/// First `#` followed by 3 to 6 hex digits
pub(crate) fn find_hex(input: &str) -> Option<&str> {
    find_first(input, hex_digits).map(|(_, text, _)| text)
}

#[cfg(test)]
#[test]
fn test_find_literals() {
    let value = "1px solid rgb(10, 20, 30)";
    assert_eq!(
        find_rgb(value),
        Some((10, "rgb(10, 20, 30)", RgbColor::new(10, 20, 30)))
    );
    assert_eq!(find_rgb("rgba(1, 2, 3, 1)"), None);
    assert_eq!(find_rgba("0 0 2px rgba(1, 2, 3, 1) inset"), Some("rgba(1, 2, 3, 1)"));
    assert_eq!(find_hex("border: #AbCdEf99"), Some("#AbCdEf"));
    assert_eq!(find_hex("#12"), None);
    assert_eq!(find_hex("none"), None);
}
