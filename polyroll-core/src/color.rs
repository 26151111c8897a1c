/// Colour parsing and the three-stop gradient used to tint dice
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map, map_res},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{DiceError, Result};
use crate::style::RenderStyle;

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb` or a CSS colour name.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with('#') {
            return hex_color(trimmed)
                .map(|(_, color)| color)
                .map_err(|_| DiceError::InvalidColor(input.to_string()));
        }
        named_color(trimmed).ok_or_else(|| DiceError::InvalidColor(input.to_string()))
    }

    /// Linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
    }

    /// Multiply every channel by `factor` (clamped to [0, 1]).
    pub fn scaled(self, factor: f64) -> Rgb {
        Rgb::lerp(Rgb::new(0, 0, 0), self, factor)
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, hex_digit), |s| u8::from_str_radix(s, 16))(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, hex_digit), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    all_consuming(preceded(
        tag("#"),
        alt((
            all_consuming(map(tuple((hex_pair, hex_pair, hex_pair)), |(r, g, b)| {
                Rgb::new(r, g, b)
            })),
            all_consuming(map(tuple((hex_single, hex_single, hex_single)), |(r, g, b)| {
                Rgb::new(r, g, b)
            })),
        )),
    ))(input)
}

/// CSS names the default palettes and colour pickers produce.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("darkred", Rgb::new(139, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("darkgreen", Rgb::new(0, 100, 0)),
    ("lightgreen", Rgb::new(144, 238, 144)),
    ("lime", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("navy", Rgb::new(0, 0, 128)),
    ("lightblue", Rgb::new(173, 216, 230)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("purple", Rgb::new(128, 0, 128)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("gold", Rgb::new(255, 215, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("brown", Rgb::new(165, 42, 42)),
    ("pink", Rgb::new(255, 192, 203)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("silver", Rgb::new(192, 192, 192)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("teal", Rgb::new(0, 128, 128)),
];

fn named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, color)| color)
}

fn parse_or(value: &str, fallback: &str) -> Rgb {
    Rgb::parse(value).unwrap_or_else(|err| {
        log::warn!("{err}, using {fallback}");
        Rgb::parse(fallback).unwrap_or(Rgb::new(0, 0, 0))
    })
}

/// Piecewise-linear colour gradient over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<(f64, Rgb)>,
}

impl ColorScale {
    /// Stops must be non-empty and sorted by position.
    pub fn new(stops: Vec<(f64, Rgb)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(DiceError::InvalidStyle("color scale needs at least one stop".to_string()));
        }
        if stops.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(DiceError::InvalidStyle("color stops must be sorted".to_string()));
        }
        Ok(Self { stops })
    }

    /// `[start@0, middle@0.5, end@1]`.
    pub fn three_stop(start: Rgb, middle: Rgb, end: Rgb) -> Self {
        Self {
            stops: vec![(0.0, start), (0.5, middle), (1.0, end)],
        }
    }

    /// The three-stop scale of a render style.
    pub fn from_style(style: &RenderStyle) -> Result<Self> {
        Ok(Self::three_stop(
            Rgb::parse(&style.start_color)?,
            Rgb::parse(&style.middle_color)?,
            Rgb::parse(&style.end_color)?,
        ))
    }

    /// Like [`ColorScale::from_style`], but a colour that does not parse is
    /// replaced by the default style's colour for that stop.
    pub fn from_style_lossy(style: &RenderStyle) -> Self {
        let defaults = RenderStyle::default();
        Self::three_stop(
            parse_or(&style.start_color, &defaults.start_color),
            parse_or(&style.middle_color, &defaults.middle_color),
            parse_or(&style.end_color, &defaults.end_color),
        )
    }

    pub fn stops(&self) -> &[(f64, Rgb)] {
        &self.stops
    }

    /// Colour at intensity `t`, clamped to the outer stops.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                let local = if span > 0.0 { (t - p0) / span } else { 1.0 };
                return Rgb::lerp(c0, c1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_scale_replaces_only_bad_stops() {
        let style = RenderStyle {
            start_color: "chartreuse".to_string(),
            end_color: "#0000ff".to_string(),
            ..RenderStyle::default()
        };
        assert!(ColorScale::from_style(&style).is_err());
        let scale = ColorScale::from_style_lossy(&style);
        assert_eq!(scale.sample(0.0), Rgb::new(0, 128, 0));
        assert_eq!(scale.sample(0.5), Rgb::new(0, 0, 0));
        assert_eq!(scale.sample(1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#00ff7f").unwrap(), Rgb::new(0, 255, 127));
        assert_eq!(Rgb::parse("#FFF").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::parse("#a1b").unwrap(), Rgb::new(0xaa, 0x11, 0xbb));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Rgb::parse("lightgreen").unwrap(), Rgb::new(144, 238, 144));
        assert_eq!(Rgb::parse("Green").unwrap(), Rgb::new(0, 128, 0));
    }

    #[test]
    fn test_parse_rejects() {
        for input in ["#12345", "#gggggg", "#1234567", "chartreuse-ish", ""] {
            assert!(
                matches!(Rgb::parse(input), Err(DiceError::InvalidColor(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::new(18, 52, 86);
        assert_eq!(color.to_hex(), "#123456");
        assert_eq!(Rgb::parse(&color.to_hex()).unwrap(), color);
    }

    #[test]
    fn test_default_scale() {
        let scale = ColorScale::from_style(&RenderStyle::default()).unwrap();
        assert_eq!(scale.sample(0.0), Rgb::new(0, 128, 0));
        assert_eq!(scale.sample(0.5), Rgb::new(0, 0, 0));
        assert_eq!(scale.sample(1.0), Rgb::new(144, 238, 144));
        assert_eq!(scale.sample(0.25), Rgb::new(0, 64, 0));
        assert_eq!(scale.sample(0.75), Rgb::new(72, 119, 72));
    }

    #[test]
    fn test_sample_clamps() {
        let scale = ColorScale::from_style(&RenderStyle::default()).unwrap();
        assert_eq!(scale.sample(-3.0), scale.sample(0.0));
        assert_eq!(scale.sample(7.0), scale.sample(1.0));
    }

    #[test]
    fn test_unsorted_stops_rejected() {
        let black = Rgb::new(0, 0, 0);
        assert!(ColorScale::new(vec![(1.0, black), (0.0, black)]).is_err());
        assert!(ColorScale::new(Vec::new()).is_err());
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Rgb::new(200, 100, 50).scaled(0.5), Rgb::new(100, 50, 25));
        assert_eq!(Rgb::new(200, 100, 50).scaled(2.0), Rgb::new(200, 100, 50));
    }
}
