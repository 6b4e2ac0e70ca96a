//! Color values accepted by color attributes.
//!
//! A color is an RGB/RGBA tuple with components in `[0, 1]`, a hex string,
//! or a known name (CSS4 names, single-letter base colors, and grayscale
//! strings such as `"0.5"`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::Value;

/// A validated color.
///
/// Tuples are normalized to fixed-length arrays; strings are lowercased.
#[derive(Clone)]
pub enum Color {
    /// Red, green, blue in `[0, 1]`.
    Rgb([f64; 3]),
    /// Red, green, blue, alpha in `[0, 1]`.
    Rgba([f64; 4]),
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    Hex(Arc<str>),
    /// A named or grayscale color.
    Named(Arc<str>),
}

impl Color {
    /// The default color for color attributes.
    #[must_use]
    pub fn red() -> Self {
        Self::Named("red".into())
    }

    /// Builds a color from 3 or 4 components in `[0, 1]`.
    #[must_use]
    pub fn from_components(components: &[f64]) -> Option<Self> {
        if !components.iter().all(|c| (0.0..=1.0).contains(c)) {
            return None;
        }
        match *components {
            [r, g, b] => Some(Self::Rgb([r, g, b])),
            [r, g, b, a] => Some(Self::Rgba([r, g, b, a])),
            _ => None,
        }
    }

    /// Parses a hex, named, base-letter or grayscale color string.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.trim().to_ascii_lowercase();
        if lowered.starts_with('#') {
            return hex_to_rgba(&lowered).map(|_| Self::Hex(lowered.into()));
        }
        if named_to_rgba(&lowered).is_some() {
            return Some(Self::Named(lowered.into()));
        }
        None
    }

    /// Interprets a cell value as a color.
    ///
    /// Accepts an existing color, a color string, or a 3/4-element numeric
    /// sequence (`Vec3` or list).
    #[must_use]
    pub fn parse_value(value: &Value) -> Option<Self> {
        match value {
            Value::Color(c) => Some(c.clone()),
            Value::String(s) => Self::parse(s),
            other => Self::from_components(&other.numeric_components()?),
        }
    }

    /// Resolves any color form to RGBA components.
    #[must_use]
    pub fn to_rgba(&self) -> [f64; 4] {
        match self {
            Self::Rgb([r, g, b]) => [*r, *g, *b, 1.0],
            Self::Rgba(rgba) => *rgba,
            // Both string forms were validated on construction.
            Self::Hex(hex) => hex_to_rgba(hex).unwrap_or([0.0, 0.0, 0.0, 1.0]),
            Self::Named(name) => named_to_rgba(name).unwrap_or([0.0, 0.0, 0.0, 1.0]),
        }
    }

    /// Renders the color as `#rrggbb`, dropping alpha.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba();
        format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(component: f64) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hex_to_rgba(hex: &str) -> Option<[f64; 4]> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };
    let mut rgba = [1.0; 4];
    for (slot, i) in rgba.iter_mut().zip((0..expanded.len()).step_by(2)) {
        let byte = u8::from_str_radix(&expanded[i..i + 2], 16).ok()?;
        *slot = f64::from(byte) / 255.0;
    }
    Some(rgba)
}

fn named_to_rgba(name: &str) -> Option<[f64; 4]> {
    if let Some(rgb) = base_color(name) {
        return Some([rgb[0], rgb[1], rgb[2], 1.0]);
    }
    if let Ok(level) = name.parse::<f64>() {
        return (0.0..=1.0)
            .contains(&level)
            .then_some([level, level, level, 1.0]);
    }
    let idx = CSS4_COLORS.binary_search_by_key(&name, |(n, _)| n).ok()?;
    hex_to_rgba(CSS4_COLORS[idx].1)
}

fn base_color(name: &str) -> Option<[f64; 3]> {
    let rgb = match name {
        "b" => [0.0, 0.0, 1.0],
        "g" => [0.0, 0.5, 0.0],
        "r" => [1.0, 0.0, 0.0],
        "c" => [0.0, 0.75, 0.75],
        "m" => [0.75, 0.0, 0.75],
        "y" => [0.75, 0.75, 0.0],
        "k" => [0.0, 0.0, 0.0],
        "w" => [1.0, 1.0, 1.0],
        _ => return None,
    };
    Some(rgb)
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rgb(a), Self::Rgb(b)) => bits(a) == bits(b),
            (Self::Rgba(a), Self::Rgba(b)) => bits(a) == bits(b),
            (Self::Hex(a), Self::Hex(b)) | (Self::Named(a), Self::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Rgb(c) => bits(c).hash(state),
            Self::Rgba(c) => bits(c).hash(state),
            Self::Hex(s) | Self::Named(s) => s.hash(state),
        }
    }
}

fn bits(components: &[f64]) -> Vec<u64> {
    components.iter().map(|c| c.to_bits()).collect()
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb([r, g, b]) => write!(f, "({r}, {g}, {b})"),
            Self::Rgba([r, g, b, a]) => write!(f, "({r}, {g}, {b}, {a})"),
            Self::Hex(s) | Self::Named(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(s) | Self::Named(s) => write!(f, "{s}"),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

/// CSS4 color names, sorted for binary search.
const CSS4_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "#f0f8ff"),
    ("antiquewhite", "#faebd7"),
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("azure", "#f0ffff"),
    ("beige", "#f5f5dc"),
    ("bisque", "#ffe4c4"),
    ("black", "#000000"),
    ("blanchedalmond", "#ffebcd"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"),
    ("darkorange", "#ff8c00"),
    ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"),
    ("lemonchiffon", "#fffacd"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("linen", "#faf0e6"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"),
    ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"),
    ("moccasin", "#ffe4b5"),
    ("navajowhite", "#ffdead"),
    ("navy", "#000080"),
    ("oldlace", "#fdf5e6"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("papayawhip", "#ffefd5"),
    ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#fffafa"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];
