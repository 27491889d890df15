/// Category color resolution for charts, lists and exports.
use std::fmt;

use crate::types::CategoryId;

pub const SATURATION: u8 = 75;
pub const LIGHTNESS: u8 = 45;
const HUE_STEP: i64 = 37;

/// Fixed colors for the most common category names.
pub const CURATED_COLORS: &[(&str, &str)] = &[
    ("Food", "#10B981"),
    ("Shopping", "#3B82F6"),
    ("Travel", "#EF4444"),
    ("Bills", "#64748B"),
    ("Entertainment", "#8B5CF6"),
    ("Transportation", "#F97316"),
    ("Healthcare", "#EC4899"),
    ("Miscellaneous", "#F59E0B"),
    ("Services", "#14B8A6"),
    ("Transfers", "#6366F1"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Display color of a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryColor {
    Curated(Rgb),
    Generated { hue: u16 },
}

impl CategoryColor {
    pub fn rgb(&self) -> Rgb {
        match *self {
            CategoryColor::Curated(rgb) => rgb,
            CategoryColor::Generated { hue } => hsl_to_rgb(
                f64::from(hue),
                f64::from(SATURATION) / 100.0,
                f64::from(LIGHTNESS) / 100.0,
            ),
        }
    }

    /// CSS form: `#RRGGBB` for curated colors, `hsl(h, 75%, 45%)` otherwise.
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CategoryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryColor::Curated(Rgb(r, g, b)) => write!(f, "#{r:02X}{g:02X}{b:02X}"),
            CategoryColor::Generated { hue } => {
                write!(f, "hsl({hue}, {SATURATION}%, {LIGHTNESS}%)")
            }
        }
    }
}

/// Resolves the display color for a category.
///
/// Curated names win regardless of id. Any other name gets a hue of
/// `(id * 37) mod 360`, so a category keeps its color across reloads without
/// the server storing one. Different ids may collide.
pub fn resolve_color(name: &str, id: CategoryId) -> CategoryColor {
    if let Some(rgb) = curated_color(name) {
        return CategoryColor::Curated(rgb);
    }
    CategoryColor::Generated { hue: hue_for_id(id) }
}

pub fn curated_color(name: &str) -> Option<Rgb> {
    CURATED_COLORS
        .iter()
        .find(|(curated, _)| *curated == name)
        .and_then(|(_, hex)| parse_hex(hex))
}

pub fn hue_for_id(id: CategoryId) -> u16 {
    // Reduce first so large ids cannot overflow; same residue as id * 37.
    ((id % 360) * HUE_STEP).rem_euclid(360) as u16
}

/// Validate if a string is a valid hex color (e.g., #RRGGBB).
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_hex(s: &str) -> Option<Rgb> {
    if !is_valid_hex(s) {
        return None;
    }
    let r = u8::from_str_radix(&s[1..3], 16).ok()?;
    let g = u8::from_str_radix(&s[3..5], 16).ok()?;
    let b = u8::from_str_radix(&s[5..7], 16).ok()?;
    Some(Rgb(r, g, b))
}

/// `h` in degrees, `s` and `l` in `0.0..=1.0`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    if s.abs() < f64::EPSILON {
        let v = (l * 255.0).round() as u8;
        return Rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l.mul_add(-s, l + s)
    };
    let p = 2.0f64.mul_add(l, -q);
    let h = h / 360.0;

    let r = hue_to_channel(p, q, h + 1.0 / 3.0);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - 1.0 / 3.0);

    Rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return (q - p).mul_add(6.0 * t, p);
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return (q - p).mul_add((2.0 / 3.0 - t) * 6.0, p);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_names_ignore_the_id() {
        for (name, hex) in CURATED_COLORS {
            for id in [-5, 0, 1, 99, 1_000_000] {
                let color = resolve_color(name, id);
                assert_eq!(color.css(), *hex, "{name} with id {id}");
            }
        }
    }

    #[test]
    fn food_is_curated_green() {
        let color = resolve_color("Food", 99);
        assert_eq!(color, CategoryColor::Curated(Rgb(0x10, 0xB9, 0x81)));
        assert_eq!(color.css(), "#10B981");
    }

    #[test]
    fn uncurated_names_use_the_id_hue() {
        for id in [0, 1, 9, 10, 123, 359, 360, 4_242] {
            let color = resolve_color("Uncurated", id);
            assert_eq!(
                color,
                CategoryColor::Generated {
                    hue: ((id * 37) % 360) as u16
                }
            );
            assert_eq!(color, resolve_color("Uncurated", id));
        }
        assert_eq!(resolve_color("Uncurated", 10).css(), "hsl(10, 75%, 45%)");
    }

    #[test]
    fn curated_lookup_is_case_sensitive() {
        assert!(matches!(
            resolve_color("food", 3),
            CategoryColor::Generated { hue: 111 }
        ));
    }

    #[test]
    fn extreme_ids_stay_in_range() {
        for id in [i64::MIN, -1, i64::MAX] {
            let CategoryColor::Generated { hue } = resolve_color("Other", id) else {
                panic!("expected generated color");
            };
            assert!(hue < 360);
        }
        assert_eq!(hue_for_id(-1), 323);
    }

    #[test]
    fn generated_colors_convert_to_rgb() {
        // hsl(0, 75%, 45%)
        assert_eq!(CategoryColor::Generated { hue: 0 }.rgb(), Rgb(201, 29, 29));
        // hsl(120, 75%, 45%)
        assert_eq!(CategoryColor::Generated { hue: 120 }.rgb(), Rgb(29, 201, 29));
    }

    #[test]
    fn hex_validation() {
        assert!(is_valid_hex("#A1B2C3"));
        assert!(!is_valid_hex("A1B2C3"));
        assert!(!is_valid_hex("#A1B2C"));
        assert_eq!(parse_hex("#ff0080"), Some(Rgb(255, 0, 128)));
    }
}
