// Configuration loading

pub mod settings;

/// Framework-agnostic RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert from hex u32 (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a "#RRGGBB" settings value. None on malformed input.
    pub fn from_hex_str(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let blue = Color::from_hex_str("#0000FF").unwrap();
        assert_eq!(blue.b, 1.0);
        assert_eq!(blue.r, 0.0);
        assert_eq!(Color::from_hex_str("0000ff"), Some(blue));
        assert!(Color::from_hex_str("#12345").is_none());
        assert!(Color::from_hex_str("#zzzzzz").is_none());
    }
}
