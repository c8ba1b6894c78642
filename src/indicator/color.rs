use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise interpolation, rounded to the nearest integer.
    pub fn lerp(self, to: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("invalid hex color: {}", s);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex() {
        let c: Rgb = "#7c3aed".parse().unwrap();
        assert_eq!(c, Rgb::new(0x7c, 0x3a, 0xed));
        assert_eq!(c.to_hex(), "#7c3aed");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Rgb::new(0x7c, 0x3a, 0xed);
        let b = Rgb::new(0x9c, 0xa3, 0xaf);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(Rgb::new(0, 0, 0).lerp(Rgb::new(255, 255, 255), 0.5), Rgb::new(128, 128, 128));
    }
}
