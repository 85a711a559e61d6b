//! Colours as the sketches write them: CSS names, hex and `hsl()`.

use std::str::FromStr;

use anyhow::{Context as _, bail, ensure};

/// Linear RGB triple in `[0, 1]`, written to shaders as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Colour = Colour::rgb(0.0, 0.0, 0.0);
    pub const TOMATO: Colour = Colour::hex(0xff6347);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as f32 / 255.0,
            g: ((value >> 8) & 0xff) as f32 / 255.0,
            b: (value & 0xff) as f32 / 255.0,
        }
    }

    /// `h` in degrees, `s` and `l` in `[0, 1]`.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let h = (h / 360.0).rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::rgb(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Padded for a `vec4<f32>` uniform slot.
    pub fn to_vec4(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: 1.0,
        }
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

fn parse_percent(s: &str) -> anyhow::Result<f32> {
    let digits = s
        .trim()
        .strip_suffix('%')
        .with_context(|| format!("expected a percentage, got '{s}'"))?;
    Ok(digits.trim().parse::<f32>()? / 100.0)
}

impl FromStr for Colour {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            ensure!(hex.len() == 6, "hex colour '{s}' must have six digits");
            return Ok(Colour::hex(u32::from_str_radix(hex, 16)?));
        }
        if let Some(args) = s.strip_prefix("hsl(").and_then(|rest| rest.strip_suffix(')')) {
            let parts: Vec<&str> = args.split(',').collect();
            ensure!(parts.len() == 3, "hsl colour '{s}' needs three components");
            let h = parts[0].trim().parse::<f32>()?;
            return Ok(Colour::hsl(h, parse_percent(parts[1])?, parse_percent(parts[2])?));
        }
        match s.as_str() {
            "white" => Ok(Colour::WHITE),
            "black" => Ok(Colour::BLACK),
            "tomato" => Ok(Colour::TOMATO),
            "red" => Ok(Colour::hex(0xff0000)),
            "green" => Ok(Colour::hex(0x008000)),
            "blue" => Ok(Colour::hex(0x0000ff)),
            "gray" | "grey" => Ok(Colour::hex(0x808080)),
            _ => bail!("unknown colour '{s}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!("tomato".parse::<Colour>().unwrap(), Colour::TOMATO);
        assert_eq!("#FFFFFF".parse::<Colour>().unwrap(), Colour::WHITE);
    }

    #[test]
    fn parses_grey_hsl() {
        let c: Colour = "hsl(0, 0%, 70%)".parse().unwrap();
        assert!((c.r - 0.7).abs() < 1e-6 && c.r == c.g && c.g == c.b);
    }

    #[test]
    fn hsl_primary_hue() {
        let c = Colour::hsl(120.0, 1.0, 0.5);
        assert!((c.g - 1.0).abs() < 1e-6);
        assert!(c.r.abs() < 1e-6 && c.b.abs() < 1e-6);
    }

    #[test]
    fn rejects_unknown() {
        assert!("chartreuse-ish".parse::<Colour>().is_err());
        assert!("hsl(1, 2, 3)".parse::<Colour>().is_err());
    }
}
