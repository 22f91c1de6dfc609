use std::collections::BTreeMap;

use egui::Color32;
use log::warn;
use serde::{Deserialize, Serialize};

/// How a color is specified in the store: either a literal CSS color or a reference to a theme
/// variable (`var(--name)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpec {
    Direct(String),
    ThemeRef(String),
}

impl ColorSpec {
    /// Parses the wire representation used by the `colorVar` field.
    pub fn from_css(value: &str) -> Self {
        let value = value.trim();
        if let Some(inner) = value
            .strip_prefix("var(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return ColorSpec::ThemeRef(inner.trim().to_string());
        }
        ColorSpec::Direct(value.to_string())
    }

    pub fn to_css(&self) -> String {
        match self {
            ColorSpec::Direct(v) => v.clone(),
            ColorSpec::ThemeRef(name) => format!("var({name})"),
        }
    }

    /// Resolves to a concrete color. Unknown theme variables and unparsable values
    /// resolve to `None`.
    pub fn resolve(&self, theme: &dyn ThemeLookup) -> Option<Color32> {
        let (raw, parsed) = match self {
            ColorSpec::Direct(v) => (v.clone(), parse_css_color(v)),
            ColorSpec::ThemeRef(name) => {
                let Some(v) = theme.lookup(name) else {
                    warn!("theme variable {name} is not defined");
                    return None;
                };
                let parsed = parse_css_color(&v);
                (v, parsed)
            }
        };
        if parsed.is_none() {
            warn!("malformed color specification: {raw}");
        }
        parsed
    }
}

/// Capability used to resolve [`ColorSpec::ThemeRef`] values.
pub trait ThemeLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> ThemeLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        (self)(name)
    }
}

/// Table of theme variables, e.g. `--cat-kueche -> rgba(255, 159, 67, 0.8)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    vars: BTreeMap<String, String>,
}

impl Default for Theme {
    fn default() -> Self {
        let vars = [
            ("--cat-kueche", "rgba(255, 159, 67, 0.8)"),
            ("--cat-bad", "rgba(72, 219, 251, 0.8)"),
            ("--cat-allgemein", "rgba(162, 155, 254, 0.8)"),
            ("--user-du", "#ff6b6b"),
            ("--user-alex", "#1dd1a1"),
            ("--user-mia", "#feca57"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { vars }
    }
}

impl Theme {
    pub fn empty() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Loads a theme from a JSON object of `name -> color` pairs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }
}

impl ThemeLookup for Theme {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Replaces the alpha channel of `c` keeping its hue.
pub fn with_alpha(c: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = c.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, unit_to_u8(alpha))
}

/// Parses the subset of CSS colors used by the app: hex, `rgb[a]()`, `hsl[a]()` and a few names.
pub fn parse_css_color(value: &str) -> Option<Color32> {
    let v = value.trim().to_ascii_lowercase();

    if let Some(hex) = v.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&v, "rgba").or_else(|| function_args(&v, "rgb")) {
        return parse_rgb_args(&args);
    }
    if let Some(args) = function_args(&v, "hsla").or_else(|| function_args(&v, "hsl")) {
        return parse_hsl_args(&args);
    }

    match v.as_str() {
        "white" => Some(Color32::WHITE),
        "black" => Some(Color32::BLACK),
        "transparent" => Some(Color32::TRANSPARENT),
        _ => None,
    }
}

fn function_args(v: &str, name: &str) -> Option<Vec<String>> {
    let inner = v.strip_prefix(name)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    let args: Vec<String> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Some(args)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color32::from_rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Some(Color32::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            pair(0)?,
            pair(2)?,
            pair(4)?,
            pair(6)?,
        )),
        _ => None,
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Color32> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v = match s.strip_suffix('%') {
            Some(p) => p.parse::<f32>().ok()? / 100. * 255.,
            None => s.parse::<f32>().ok()?,
        };
        Some(v.clamp(0., 255.).round() as u8)
    };
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.,
    };
    Some(Color32::from_rgba_unmultiplied(
        channel(&args[0])?,
        channel(&args[1])?,
        channel(&args[2])?,
        unit_to_u8(alpha),
    ))
}

fn parse_hsl_args(args: &[String]) -> Option<Color32> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let h = args[0].strip_suffix("deg").unwrap_or(&args[0]).parse::<f32>().ok()?;
    let s = args[1].strip_suffix('%')?.parse::<f32>().ok()? / 100.;
    let l = args[2].strip_suffix('%')?.parse::<f32>().ok()? / 100.;
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.,
    };
    let (r, g, b) = hsl_to_rgb(h, s.clamp(0., 1.), l.clamp(0., 1.));
    Some(Color32::from_rgba_unmultiplied(
        unit_to_u8(r),
        unit_to_u8(g),
        unit_to_u8(b),
        unit_to_u8(alpha),
    ))
}

fn parse_alpha(s: &str) -> Option<f32> {
    let a = match s.strip_suffix('%') {
        Some(p) => p.parse::<f32>().ok()? / 100.,
        None => s.parse::<f32>().ok()?,
    };
    Some(a.clamp(0., 1.))
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0., 1.) * 255.).round() as u8
}

fn hsl_to_rgb(h_deg: f32, s: f32, l: f32) -> (f32, f32, f32) {
    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0. {
            t += 1.;
        }
        if t > 1. {
            t -= 1.;
        }
        if t < 1. / 6. {
            return p + (q - p) * 6. * t;
        }
        if t < 1. / 2. {
            return q;
        }
        if t < 2. / 3. {
            return p + (q - p) * (2. / 3. - t) * 6.;
        }
        p
    }

    if s == 0. {
        return (l, l, l);
    }
    let h = h_deg.rem_euclid(360.) / 360.;
    let q = if l < 0.5 { l * (1. + s) } else { l + s - l * s };
    let p = 2. * l - q;
    (
        hue_to_rgb(p, q, h + 1. / 3.),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1. / 3.),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_theme_reference() {
        assert_eq!(
            ColorSpec::from_css("var(--cat-bad)"),
            ColorSpec::ThemeRef("--cat-bad".to_string())
        );
        assert_eq!(
            ColorSpec::from_css("hsla(270, 70%, 55%, 0.8)"),
            ColorSpec::Direct("hsla(270, 70%, 55%, 0.8)".to_string())
        );
        assert_eq!(
            ColorSpec::ThemeRef("--cat-bad".to_string()).to_css(),
            "var(--cat-bad)"
        );
    }

    #[test]
    fn resolves_through_theme() {
        let theme = Theme::empty().with_var("--x", "#ff0000");
        let c = ColorSpec::ThemeRef("--x".to_string()).resolve(&theme);
        assert_eq!(c, Some(Color32::from_rgb(255, 0, 0)));

        let missing = ColorSpec::ThemeRef("--y".to_string()).resolve(&theme);
        assert_eq!(missing, None);
    }

    #[test]
    fn resolves_through_closure() {
        let lookup = |name: &str| (name == "--z").then(|| "rgb(0, 0, 255)".to_string());
        let c = ColorSpec::ThemeRef("--z".to_string()).resolve(&lookup);
        assert_eq!(c, Some(Color32::from_rgb(0, 0, 255)));
    }

    #[test]
    fn parses_rgba_and_hex() {
        let c = parse_css_color("rgba(100, 150, 200, 0.5)").unwrap();
        assert_eq!(c.a(), 128);
        let [r, g, b, _] = c.to_srgba_unmultiplied();
        assert!(r.abs_diff(100) <= 2 && g.abs_diff(150) <= 2 && b.abs_diff(200) <= 2);
        assert_eq!(parse_css_color("#fff"), Some(Color32::WHITE));
        assert_eq!(
            parse_css_color("#102030"),
            Some(Color32::from_rgb(16, 32, 48))
        );
    }

    #[test]
    fn parses_hsla() {
        let c = parse_css_color("hsla(0, 100%, 50%, 1)").unwrap();
        assert_eq!(c, Color32::from_rgb(255, 0, 0));

        let c = parse_css_color("hsl(120, 100%, 50%)").unwrap();
        assert_eq!(c, Color32::from_rgb(0, 255, 0));
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert_eq!(parse_css_color("rgba(1, 2)"), None);
        assert_eq!(parse_css_color("#12"), None);
        assert_eq!(parse_css_color("not-a-color"), None);
        assert_eq!(ColorSpec::Direct("rgb(x, y, z)".into()).resolve(&Theme::empty()), None);
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = with_alpha(Color32::from_rgb(200, 100, 50), 0.3);
        assert_eq!(c.a(), 77);
        let [r, g, b, _] = c.to_srgba_unmultiplied();
        assert!(r.abs_diff(200) <= 4 && g.abs_diff(100) <= 4 && b.abs_diff(50) <= 4);
    }

    #[test]
    fn theme_loads_from_json() {
        let theme = Theme::from_json(r##"{"--cat-bad": "#000000"}"##).unwrap();
        assert_eq!(theme.lookup("--cat-bad").as_deref(), Some("#000000"));
        assert_eq!(theme.lookup("--cat-kueche"), None);
    }
}
