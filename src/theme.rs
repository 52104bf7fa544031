use serde::Deserialize;
use strum_macros::{Display, EnumIter};
use three_d::{Srgba, egui};

/// Light or dark presentation. Purely cosmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// How the star field is drawn under a theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarStyle {
    /// Multiplier on each star's base size.
    pub factor: f64,
    pub saturation: f64,
    /// Multiplied into every star color.
    pub tint: Option<Srgba>,
}

const STAR_LIGHTNESS: f64 = 0.9;

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn clear_color(self) -> Srgba {
        match self {
            Self::Dark => Srgba::BLACK,
            Self::Light => Srgba::WHITE,
        }
    }

    pub fn star_style(self) -> StarStyle {
        match self {
            Self::Dark => StarStyle {
                factor: 6.0,
                saturation: 0.5,
                tint: None,
            },
            Self::Light => StarStyle {
                factor: 3.0,
                saturation: 0.2,
                tint: Some(Srgba::new_opaque(0xe0, 0xe7, 0xef)),
            },
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Dark => "Light Mode",
            Self::Light => "Dark Mode",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Self::Dark => egui::Visuals::dark(),
            Self::Light => egui::Visuals::light(),
        }
    }

    /// Color of text drawn straight onto the scene.
    pub fn overlay_text_color(self) -> egui::Color32 {
        match self {
            Self::Dark => egui::Color32::WHITE,
            Self::Light => egui::Color32::from_rgb(0x22, 0x22, 0x22),
        }
    }

    pub fn star_color(self, hue: f64) -> Srgba {
        let style = self.star_style();
        let [r, g, b] = hsl_to_rgb(hue, style.saturation, STAR_LIGHTNESS);
        let color = Srgba::new_opaque(r, g, b);
        match style.tint {
            Some(tint) => multiply(color, tint),
            None => color,
        }
    }
}

fn multiply(a: Srgba, b: Srgba) -> Srgba {
    let mul = |x: u8, y: u8| ((x as u16 * y as u16 + 127) / 255) as u8;
    Srgba::new(mul(a.r, b.r), mul(a.g, b.g), mul(a.b, b.b), mul(a.a, b.a))
}

/// Converts hue, saturation and lightness (all in `0..=1`) to 8-bit RGB.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let hue = hue.rem_euclid(1.0);
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue * 6.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    [r, g, b].map(|c| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[test]
    fn toggle_round_trips() {
        for theme in Theme::iter() {
            assert_ne!(theme.toggled(), theme);
            assert_eq!(theme.toggled().toggled(), theme);
        }
    }

    #[test]
    fn labels_name_the_other_theme() {
        assert_eq!(Theme::Dark.toggle_label(), "Light Mode");
        assert_eq!(Theme::Light.toggle_label(), "Dark Mode");
    }

    #[rstest]
    #[case(0.0, 1.0, 0.5, [255, 0, 0])]
    #[case(1.0 / 3.0, 1.0, 0.5, [0, 255, 0])]
    #[case(2.0 / 3.0, 1.0, 0.5, [0, 0, 255])]
    #[case(0.5, 0.0, 0.9, [230, 230, 230])]
    #[case(1.0, 1.0, 0.5, [255, 0, 0])]
    fn hsl(#[case] h: f64, #[case] s: f64, #[case] l: f64, #[case] expected: [u8; 3]) {
        assert_eq!(hsl_to_rgb(h, s, l), expected);
    }

    #[test]
    fn light_stars_are_tinted_and_paler() {
        let dark = Theme::Dark.star_color(0.0);
        let light = Theme::Light.star_color(0.0);
        assert!(light.r <= 0xe0);
        assert!(dark.r - dark.b > light.r.abs_diff(light.b));
    }

    #[test]
    fn names() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
