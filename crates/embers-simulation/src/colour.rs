//! Colours as hue, saturation, lightness and alpha.

use palette::FromColor as _;

/// A colour in the HSL space, with an alpha channel.
///
/// The units follow CSS: `hue` is in degrees, `saturation`, `lightness` and `alpha` are
/// percentages from 0 to 100.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A colour is only ever going to have these 4 channels"
)]
pub struct Hsla {
    /// Hue in degrees
    pub hue: f32,
    /// Saturation in percent
    pub saturation: f32,
    /// Lightness in percent
    pub lightness: f32,
    /// Opacity in percent
    pub alpha: f32,
}

impl Hsla {
    /// Instantiate
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    /// The same colour with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Convert to gamma-encoded sRGB, with every channel in `[0, 1]`.
    #[must_use]
    pub fn to_srgba(self) -> palette::Srgba {
        let hsla: palette::Hsla = palette::Hsla::new(
            self.hue,
            (self.saturation / 100.0).clamp(0.0, 1.0),
            (self.lightness / 100.0).clamp(0.0, 1.0),
            (self.alpha / 100.0).clamp(0.0, 1.0),
        );
        palette::Srgba::from_color(hsla)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pure_red() {
        let red = Hsla::new(0.0, 100.0, 50.0, 100.0).to_srgba();
        assert!((red.red - 1.0).abs() < 1e-5);
        assert!(red.green.abs() < 1e-5);
        assert!(red.blue.abs() < 1e-5);
        assert!((red.alpha - 1.0).abs() < 1e-5);
    }

    #[test]
    fn background_grey() {
        let grey = Hsla::new(0.0, 0.0, 20.0, 100.0).to_srgba();
        assert!((grey.red - 0.2).abs() < 1e-5);
        assert!((grey.green - 0.2).abs() < 1e-5);
        assert!((grey.blue - 0.2).abs() < 1e-5);
    }

    #[test]
    fn changing_alpha_keeps_the_colour() {
        let colour = Hsla::new(30.0, 100.0, 70.0, 100.0).with_alpha(20.0);
        assert!((colour.hue - 30.0).abs() < f32::EPSILON);
        assert!((colour.alpha - 20.0).abs() < f32::EPSILON);
        assert!((colour.to_srgba().alpha - 0.2).abs() < 1e-5);
    }
}
