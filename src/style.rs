//! Colors used on the cover page.

use serde::{Deserialize, Serialize};

/// A color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// An RGB color with the red, green and blue components.
    Rgb(u8, u8, u8),
    /// A greyscale color.
    Greyscale(u8),
}

impl Color {
    /// Returns the red, green and blue components of this color.
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Color::Rgb(r, g, b) => [r, g, b],
            Color::Greyscale(v) => [v, v, v],
        }
    }
}

impl From<Color> for printpdf::Color {
    fn from(color: Color) -> printpdf::Color {
        let [r, g, b] = color.to_rgb();
        printpdf::Color::Rgb(printpdf::Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greyscale_to_rgb() {
        assert_eq!(Color::Greyscale(40).to_rgb(), [40, 40, 40]);
        assert_eq!(Color::Rgb(1, 2, 3).to_rgb(), [1, 2, 3]);
    }

    #[test]
    fn test_color_serde() {
        let c: Color = serde_json::from_str(r#"{"rgb": [34, 30, 28]}"#).expect("parse");
        assert_eq!(c, Color::Rgb(34, 30, 28));
        let c: Color = serde_json::from_str(r#"{"greyscale": 255}"#).expect("parse");
        assert_eq!(c, Color::Greyscale(255));
    }
}
