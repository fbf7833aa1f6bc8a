//! Font outline assets
//!
//! A font is stored as RON: per-glyph outlines that have already been
//! flattened and triangulated by the asset pipeline. Text extrusion only needs
//! the outline loops (for side walls and bevels) and the cap triangles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetError};

/// One glyph outline in font units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyph {
    /// Horizontal advance to the next glyph
    pub advance: f32,
    /// Outline points
    pub points: Vec<[f32; 2]>,
    /// Closed loops of point indices; outer loops counter-clockwise, holes clockwise
    pub contours: Vec<Vec<u32>>,
    /// Cap triangulation over `points`, counter-clockwise
    pub triangles: Vec<[u32; 3]>,
}

/// Triangulated font outline asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    /// Family name, for logging
    pub family: String,
    /// Font units per em; glyphs are scaled by `size / resolution`
    pub resolution: f32,
    /// Distance between baselines in font units
    pub line_height: f32,
    /// Glyph table
    pub glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Look up a glyph, if the font defines it
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Check that every glyph references only points it owns
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.resolution <= 0.0 {
            return Err(AssetError::InvalidData(format!(
                "font '{}' has non-positive resolution",
                self.family
            )));
        }

        for (c, glyph) in &self.glyphs {
            let count = glyph.points.len();
            let out_of_range = glyph
                .contours
                .iter()
                .flatten()
                .chain(glyph.triangles.iter().flatten())
                .any(|&index| index as usize >= count);
            if out_of_range {
                return Err(AssetError::InvalidData(format!(
                    "glyph {c:?} of font '{}' indexes past its {count} points",
                    self.family
                )));
            }
        }
        Ok(())
    }
}

impl Asset for Font {
    const KIND: &'static str = "font";

    fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AssetError::InvalidData(format!("font is not UTF-8: {e}")))?;
        let font: Self = ron::from_str(text)
            .map_err(|e| AssetError::InvalidData(format!("font parse error: {e}")))?;
        font.validate()?;
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_FONT: &str = r#"(
        family: "blocks",
        resolution: 1000.0,
        line_height: 1200.0,
        glyphs: {
            'I': (
                advance: 600.0,
                points: [(0.0, 0.0), (500.0, 0.0), (500.0, 700.0), (0.0, 700.0)],
                contours: [[0, 1, 2, 3]],
                triangles: [(0, 1, 2), (0, 2, 3)],
            ),
        },
    )"#;

    #[test]
    fn test_parse_font() {
        let font = Font::from_bytes(SQUARE_FONT.as_bytes()).unwrap();
        assert_eq!(font.family, "blocks");
        assert_eq!(font.glyph('I').unwrap().triangles.len(), 2);
        assert!(font.glyph('Q').is_none());
    }

    #[test]
    fn test_out_of_range_index_is_invalid() {
        let broken = SQUARE_FONT.replace("(0, 2, 3)", "(0, 2, 9)");
        assert!(matches!(Font::from_bytes(broken.as_bytes()), Err(AssetError::InvalidData(_))));
    }
}
