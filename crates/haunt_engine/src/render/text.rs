//! Extruded 3D text
//!
//! Lays glyph outlines from a [`Font`] along a baseline, then extrudes them
//! into solid geometry with optional rounded bevels. Front faces look down -Z,
//! the body spans `0..depth` on Z, and bevels extend past both ends.

use crate::assets::{Font, Glyph};
use crate::foundation::math::{constants::HALF_PI, Vec2, Vec3};
use crate::render::geometry::Geometry;

/// Extrusion and bevel parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// Glyph height in world units (one em)
    pub size: f32,
    /// Extrusion depth
    pub depth: f32,
    /// Whether to round the edges
    pub bevel_enabled: bool,
    /// How far the bevel extends past the front and back faces
    pub bevel_thickness: f32,
    /// How far the bevel extends outward from the outline
    pub bevel_size: f32,
    /// Outline offset at which the bevel starts
    pub bevel_offset: f32,
    /// Number of bevel rings
    pub bevel_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.2,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

/// One extrusion layer: depth and how far the outline is pushed outward
#[derive(Debug, Clone, Copy)]
struct Ring {
    z: f32,
    offset: f32,
}

impl TextOptions {
    fn rings(&self) -> Vec<Ring> {
        if !self.bevel_enabled || self.bevel_segments == 0 {
            return vec![Ring { z: 0.0, offset: 0.0 }, Ring { z: self.depth, offset: 0.0 }];
        }

        let segments = self.bevel_segments;
        let bevel = |s: u32| {
            let t = s as f32 / segments as f32 * HALF_PI;
            (self.bevel_thickness * t.cos(), self.bevel_size * t.sin() + self.bevel_offset)
        };

        let front = (0..=segments).map(|s| {
            let (z, offset) = bevel(s);
            Ring { z: -z, offset }
        });
        let back = (0..=segments).rev().map(|s| {
            let (z, offset) = bevel(s);
            Ring { z: self.depth + z, offset }
        });
        front.chain(back).collect()
    }
}

/// Builder for extruded text geometry
pub struct TextGeometry;

impl TextGeometry {
    /// Build geometry for `text`; characters missing from the font are skipped
    ///
    /// The result is positioned with the first baseline at y = 0 and the pen
    /// starting at x = 0; call [`Geometry::center`] to balance it.
    pub fn build(font: &Font, text: &str, options: &TextOptions) -> Geometry {
        let scale = options.size / font.resolution;
        let rings = options.rings();
        let mut geometry = Geometry::default();
        let mut pen = Vec2::zeros();

        for c in text.chars() {
            if c == '\n' {
                pen.x = 0.0;
                pen.y -= font.line_height * scale;
                continue;
            }
            let Some(glyph) = font.glyph(c) else {
                log::warn!("Font '{}' has no glyph for {c:?}; skipping", font.family);
                continue;
            };
            extrude_glyph(&mut geometry, glyph, pen, scale, &rings);
            pen.x += glyph.advance * scale;
        }

        log::debug!(
            "Built text {text:?}: {} vertices, {} triangles",
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        geometry
    }
}

fn push(geometry: &mut Geometry, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
    let index = u32::try_from(geometry.positions.len()).unwrap_or(u32::MAX);
    geometry.positions.push(position.into());
    geometry.normals.push(normal.into());
    geometry.uvs.push(uv);
    index
}

/// Outward miter direction for every contour point; zero for interior points
fn bevel_directions(glyph: &Glyph, points: &[Vec2]) -> Vec<Vec2> {
    let mut directions = vec![Vec2::zeros(); points.len()];
    for contour in &glyph.contours {
        let n = contour.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let prev = points[contour[(i + n - 1) % n] as usize];
            let current = points[contour[i] as usize];
            let next = points[contour[(i + 1) % n] as usize];

            let right = |e: Vec2| Vec2::new(e.y, -e.x).try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros);
            let n1 = right(current - prev);
            let n2 = right(next - current);
            let Some(miter) = (n1 + n2).try_normalize(f32::EPSILON) else {
                continue;
            };
            // Sharp spikes would shoot off to infinity; cap the miter length.
            let length = 1.0 / miter.dot(&n1).max(0.25);
            directions[contour[i] as usize] = miter * length;
        }
    }
    directions
}

fn extrude_glyph(geometry: &mut Geometry, glyph: &Glyph, pen: Vec2, scale: f32, rings: &[Ring]) {
    let points: Vec<Vec2> = glyph.points.iter().map(|p| Vec2::new(p[0], p[1]) * scale + pen).collect();
    let directions = bevel_directions(glyph, &points);
    let at = |index: u32, ring: Ring| {
        let p = points[index as usize] + directions[index as usize] * ring.offset;
        Vec3::new(p.x, p.y, ring.z)
    };

    // Caps use the outermost rings, which sit at the bevel start offset.
    let (Some(&front), Some(&back)) = (rings.first(), rings.last()) else {
        return;
    };
    for (ring, normal) in [(front, -Vec3::z()), (back, Vec3::z())] {
        let base = u32::try_from(geometry.positions.len()).unwrap_or(u32::MAX);
        for index in 0..glyph.points.len() {
            let position = at(index as u32, ring);
            push(geometry, position, normal, [position.x, position.y]);
        }
        for &[a, b, c] in &glyph.triangles {
            if normal.z < 0.0 {
                geometry.indices.extend_from_slice(&[base + a, base + c, base + b]);
            } else {
                geometry.indices.extend_from_slice(&[base + a, base + b, base + c]);
            }
        }
    }

    // Side walls: one flat-shaded quad per contour edge per ring pair
    for contour in &glyph.contours {
        let n = contour.len();
        for i in 0..n {
            let (from, to) = (contour[i], contour[(i + 1) % n]);
            for pair in rings.windows(2) {
                let a = at(from, pair[0]);
                let b = at(to, pair[0]);
                let c = at(to, pair[1]);
                let d = at(from, pair[1]);
                let normal = (b - a)
                    .cross(&(d - a))
                    .try_normalize(f32::EPSILON)
                    .or_else(|| (c - d).cross(&(a - d)).try_normalize(f32::EPSILON))
                    .unwrap_or_else(Vec3::z);

                let along_x = (a.y - b.y).abs() < (a.x - b.x).abs();
                let uv = |p: Vec3| if along_x { [p.x, 1.0 - p.z] } else { [p.y, 1.0 - p.z] };
                let ia = push(geometry, a, normal, uv(a));
                let ib = push(geometry, b, normal, uv(b));
                let ic = push(geometry, c, normal, uv(c));
                let id = push(geometry, d, normal, uv(d));
                geometry.indices.extend_from_slice(&[ia, ib, id, ib, ic, id]);
            }
        }
    }
}
