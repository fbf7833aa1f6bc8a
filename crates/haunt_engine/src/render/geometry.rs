//! Geometry attributes and primitive generators
//!
//! Geometry is kept as separate attribute arrays (positions, normals, primary
//! UVs, optional secondary UVs) plus a triangle index list. Interleaving into
//! [`Vertex`] only happens when the render host uploads it.
//!
//! The primitive generators follow the usual retained-mode conventions: boxes
//! and planes are centered on the origin, planes face +Z, cones and spheres are
//! centered on their bounding box, and UVs run 0..1 per face with V pointing up.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{constants::TAU, Vec3};

/// Interleaved vertex layout handed to the render host
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Primary texture coordinates
    pub uv: [f32; 2],
    /// Secondary texture coordinates (ambient occlusion); zero when absent
    pub uv2: [f32; 2],
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Triangle mesh stored as attribute arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Primary UV channel
    pub uvs: Vec<[f32; 2]>,
    /// Secondary UV channel, required by ambient-occlusion maps
    pub uv2: Option<Vec<[f32; 2]>>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

/// Accumulates vertices while a primitive is generated
#[derive(Default)]
struct Builder {
    geometry: Geometry,
}

impl Builder {
    fn push(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.next_index();
        self.geometry.positions.push(position);
        self.geometry.normals.push(normal);
        self.geometry.uvs.push(uv);
        index
    }

    fn next_index(&self) -> u32 {
        u32::try_from(self.geometry.positions.len()).unwrap_or(u32::MAX)
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.geometry.indices.extend_from_slice(&[a, b, c]);
    }

    /// One face of a box, spanned by axes `u` and `v` and offset along `w`
    #[allow(clippy::too_many_arguments)]
    fn box_face(
        &mut self,
        (u, v, w): (usize, usize, usize),
        udir: f32,
        vdir: f32,
        width: f32,
        height: f32,
        depth: f32,
    ) {
        let start = self.next_index();
        let mut normal = [0.0; 3];
        normal[w] = depth.signum();

        for iy in 0..=1u32 {
            let y = iy as f32 * height - height / 2.0;
            for ix in 0..=1u32 {
                let x = ix as f32 * width - width / 2.0;
                let mut position = [0.0; 3];
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = depth / 2.0;
                self.push(position, normal, [ix as f32, 1.0 - iy as f32]);
            }
        }

        let (a, b, c, d) = (start, start + 2, start + 3, start + 1);
        self.triangle(a, b, d);
        self.triangle(b, c, d);
    }
}

impl Geometry {
    /// Axis-aligned box centered on the origin, 24 vertices (4 per face)
    pub fn box_geometry(width: f32, height: f32, depth: f32) -> Self {
        let mut builder = Builder::default();
        let (x, y, z) = (0, 1, 2);
        builder.box_face((z, y, x), -1.0, -1.0, depth, height, width);
        builder.box_face((z, y, x), 1.0, -1.0, depth, height, -width);
        builder.box_face((x, z, y), 1.0, 1.0, width, depth, height);
        builder.box_face((x, z, y), 1.0, -1.0, width, depth, -height);
        builder.box_face((x, y, z), 1.0, -1.0, width, height, depth);
        builder.box_face((x, y, z), -1.0, -1.0, width, height, -depth);
        builder.geometry
    }

    /// Subdivided plane in the XY plane facing +Z
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;

        let mut builder = Builder::default();
        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;
                builder.push(
                    [x, -y, 0.0],
                    [0.0, 0.0, 1.0],
                    [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                );
            }
        }

        let row = grid_x + 1;
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                builder.triangle(a, b, d);
                builder.triangle(b, c, d);
            }
        }
        builder.geometry
    }

    /// UV sphere centered on the origin
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut builder = Builder::default();
        let mut grid = Vec::with_capacity(hs as usize + 1);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Pole vertices sit in the middle of their segment in U
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity(ws as usize + 1);
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let (sin_theta, cos_theta) = (v * std::f32::consts::PI).sin_cos();
                let position = Vec3::new(-radius * cos_phi * sin_theta, radius * cos_theta, radius * sin_phi * sin_theta);
                let normal = position.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
                row.push(builder.push(position.into(), normal.into(), [u + u_offset, 1.0 - v]));
            }
            grid.push(row);
        }

        for iy in 0..hs as usize {
            for ix in 0..ws as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    builder.triangle(a, b, d);
                }
                if iy != hs as usize - 1 {
                    builder.triangle(b, c, d);
                }
            }
        }
        builder.geometry
    }

    /// Closed cone centered on its bounding box, apex up
    ///
    /// With four radial segments this is a square pyramid whose corners lie
    /// on the X and Z axes.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half_height = height / 2.0;
        let slope = radius / height;
        let mut builder = Builder::default();

        // Torso: apex ring then base ring
        let mut rings = [Vec::new(), Vec::new()];
        for (y, ring) in rings.iter_mut().enumerate() {
            let v = y as f32;
            let ring_radius = v * radius;
            for x in 0..=segments {
                let u = x as f32 / segments as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                ring.push(builder.push(
                    [ring_radius * sin, -v * height + half_height, ring_radius * cos],
                    normal.into(),
                    [u, 1.0 - v],
                ));
            }
        }
        for x in 0..segments as usize {
            let b = rings[1][x];
            let c = rings[1][x + 1];
            let d = rings[0][x + 1];
            builder.triangle(b, c, d);
        }

        // Base cap facing down
        let center_start = builder.next_index();
        for _ in 0..segments {
            builder.push([0.0, -half_height, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]);
        }
        let rim_start = builder.next_index();
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            builder.push(
                [radius * sin, -half_height, radius * cos],
                [0.0, -1.0, 0.0],
                [cos * 0.5 + 0.5, -sin * 0.5 + 0.5],
            );
        }
        for x in 0..segments {
            let i = rim_start + x;
            builder.triangle(i + 1, i, center_start + x);
        }
        builder.geometry
    }

    /// Copy the primary UV channel verbatim into the secondary slot
    ///
    /// Ambient-occlusion maps sample the secondary channel; a mesh with an
    /// AO map and no secondary UVs renders without occlusion.
    #[must_use]
    pub fn with_secondary_uv(mut self) -> Self {
        self.uv2 = Some(self.uvs.clone());
        self
    }

    /// Whether the secondary UV channel exists and equals the primary one
    pub fn has_mirrored_uv2(&self) -> bool {
        self.uv2.as_ref().is_some_and(|uv2| *uv2 == self.uvs)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box of all positions; `None` when empty
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut points = self.positions.iter().map(|p| Vec3::from(*p));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
        Some(Aabb { min, max })
    }

    /// Shift every position by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for position in &mut self.positions {
            *position = (Vec3::from(*position) + offset).into();
        }
    }

    /// Move the geometry so its bounding box is centered on the origin
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounding_box() {
            self.translate(-bounds.center());
        }
    }

    /// Interleave attributes for upload
    pub fn vertices(&self) -> Vec<Vertex> {
        (0..self.positions.len())
            .map(|i| Vertex {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                uv: self.uvs.get(i).copied().unwrap_or_default(),
                uv2: self
                    .uv2
                    .as_ref()
                    .and_then(|uv2| uv2.get(i).copied())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Raw bytes of the interleaved vertex buffer
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}
