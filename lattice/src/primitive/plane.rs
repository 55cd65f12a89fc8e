//! Plane primitives.
//!
//! # Examples
//!
//! ```rust
//! use lattice::prelude::*;
//! use lattice::primitive::generate::{Position, TexCoord};
//! use lattice::primitive::plane::Plane;
//! use lattice::E3;
//!
//! let plane = Plane::new(10.0, 10.0, 10, 10).unwrap();
//!
//! let positions = plane.vertices::<Position>().collect::<Vec<_>>();
//! assert_eq!(E3::new(10.0, 0.0, 10.0), positions[positions.len() - 1]);
//! ```

use crate::primitive::generate::{
    ensure_finite, AttributeVertexGenerator, Axis, GenerateError, Generator,
    IndexingTriangleGenerator, Position, TexCoord, TriangleGenerator,
};
use crate::primitive::{into_scalar, Trigon};
use crate::{UvCoordinate, E3};

/// Row-major topology of a subdivided rectangle in the $xz$-plane.
///
/// There are `nu` segments along the $x$-axis (columns) and `nv` segments
/// along the $z$-axis (rows), so `nu + 1` vertices in each of `nv + 1` rows.
/// Each cell is split into two triangles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Segments {
    nu: usize,
    nv: usize,
}

impl Segments {
    pub fn new(nu: usize, nv: usize) -> Result<Self, GenerateError> {
        if nu == 0 {
            Err(GenerateError::ZeroSegments { axis: Axis::X })
        }
        else if nv == 0 {
            Err(GenerateError::ZeroSegments { axis: Axis::Z })
        }
        else {
            // Both counts and all indices must be representable.
            let vertices = nu
                .checked_add(1)
                .zip(nv.checked_add(1))
                .and_then(|(u, v)| u.checked_mul(v));
            let triangles = nu.checked_mul(nv).and_then(|cells| cells.checked_mul(2));
            if vertices.is_some() && triangles.is_some() {
                Ok(Segments { nu, nv })
            }
            else {
                Err(GenerateError::SegmentOverflow { nu, nv })
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        (self.nu + 1) * (self.nv + 1)
    }

    pub fn triangle_count(&self) -> usize {
        self.nu * self.nv * 2
    }

    /// Gets the `(column, row)` of the vertex at the given index.
    pub fn lattice_point(&self, index: usize) -> (usize, usize) {
        assert!(index < self.vertex_count());
        (index % (self.nu + 1), index / (self.nu + 1))
    }

    pub fn uv(&self, index: usize) -> UvCoordinate {
        let (u, v) = self.lattice_point(index);
        UvCoordinate::new(
            into_scalar(u) / into_scalar(self.nu),
            into_scalar(v) / into_scalar(self.nv),
        )
    }

    pub fn indexing_triangle(&self, index: usize) -> Trigon<usize> {
        assert!(index < self.triangle_count());
        let cell = index / 2;
        let (u, v) = (cell % self.nu, cell / self.nu);
        let lower = (v * (self.nu + 1)) + u;
        let upper = lower + self.nu + 1;
        if index % 2 == 0 {
            Trigon::new(lower, upper, lower + 1)
        }
        else {
            Trigon::new(lower + 1, upper, upper + 1)
        }
    }
}

/// Subdivided rectangle spanning $[0, w] \times [0, h]$ in the $xz$-plane.
///
/// Vertices are generated in row-major order beginning at the origin. Texture
/// coordinates span the unit square regardless of the extent of the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    width: f32,
    height: f32,
    segments: Segments,
}

impl Plane {
    /// Creates a plane with the given extent and number of segments along the
    /// $x$-axis (width) and $z$-axis (height).
    ///
    /// # Errors
    ///
    /// Returns an error if either segment count is zero or if either extent is
    /// not finite.
    pub fn new(
        width: f32,
        height: f32,
        width_segments: usize,
        height_segments: usize,
    ) -> Result<Self, GenerateError> {
        Ok(Plane {
            width: ensure_finite("width", width)?,
            height: ensure_finite("height", height)?,
            segments: Segments::new(width_segments, height_segments)?,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn width_segments(&self) -> usize {
        self.segments.nu
    }

    pub fn height_segments(&self) -> usize {
        self.segments.nv
    }
}

impl Default for Plane {
    fn default() -> Self {
        Plane {
            width: 1.0,
            height: 1.0,
            segments: Segments { nu: 1, nv: 1 },
        }
    }
}

impl TriangleGenerator for Plane {
    fn triangle_count(&self) -> usize {
        self.segments.triangle_count()
    }
}

impl IndexingTriangleGenerator for Plane {
    fn indexing_triangle(&self, index: usize) -> Trigon<usize> {
        self.segments.indexing_triangle(index)
    }
}

impl AttributeVertexGenerator<Position> for Plane {
    type Output = E3;

    fn vertex_count(&self) -> usize {
        self.segments.vertex_count()
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        let (u, v) = self.segments.lattice_point(index);
        E3::new(
            into_scalar(u) / into_scalar(self.segments.nu) * self.width,
            0.0,
            into_scalar(v) / into_scalar(self.segments.nv) * self.height,
        )
    }
}

impl AttributeVertexGenerator<TexCoord> for Plane {
    type Output = UvCoordinate;

    fn vertex_count(&self) -> usize {
        self.segments.vertex_count()
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        self.segments.uv(index)
    }
}

impl Generator for Plane {}
