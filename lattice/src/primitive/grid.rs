//! Grid primitives.
//!
//! A grid is a square plane whose extent is derived from a cell size rather
//! than given directly. Grids share their topology with `Plane`.
//!
//! # Examples
//!
//! ```rust
//! use lattice::buffer::MeshBuffer;
//! use lattice::prelude::*;
//! use lattice::primitive::grid::Grid;
//!
//! let buffer: MeshBuffer = Grid::new(5, 1.0).unwrap().to_mesh_buffer();
//! assert_eq!(36, buffer.vertex_count());
//! ```

use crate::primitive::generate::{
    ensure_finite, AttributeVertexGenerator, GenerateError, Generator, IndexingTriangleGenerator,
    Position, TexCoord, TriangleGenerator,
};
use crate::primitive::plane::Segments;
use crate::primitive::{into_scalar, Trigon};
use crate::{UvCoordinate, E3};

/// Square grid of `size` by `size` cells in the $xz$-plane.
///
/// The vertex in column $c$ and row $r$ is positioned at $(cs, 0, rs)$ where
/// $s$ is the cell size. Texture coordinates span the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    size: usize,
    cell: f32,
    segments: Segments,
}

impl Grid {
    /// Creates a grid with `size` cells along each axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or if the cell size is not finite.
    pub fn new(size: usize, cell: f32) -> Result<Self, GenerateError> {
        Ok(Grid {
            size,
            cell: ensure_finite("cell", cell)?,
            segments: Segments::new(size, size)?,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }
}

impl TriangleGenerator for Grid {
    fn triangle_count(&self) -> usize {
        self.segments.triangle_count()
    }
}

impl IndexingTriangleGenerator for Grid {
    fn indexing_triangle(&self, index: usize) -> Trigon<usize> {
        self.segments.indexing_triangle(index)
    }
}

impl AttributeVertexGenerator<Position> for Grid {
    type Output = E3;

    fn vertex_count(&self) -> usize {
        self.segments.vertex_count()
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        let (u, v) = self.segments.lattice_point(index);
        E3::new(into_scalar(u) * self.cell, 0.0, into_scalar(v) * self.cell)
    }
}

impl AttributeVertexGenerator<TexCoord> for Grid {
    type Output = UvCoordinate;

    fn vertex_count(&self) -> usize {
        self.segments.vertex_count()
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        self.segments.uv(index)
    }
}

impl Generator for Grid {}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::prelude::*;
    use crate::primitive::generate::{Axis, GenerateError, Position, TexCoord};
    use crate::primitive::grid::Grid;
    use crate::primitive::plane::Plane;
    use crate::{UvCoordinate, E3};

    #[test]
    fn cell_spacing() {
        let grid = Grid::new(5, 0.5).unwrap();
        let positions = grid.vertices::<Position>().collect::<Vec<_>>();

        assert_eq!(36, positions.len());
        assert_eq!(E3::new(0.5, 0.0, 0.0), positions[1]);
        assert_eq!(E3::new(0.0, 0.0, 0.5), positions[6]);
        assert_eq!(E3::new(2.5, 0.0, 2.5), positions[35]);
    }

    #[test]
    fn uvs_normalized_by_size() {
        let grid = Grid::new(4, 3.0).unwrap();
        let uvs = grid.vertices::<TexCoord>().collect::<Vec<_>>();

        assert_eq!(UvCoordinate::new(0.25, 0.0), uvs[1]);
        assert_eq!(UvCoordinate::new(1.0, 1.0), uvs[24]);
    }

    #[test]
    fn topology_matches_plane() {
        let grid = Grid::new(3, 2.0).unwrap();
        let plane = Plane::new(6.0, 6.0, 3, 3).unwrap();

        assert!(grid.indexing_triangles().eq(plane.indexing_triangles()));
        for (a, b) in grid
            .vertices::<Position>()
            .zip(plane.vertices::<Position>())
        {
            assert_relative_eq!(a, b);
        }
    }

    #[test]
    fn reject_zero_size() {
        assert_eq!(
            Err(GenerateError::ZeroSegments { axis: Axis::X }),
            Grid::new(0, 1.0),
        );
    }

    #[test]
    fn reject_overflowing_size() {
        assert_eq!(
            Err(GenerateError::SegmentOverflow {
                nu: usize::MAX,
                nv: usize::MAX
            }),
            Grid::new(usize::MAX, 1.0),
        );
        assert!(Grid::new(1 << (usize::BITS / 2), 1.0).is_err());
    }
}
