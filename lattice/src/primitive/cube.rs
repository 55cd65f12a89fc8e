//! Cube primitives.
//!
//! `Cuboid` generates a box from exactly eight corner vertices. Each corner is
//! shared by the three faces that meet there, so per-vertex texture
//! coordinates and derived normals are shared across faces as well. This
//! produces visibly faceted shading and stretched texturing on some faces.
//!
//! # Examples
//!
//! ```rust
//! use lattice::prelude::*;
//! use lattice::primitive::cube::Cuboid;
//! use lattice::primitive::generate::Position;
//!
//! let cube = Cuboid::new(1.0, 2.0, 3.0).unwrap();
//! assert_eq!(8, cube.vertices::<Position>().count());
//! assert_eq!(12, cube.indexing_triangles().count());
//! ```

use nalgebra::{Unit, Vector3};

use crate::primitive::generate::{
    ensure_finite, AttributeVertexGenerator, GenerateError, Generator, IndexingTriangleGenerator,
    Position, TexCoord, TriangleGenerator,
};
use crate::primitive::Trigon;
use crate::{UvCoordinate, E3};

// Each face is formed from two consecutive triangles, in the order of `FACES`.
const TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 1], // front
    [0, 3, 2],
    [5, 7, 6], // back
    [5, 4, 7],
    [3, 5, 2], // top
    [3, 4, 5],
    [1, 6, 0], // bottom
    [0, 6, 7],
    [7, 4, 0], // left
    [0, 4, 3],
    [6, 1, 2], // right
    [6, 2, 5],
];

const FACES: [Face; 6] = [
    Face::Front,
    Face::Back,
    Face::Top,
    Face::Bottom,
    Face::Left,
    Face::Right,
];

const UVS: [(f32, f32); 8] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
    (1.0, 0.0),
    (0.0, 0.0),
];

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Face {
    Front,  // -z
    Back,   // +z
    Top,    // +y
    Bottom, // -y
    Left,   // -x
    Right,  // +x
}

impl Face {
    pub fn normal(self) -> Unit<Vector3<f32>> {
        match self {
            Face::Front => -Vector3::z_axis(),
            Face::Back => Vector3::z_axis(),
            Face::Top => Vector3::y_axis(),
            Face::Bottom => -Vector3::y_axis(),
            Face::Left => -Vector3::x_axis(),
            Face::Right => Vector3::x_axis(),
        }
    }
}

/// Box spanning $[0, w] \times [0, h] \times [0, d]$.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    width: f32,
    height: f32,
    depth: f32,
}

impl Cuboid {
    /// Creates a box with the given extent along the $x$-axis (width),
    /// $y$-axis (height), and $z$-axis (depth).
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is not finite.
    pub fn new(width: f32, height: f32, depth: f32) -> Result<Self, GenerateError> {
        Ok(Cuboid {
            width: ensure_finite("width", width)?,
            height: ensure_finite("height", height)?,
            depth: ensure_finite("depth", depth)?,
        })
    }

    pub fn unit() -> Self {
        Cuboid {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    /// Gets the face of the box that contains the triangle at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the triangle count.
    pub fn face(&self, index: usize) -> Face {
        FACES[index / 2]
    }

    pub fn center(&self) -> E3 {
        E3::new(self.width, self.height, self.depth) / 2.0
    }
}

impl Default for Cuboid {
    fn default() -> Self {
        Cuboid::unit()
    }
}

impl TriangleGenerator for Cuboid {
    fn triangle_count(&self) -> usize {
        TRIANGLES.len()
    }
}

impl IndexingTriangleGenerator for Cuboid {
    fn indexing_triangle(&self, index: usize) -> Trigon<usize> {
        TRIANGLES[index].into()
    }
}

impl AttributeVertexGenerator<Position> for Cuboid {
    type Output = E3;

    fn vertex_count(&self) -> usize {
        8
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        let Cuboid {
            width,
            height,
            depth,
        } = *self;
        match index {
            0 => E3::new(0.0, 0.0, 0.0),
            1 => E3::new(width, 0.0, 0.0),
            2 => E3::new(width, height, 0.0),
            3 => E3::new(0.0, height, 0.0),
            4 => E3::new(0.0, height, depth),
            5 => E3::new(width, height, depth),
            6 => E3::new(width, 0.0, depth),
            7 => E3::new(0.0, 0.0, depth),
            _ => panic!(),
        }
    }
}

impl AttributeVertexGenerator<TexCoord> for Cuboid {
    type Output = UvCoordinate;

    fn vertex_count(&self) -> usize {
        UVS.len()
    }

    fn vertex_from(&self, index: usize) -> Self::Output {
        let (u, v) = UVS[index];
        UvCoordinate::new(u, v)
    }
}

impl Generator for Cuboid {}
