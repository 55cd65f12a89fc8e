//! Surface construction into an owned mesh record.
//!
//! `MeshBuilder` owns a single `MeshBuffer` and exposes an operation for each
//! kind of surface. Every generation call replaces the contents of the buffer
//! entirely; there is no accumulation across calls. A reference to the buffer
//! is returned so that it can be handed to a renderer.
//!
//! If a call is rejected because of its parameters, the previously generated
//! buffer is left untouched.
//!
//! # Examples
//!
//! ```rust
//! use lattice::builder::MeshBuilder;
//!
//! let mut builder = MeshBuilder::new();
//! builder.generate_cube(1.0, 1.0, 1.0).unwrap();
//! assert_eq!(8, builder.mesh().vertex_count());
//!
//! // Generating again replaces the cube.
//! builder.generate_grid(5, 1.0).unwrap();
//! assert_eq!(36, builder.mesh().vertex_count());
//! ```

use tracing::debug;

use crate::buffer::MeshBuffer;
use crate::primitive::cube::Cuboid;
use crate::primitive::generate::SurfaceGenerator;
use crate::primitive::grid::Grid;
use crate::primitive::plane::Plane;

pub use crate::primitive::generate::{Axis, GenerateError};

/// Builds surfaces into an owned `MeshBuffer`.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    buffer: MeshBuffer,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a subdivided plane spanning $[0, w] \times [0, h]$ in the
    /// $xz$-plane.
    ///
    /// # Errors
    ///
    /// Returns an error if either segment count is zero or if either extent is
    /// not finite.
    pub fn generate_plane(
        &mut self,
        width: f32,
        height: f32,
        width_segments: usize,
        height_segments: usize,
    ) -> Result<&MeshBuffer, GenerateError> {
        let plane = Plane::new(width, height, width_segments, height_segments)?;
        Ok(self.generate(&plane))
    }

    /// Generates a box from eight shared corner vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is not finite.
    pub fn generate_cube(
        &mut self,
        width: f32,
        height: f32,
        depth: f32,
    ) -> Result<&MeshBuffer, GenerateError> {
        let cube = Cuboid::new(width, height, depth)?;
        Ok(self.generate(&cube))
    }

    /// Generates a square grid of `size` by `size` cells.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or if the cell size is not finite.
    pub fn generate_grid(&mut self, size: usize, cell: f32) -> Result<&MeshBuffer, GenerateError> {
        let grid = Grid::new(size, cell)?;
        Ok(self.generate(&grid))
    }

    /// Replaces the buffer with the surface of an arbitrary generator.
    pub fn generate<G>(&mut self, generator: &G) -> &MeshBuffer
    where
        G: SurfaceGenerator,
    {
        self.buffer = generator.to_mesh_buffer();
        debug!(
            vertices = self.buffer.vertex_count(),
            triangles = self.buffer.triangle_count(),
            "generated surface"
        );
        &self.buffer
    }

    pub fn mesh(&self) -> &MeshBuffer {
        &self.buffer
    }

    pub fn into_mesh(self) -> MeshBuffer {
        self.buffer
    }
}
