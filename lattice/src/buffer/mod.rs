//! Linear representation of meshes.
//!
//! This module provides a `MeshBuffer` that represents a mesh as linear
//! collections of vertex data and an ordered collection of triangles that
//! index into that vertex data. These buffers are called the _vertex buffers_
//! and _index buffer_, respectively. This layout is well-suited for graphics
//! pipelines.
//!
//! # Vertex Buffers
//!
//! `MeshBuffer`s use _component_ vertex buffers: positions and texture
//! coordinates are stored in separate buffers that share an index space. The
//! $n$th texture coordinate belongs to the $n$th position. Normals are not
//! stored; they are derived from positions and the winding of triangles.
//!
//! # Index Buffers
//!
//! The index buffer is _structured_: each element is a `Trigon` of indices, so
//! the length of the flattened index buffer is always a multiple of three.
//!
//! # Examples
//!
//! Generating a `MeshBuffer` from a plane:
//!
//! ```rust
//! use lattice::buffer::MeshBuffer;
//! use lattice::prelude::*;
//! use lattice::primitive::plane::Plane;
//!
//! let buffer: MeshBuffer = Plane::new(1.0, 1.0, 4, 4).unwrap().to_mesh_buffer();
//! let indices = buffer.as_index_slice();
//! let positions = buffer.as_position_slice();
//! ```
//!
//! Constructing a `MeshBuffer` from raw buffers:
//!
//! ```rust
//! use lattice::buffer::MeshBuffer;
//! use lattice::{UvCoordinate, E3};
//!
//! let buffer = MeshBuffer::from_raw_buffers(
//!     vec![0, 2, 1],
//!     vec![
//!         E3::new(0.0, 0.0, 0.0),
//!         E3::new(1.0, 0.0, 0.0),
//!         E3::new(0.0, 0.0, 1.0),
//!     ],
//!     vec![
//!         UvCoordinate::new(0.0, 0.0),
//!         UvCoordinate::new(1.0, 0.0),
//!         UvCoordinate::new(0.0, 1.0),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(1, buffer.triangle_count());
//! ```

// A consistent `MeshBuffer` never contains an index that is out of bounds of
// its vertex buffers. Generators construct buffers directly and uphold this by
// construction; buffers constructed from external data are validated.

use itertools::Itertools;
use nalgebra::Vector3;
use num::NumCast;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitive::Trigon;
use crate::{UvCoordinate, E3};

#[derive(Debug, Error, PartialEq)]
pub enum BufferError {
    #[error("index {index} into vertex data out of bounds; vertex count is {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("index overflow")]
    IndexOverflow,
    #[error("index buffer of length {len} conflicts with triangle arity")]
    IndexUnaligned { len: usize },
    #[error("conflicting attribute count; {positions} positions but {uvs} texture coordinates")]
    AttributeCountConflict { positions: usize, uvs: usize },
}

/// Linear representation of a triangular mesh.
///
/// A `MeshBuffer` is composed of a position buffer, a texture coordinate
/// buffer, and an index buffer of `Trigon`s. Every index refers to a vertex
/// in the position and texture coordinate buffers, which always have the same
/// length.
///
/// See the module documentation for more information. Deserialization applies
/// the same checks as `from_raw_buffers`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serialize", serde(try_from = "RawMeshBuffer"))]
pub struct MeshBuffer {
    indices: Vec<Trigon<usize>>,
    positions: Vec<E3>,
    uvs: Vec<UvCoordinate>,
}

/// Unvalidated buffers read by a deserializer.
#[cfg(feature = "serialize")]
#[derive(Deserialize)]
struct RawMeshBuffer {
    indices: Vec<Trigon<usize>>,
    positions: Vec<E3>,
    uvs: Vec<UvCoordinate>,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawMeshBuffer> for MeshBuffer {
    type Error = BufferError;

    fn try_from(buffer: RawMeshBuffer) -> Result<Self, Self::Error> {
        let RawMeshBuffer {
            indices,
            positions,
            uvs,
        } = buffer;
        MeshBuffer::from_raw_buffers(
            indices.into_iter().flat_map(|trigon| trigon.into_iter()),
            positions,
            uvs,
        )
    }
}

impl MeshBuffer {
    pub(crate) fn from_raw_buffers_unchecked(
        indices: Vec<Trigon<usize>>,
        positions: Vec<E3>,
        uvs: Vec<UvCoordinate>,
    ) -> Self {
        debug_assert_eq!(positions.len(), uvs.len());
        MeshBuffer {
            indices,
            positions,
            uvs,
        }
    }

    /// Creates an empty `MeshBuffer`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MeshBuffer` from a flat index buffer and vertex buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the length of the index buffer is not a multiple of
    /// three, if the vertex buffers differ in length, or if any index is out
    /// of bounds of the vertex buffers.
    pub fn from_raw_buffers<I, J, K>(indices: I, positions: J, uvs: K) -> Result<Self, BufferError>
    where
        I: IntoIterator<Item = usize>,
        J: IntoIterator<Item = E3>,
        K: IntoIterator<Item = UvCoordinate>,
    {
        let indices = indices.into_iter().collect::<Vec<_>>();
        let positions = positions.into_iter().collect::<Vec<_>>();
        let uvs = uvs.into_iter().collect::<Vec<_>>();
        if indices.len() % 3 != 0 {
            return Err(BufferError::IndexUnaligned { len: indices.len() });
        }
        if positions.len() != uvs.len() {
            return Err(BufferError::AttributeCountConflict {
                positions: positions.len(),
                uvs: uvs.len(),
            });
        }
        let len = positions.len();
        if let Some(index) = indices.iter().find(|index| **index >= len) {
            return Err(BufferError::IndexOutOfBounds { index: *index, len });
        }
        let indices = indices
            .into_iter()
            .tuples()
            .map(|(a, b, c)| Trigon::new(a, b, c))
            .collect();
        Ok(MeshBuffer {
            indices,
            positions,
            uvs,
        })
    }

    pub fn into_raw_buffers(self) -> (Vec<Trigon<usize>>, Vec<E3>, Vec<UvCoordinate>) {
        let MeshBuffer {
            indices,
            positions,
            uvs,
        } = self;
        (indices, positions, uvs)
    }

    /// Gets a slice of the index data.
    pub fn as_index_slice(&self) -> &[Trigon<usize>] {
        self.indices.as_slice()
    }

    /// Gets a slice of the positional data.
    pub fn as_position_slice(&self) -> &[E3] {
        self.positions.as_slice()
    }

    /// Gets a mutable slice of the positional data.
    ///
    /// Positions may be modified freely, but cannot be inserted or removed.
    pub fn as_position_slice_mut(&mut self) -> &mut [E3] {
        self.positions.as_mut_slice()
    }

    /// Gets a slice of the texture coordinate data.
    pub fn as_uv_slice(&self) -> &[UvCoordinate] {
        self.uvs.as_slice()
    }

    /// Gets an iterator over the flattened index buffer.
    pub fn flat_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().flat_map(|trigon| trigon.into_iter())
    }

    /// Converts the flattened index buffer into the given index type.
    ///
    /// This is typically used to upload indices as `u16` or `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error if an index cannot be represented by `N`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::cube::Cuboid;
    ///
    /// let buffer = Cuboid::unit().to_mesh_buffer();
    /// let indices = buffer.to_flat_indices::<u16>().unwrap();
    /// assert_eq!(36, indices.len());
    /// ```
    pub fn to_flat_indices<N>(&self) -> Result<Vec<N>, BufferError>
    where
        N: NumCast,
    {
        self.flat_indices()
            .map(|index| <N as NumCast>::from(index).ok_or(BufferError::IndexOverflow))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }

    /// Removes all vertex and index data.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.positions.clear();
        self.uvs.clear();
    }

    /// Gets an iterator over the triangles of the mesh with positional data.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Trigon<E3>> + '_ {
        self.indices
            .iter()
            .map(move |trigon| trigon.map(|index| self.positions[index]))
    }

    /// Gets the unit normal of each triangle.
    ///
    /// Degenerate triangles have a zero normal.
    pub fn face_normals(&self) -> Vec<Vector3<f32>> {
        self.triangles()
            .map(|trigon| {
                trigon
                    .normal()
                    .map(|normal| normal.into_inner())
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect()
    }

    /// Derives vertex normals from the winding of triangles.
    ///
    /// The normal of each vertex is the normalized sum of the normals of the
    /// triangles that share it, weighted by their area. Vertices that are not
    /// referenced by any non-degenerate triangle have a zero normal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::plane::Plane;
    ///
    /// let buffer = Plane::new(1.0, 1.0, 2, 2).unwrap().to_mesh_buffer();
    /// for normal in buffer.normals() {
    ///     assert_eq!(1.0, normal.y);
    /// }
    /// ```
    pub fn normals(&self) -> Vec<Vector3<f32>> {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for (trigon, indices) in self.triangles().zip(self.indices.iter()) {
            let normal = trigon.area_normal();
            for index in indices.into_iter() {
                normals[index] += normal;
            }
        }
        normals
            .into_iter()
            .map(|normal| normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros))
            .collect()
    }

    /// Maps over the positional data in a `MeshBuffer`.
    ///
    /// # Examples
    ///
    /// Translating the positions of a buffer:
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::cube::Cuboid;
    /// use nalgebra::Vector3;
    ///
    /// let translation = Vector3::<f32>::x() * 2.0;
    /// let buffer = Cuboid::unit()
    ///     .to_mesh_buffer()
    ///     .map_positions(|position| position + translation);
    /// ```
    pub fn map_positions<F>(self, f: F) -> Self
    where
        F: FnMut(E3) -> E3,
    {
        let MeshBuffer {
            indices,
            positions,
            uvs,
        } = self;
        MeshBuffer {
            indices,
            positions: positions.into_iter().map(f).collect(),
            uvs,
        }
    }

    /// Appends the contents of a `MeshBuffer` into another `MeshBuffer`. The
    /// source buffer is drained.
    ///
    /// Indices of the appended triangles are offset by the vertex count of
    /// the destination buffer.
    pub fn append(&mut self, buffer: &mut MeshBuffer) {
        let offset = self.positions.len();
        self.positions.append(&mut buffer.positions);
        self.uvs.append(&mut buffer.uvs);
        self.indices.extend(
            buffer
                .indices
                .drain(..)
                .map(|trigon| trigon.map(|index| index + offset)),
        );
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::buffer::{BufferError, MeshBuffer};
    use crate::prelude::*;
    use crate::primitive::cube::Cuboid;
    use crate::primitive::grid::Grid;
    use crate::primitive::plane::Plane;
    use crate::primitive::Trigon;
    use crate::{UvCoordinate, E3};

    fn triangle() -> (Vec<E3>, Vec<UvCoordinate>) {
        (
            vec![
                E3::new(0.0, 0.0, 0.0),
                E3::new(1.0, 0.0, 0.0),
                E3::new(0.0, 0.0, 1.0),
            ],
            vec![
                UvCoordinate::new(0.0, 0.0),
                UvCoordinate::new(1.0, 0.0),
                UvCoordinate::new(0.0, 1.0),
            ],
        )
    }

    #[test]
    fn from_raw_buffers() {
        let (positions, uvs) = triangle();
        let buffer = MeshBuffer::from_raw_buffers(vec![0, 2, 1], positions, uvs).unwrap();

        assert_eq!(&[Trigon::new(0, 2, 1)], buffer.as_index_slice());
        assert_eq!(3, buffer.vertex_count());
    }

    #[test]
    fn reject_unaligned_indices() {
        let (positions, uvs) = triangle();

        assert_eq!(
            Err(BufferError::IndexUnaligned { len: 4 }),
            MeshBuffer::from_raw_buffers(vec![0, 2, 1, 0], positions, uvs),
        );
    }

    #[test]
    fn reject_out_of_bounds_indices() {
        let (positions, uvs) = triangle();

        assert_eq!(
            Err(BufferError::IndexOutOfBounds { index: 3, len: 3 }),
            MeshBuffer::from_raw_buffers(vec![0, 3, 1], positions, uvs),
        );
    }

    #[test]
    fn reject_attribute_count_conflict() {
        let (positions, mut uvs) = triangle();
        uvs.pop();

        assert_eq!(
            Err(BufferError::AttributeCountConflict {
                positions: 3,
                uvs: 2
            }),
            MeshBuffer::from_raw_buffers(vec![0, 2, 1], positions, uvs),
        );
    }

    #[test]
    fn generated_buffers_are_consistent() {
        let buffers = [
            Plane::new(3.0, 1.0, 7, 2).unwrap().to_mesh_buffer(),
            Grid::new(6, 0.25).unwrap().to_mesh_buffer(),
            Cuboid::new(1.0, 2.0, 3.0).unwrap().to_mesh_buffer(),
        ];
        for buffer in buffers {
            let (indices, positions, uvs) = buffer.clone().into_raw_buffers();
            let rebuilt = MeshBuffer::from_raw_buffers(
                indices.into_iter().flat_map(|trigon| trigon.into_iter()),
                positions,
                uvs,
            )
            .unwrap();

            assert_eq!(buffer, rebuilt);
        }
    }

    #[test]
    fn flat_indices_overflow() {
        let buffer = Grid::new(16, 1.0).unwrap().to_mesh_buffer();

        assert_eq!(16 * 16 * 6, buffer.to_flat_indices::<u16>().unwrap().len());
        assert_eq!(
            Err(BufferError::IndexOverflow),
            buffer.to_flat_indices::<u8>(),
        );
    }

    #[test]
    fn plane_normals() {
        let buffer = Plane::new(2.0, 2.0, 3, 3).unwrap().to_mesh_buffer();

        for normal in buffer.normals() {
            assert_relative_eq!(Vector3::<f32>::y(), normal);
        }
    }

    #[test]
    fn cube_normals_point_away_from_center() {
        let cube = Cuboid::new(1.0, 1.0, 1.0).unwrap();
        let buffer = cube.to_mesh_buffer();
        let normals = buffer.normals();

        assert_eq!(8, normals.len());
        for (position, normal) in buffer.as_position_slice().iter().zip(normals.iter()) {
            assert_relative_eq!(1.0, normal.norm(), epsilon = 1.0e-6);
            assert!(normal.dot(&(*position - cube.center())) > 0.0);
        }
        for (normal, index) in buffer.face_normals().into_iter().zip(0..) {
            assert_relative_eq!(cube.face(index).normal().into_inner(), normal);
        }
    }

    #[test]
    fn unreferenced_vertex_normal_is_zero() {
        let (mut positions, mut uvs) = triangle();
        positions.push(E3::new(5.0, 5.0, 5.0));
        uvs.push(UvCoordinate::new(0.5, 0.5));
        let buffer = MeshBuffer::from_raw_buffers(vec![0, 2, 1], positions, uvs).unwrap();

        assert_eq!(Vector3::zeros(), buffer.normals()[3]);
    }

    #[test]
    fn append_offsets_indices() {
        let mut buffer = Cuboid::unit().to_mesh_buffer();
        let mut plane = Plane::default().to_mesh_buffer();
        buffer.append(&mut plane);

        assert!(plane.is_empty());
        assert_eq!(12, buffer.vertex_count());
        assert_eq!(14, buffer.triangle_count());
        assert_eq!(Trigon::new(8, 10, 9), buffer.as_index_slice()[12]);
    }

    #[test]
    fn clear() {
        let mut buffer = Cuboid::unit().to_mesh_buffer();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(MeshBuffer::new(), buffer);
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn serde_round_trip() {
        let buffer = Cuboid::unit().to_mesh_buffer();
        let json = serde_json::to_string(&buffer).unwrap();

        assert_eq!(buffer, serde_json::from_str::<MeshBuffer>(&json).unwrap());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn deserialize_rejects_inconsistent_buffers() {
        // Conflicting attribute counts with an out of bounds index.
        assert!(serde_json::from_str::<MeshBuffer>(
            r#"{"indices":[[0,1,5]],"positions":[],"uvs":[[0.0,0.0]]}"#
        )
        .is_err());

        let error = serde_json::from_str::<MeshBuffer>(
            r#"{
                "indices": [[0, 1, 5]],
                "positions": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
                "uvs": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
            }"#,
        )
        .unwrap_err();
        assert!(error
            .to_string()
            .starts_with(&BufferError::IndexOutOfBounds { index: 5, len: 3 }.to_string()));

        assert!(serde_json::from_str::<MeshBuffer>(
            r#"{
                "indices": [[0, 1, 2]],
                "positions": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
                "uvs": [[0.0, 0.0], [1.0, 0.0]]
            }"#,
        )
        .is_err());
    }
}
