//! Surface generation.
//!
//! This module provides a generic iterator and traits for generating streams
//! of geometric and topological data for parametric surfaces like planes,
//! grids, and boxes.
//!
//! The primary API of this module is exposed by the `Generator` trait. The
//! `SurfaceGenerator` trait combines the attributes required to collect a
//! generator into a `MeshBuffer`.

use std::fmt::{self, Display, Formatter};
use std::ops::Range;
use thiserror::Error;

use crate::buffer::MeshBuffer;
use crate::primitive::Trigon;
use crate::{UvCoordinate, E3};

/// Axis along which a surface is subdivided.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    X,
    Z,
}

impl Display for Axis {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(formatter, "x"),
            Axis::Z => write!(formatter, "z"),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("segment count along the {axis}-axis must be non-zero")]
    ZeroSegments { axis: Axis },
    #[error("parameter `{parameter}` must be finite")]
    NonFinite { parameter: &'static str },
    #[error("{nu} by {nv} segments exceed the addressable vertex and triangle counts")]
    SegmentOverflow { nu: usize, nv: usize },
}

pub(crate) fn ensure_finite(parameter: &'static str, value: f32) -> Result<f32, GenerateError> {
    if value.is_finite() {
        Ok(value)
    }
    else {
        Err(GenerateError::NonFinite { parameter })
    }
}

/// Geometric attribute.
///
/// Types implementing this trait can be used with `Generator` to query
/// geometric attributes. For example, the `Position` type can be used to get
/// positional data for planes or boxes via `Plane` and `Cuboid`.
pub trait Attribute {}

/// Meta-attribute for positions.
///
/// Describes the position of vertices in a surface as `E3` points.
pub struct Position;

impl Attribute for Position {}

/// Meta-attribute for texture coordinates.
///
/// Describes the $uv$-coordinates of vertices in a surface. Texture
/// coordinates share the index space of positions: the $n$th texture
/// coordinate belongs to the $n$th position.
pub struct TexCoord;

impl Attribute for TexCoord {}

pub struct Generate<'a, G, P>
where
    G: 'a,
{
    generator: &'a G,
    range: Range<usize>,
    f: fn(&'a G, usize) -> P,
}

impl<'a, G, P> Generate<'a, G, P>
where
    G: 'a,
{
    pub(crate) fn new(generator: &'a G, n: usize, f: fn(&'a G, usize) -> P) -> Self {
        Generate {
            generator,
            range: 0..n,
            f,
        }
    }
}

impl<'a, G, P> Iterator for Generate<'a, G, P>
where
    G: 'a,
{
    type Item = P;

    fn next(&mut self) -> Option<Self::Item> {
        self.range
            .next()
            .map(|index| (self.f)(self.generator, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<'a, G, P> ExactSizeIterator for Generate<'a, G, P> where G: 'a {}

pub trait TriangleGenerator {
    fn triangle_count(&self) -> usize;
}

pub trait AttributeVertexGenerator<A>
where
    A: Attribute,
{
    type Output;

    fn vertex_count(&self) -> usize;

    fn vertex_from(&self, index: usize) -> Self::Output;
}

pub trait IndexingTriangleGenerator: TriangleGenerator {
    /// Gets the triangle at the given index as indices into the vertices of
    /// the generator.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the triangle count.
    fn indexing_triangle(&self, index: usize) -> Trigon<usize>;
}

/// Functions for iterating over the topological structures of generators.
pub trait Generator: Sized {
    /// Provides an iterator over the vertices with the given attribute data.
    ///
    /// This can be paired with the `indexing_triangles` function to index the
    /// set of vertices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::cube::Cuboid;
    /// use lattice::primitive::generate::{Position, TexCoord};
    ///
    /// let cube = Cuboid::default();
    ///
    /// let positions = cube.vertices::<Position>().collect::<Vec<_>>();
    /// let uvs = cube.vertices::<TexCoord>().collect::<Vec<_>>();
    /// assert_eq!(positions.len(), uvs.len());
    /// ```
    fn vertices<A>(&self) -> Generate<'_, Self, <Self as AttributeVertexGenerator<A>>::Output>
    where
        Self: AttributeVertexGenerator<A>,
        A: Attribute,
    {
        Generate::new(
            self,
            <Self as AttributeVertexGenerator<A>>::vertex_count(self),
            <Self as AttributeVertexGenerator<A>>::vertex_from,
        )
    }

    /// Provides an iterator over triangles that index the vertices of the
    /// generator.
    fn indexing_triangles(&self) -> Generate<'_, Self, Trigon<usize>>
    where
        Self: IndexingTriangleGenerator,
    {
        Generate::new(self, self.triangle_count(), |generator, index| {
            generator.indexing_triangle(index)
        })
    }

    /// Provides an iterator over triangles with the given attribute data.
    ///
    /// Vertex data is duplicated for each triangle that shares it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::generate::Position;
    /// use lattice::primitive::grid::Grid;
    ///
    /// let grid = Grid::new(2, 1.0).unwrap();
    /// for trigon in grid.triangles::<Position>() {
    ///     assert!(trigon.normal().unwrap().y > 0.0);
    /// }
    /// ```
    fn triangles<A>(
        &self,
    ) -> Generate<'_, Self, Trigon<<Self as AttributeVertexGenerator<A>>::Output>>
    where
        Self: AttributeVertexGenerator<A> + IndexingTriangleGenerator,
        A: Attribute,
    {
        Generate::new(self, self.triangle_count(), |generator, index| {
            generator
                .indexing_triangle(index)
                .map(|index| <Self as AttributeVertexGenerator<A>>::vertex_from(generator, index))
        })
    }
}

/// Generator with the positional, texture, and topological data required to
/// form a `MeshBuffer`.
///
/// This trait is implemented for all types that satisfy its bounds.
pub trait SurfaceGenerator:
    Generator
    + AttributeVertexGenerator<Position, Output = E3>
    + AttributeVertexGenerator<TexCoord, Output = UvCoordinate>
    + IndexingTriangleGenerator
{
    /// Collects the generator into a `MeshBuffer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice::prelude::*;
    /// use lattice::primitive::plane::Plane;
    ///
    /// let buffer = Plane::new(4.0, 2.0, 4, 2).unwrap().to_mesh_buffer();
    /// assert_eq!(15, buffer.vertex_count());
    /// assert_eq!(16, buffer.triangle_count());
    /// ```
    fn to_mesh_buffer(&self) -> MeshBuffer {
        MeshBuffer::from_raw_buffers_unchecked(
            self.indexing_triangles().collect(),
            self.vertices::<Position>().collect(),
            self.vertices::<TexCoord>().collect(),
        )
    }
}

impl<G> SurfaceGenerator for G where
    G: Generator
        + AttributeVertexGenerator<Position, Output = E3>
        + AttributeVertexGenerator<TexCoord, Output = UvCoordinate>
        + IndexingTriangleGenerator
{
}
