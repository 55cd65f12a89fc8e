//! Primitive topological structures and surface generators.
//!
//! This module provides the `Trigon` type, which describes a triangle over
//! arbitrary vertex data, and [generators][`generate`] for parametric
//! surfaces. Lattice uses the term _trigon_ for its triangle type. In some
//! contexts, such as index buffers, the term _triangle_ is still used.
//!
//! `Trigon`s are used both geometrically and topologically: a `Trigon<E3>`
//! describes a triangle in space while a `Trigon<usize>` indexes into a
//! vertex buffer.
//!
//! # Examples
//!
//! Generating raw buffers with positional data of a [plane][`Plane`]:
//!
//! ```rust
//! use lattice::prelude::*;
//! use lattice::primitive::generate::Position;
//! use lattice::primitive::plane::Plane;
//!
//! let plane = Plane::new(2.0, 2.0, 2, 2).unwrap();
//! let positions = plane.vertices::<Position>().collect::<Vec<_>>();
//! let indices = plane.indexing_triangles().collect::<Vec<_>>();
//!
//! assert_eq!(9, positions.len());
//! assert_eq!(8, indices.len());
//! ```
//!
//! [`generate`]: crate::primitive::generate
//! [`Plane`]: crate::primitive::plane::Plane

pub mod cube;
pub mod generate;
pub mod grid;
pub mod plane;

use nalgebra::{Unit, Vector3};
use num::{NumCast, ToPrimitive};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::E3;

/// Triangle.
///
/// The order of vertices determines the winding of the triangle. The cross
/// product $(b - a) \times (c - a)$ of a positional `Trigon` points along the
/// outward normal of its face.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct Trigon<T>(pub [T; 3]);

impl<T> Trigon<T> {
    pub fn new(a: T, b: T, c: T) -> Self {
        Trigon([a, b, c])
    }

    pub fn into_array(self) -> [T; 3] {
        self.0
    }

    pub fn map<U, F>(self, f: F) -> Trigon<U>
    where
        F: FnMut(T) -> U,
    {
        Trigon(self.0.map(f))
    }
}

impl Trigon<E3> {
    /// Gets the unnormalized normal of the triangle.
    ///
    /// The magnitude of the vector is twice the area of the triangle, so
    /// summing these vectors weights each triangle by its area.
    pub fn area_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.0;
        (b - a).cross(&(c - a))
    }

    /// Gets the unit normal of the triangle.
    ///
    /// Returns `None` if the triangle is degenerate (collinear or converged).
    pub fn normal(&self) -> Option<Unit<Vector3<f32>>> {
        Unit::try_new(self.area_normal(), f32::EPSILON)
    }

    pub fn centroid(&self) -> E3 {
        let [a, b, c] = self.0;
        E3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

impl<T> AsRef<[T]> for Trigon<T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> AsMut<[T]> for Trigon<T> {
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T> From<[T; 3]> for Trigon<T> {
    fn from(array: [T; 3]) -> Self {
        Trigon(array)
    }
}

impl<T> From<(T, T, T)> for Trigon<T> {
    fn from((a, b, c): (T, T, T)) -> Self {
        Trigon::new(a, b, c)
    }
}

impl<T> Index<usize> for Trigon<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for Trigon<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<T> IntoIterator for Trigon<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 3>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Counts and indices are converted into scalars when computing positions and
// texture coordinates. Integers always have an `f32` representation (possibly
// rounded), so this conversion never fails.
pub(crate) fn into_scalar<T>(value: T) -> f32
where
    T: ToPrimitive,
{
    <f32 as NumCast>::from(value).expect("integer has no scalar representation")
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::primitive::Trigon;
    use crate::E3;

    #[test]
    fn map_preserves_order() {
        let trigon = Trigon::new(1usize, 2, 3).map(|index| index * 10);

        assert_eq!([10, 20, 30], trigon.into_array());
    }

    #[test]
    fn normal_follows_winding() {
        let trigon = Trigon::new(
            E3::new(0.0, 0.0, 0.0),
            E3::new(0.0, 0.0, 1.0),
            E3::new(1.0, 0.0, 0.0),
        );

        assert_relative_eq!(Vector3::<f32>::y(), trigon.normal().unwrap().into_inner());
        assert_relative_eq!(1.0, trigon.area_normal().norm());
    }

    #[test]
    fn degenerate_normal() {
        let trigon = Trigon::new(
            E3::new(0.0, 0.0, 0.0),
            E3::new(1.0, 0.0, 0.0),
            E3::new(2.0, 0.0, 0.0),
        );

        assert!(trigon.normal().is_none());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn serialize_as_array() {
        let trigon = Trigon::new(0usize, 2, 1);

        assert_eq!("[0,2,1]", serde_json::to_string(&trigon).unwrap());
        assert_eq!(
            trigon,
            serde_json::from_str::<Trigon<usize>>("[0,2,1]").unwrap()
        );
        assert!(serde_json::from_str::<Trigon<usize>>("[0,2]").is_err());
    }
}
