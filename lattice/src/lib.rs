//! **Lattice** is a library for procedural surface and placement pattern
//! generation.
//!
//! Surfaces like planes, grids, and boxes are described by _generators_ in the
//! `primitive` module and collected into `MeshBuffer`s, which hold a vertex
//! buffer, a texture coordinate buffer, and a triangle index buffer. The
//! `MeshBuilder` type drives these generators and owns the resulting buffer.
//!
//! Placement patterns like grids, circles, spirals, and lines are described by
//! types in the `pattern` module. Patterns produce ordered sequences of points
//! and can drive an injected placement capability once per point.
//!
//! # Examples
//!
//! Generating a subdivided plane and scattering points around it:
//!
//! ```rust
//! use lattice::builder::MeshBuilder;
//! use lattice::pattern::PatternEmitter;
//!
//! let mut builder = MeshBuilder::new();
//! let plane = builder.generate_plane(10.0, 10.0, 10, 10).unwrap();
//! assert_eq!(121, plane.vertex_count());
//!
//! let points = PatternEmitter::new().circle(5.0, 4);
//! assert_eq!(4, points.len());
//! ```
#![allow(unknown_lints)] // Allow clippy lints.

pub mod buffer;
pub mod builder;
pub mod encoding;
pub mod noise;
pub mod pattern;
pub mod primitive;

use nalgebra::{Point2, Point3};

/// Position in three-dimensional Euclidean space.
pub type E3 = Point3<f32>;

/// Texture coordinate.
pub type UvCoordinate = Point2<f32>;

pub mod prelude {
    //! Re-exports commonly used types and traits.
    //!
    //! Importing the contents of this module is recommended when working with
    //! generators and patterns, as those operations are expressed mostly
    //! through traits.

    pub use crate::pattern::{Pattern as _, Place as _};
    pub use crate::primitive::generate::{Generator as _, SurfaceGenerator as _};

    #[cfg(feature = "encoding-ply")]
    pub use crate::encoding::ply::{FromPly as _, ToPly as _};
}
