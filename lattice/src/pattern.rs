//! Placement patterns.
//!
//! Patterns compute ordered sequences of points in the $xz$-plane (or along an
//! arbitrary segment for `Line`). Points carry no identity beyond their
//! position and order. A sequence can be collected, iterated lazily via the
//! `Pattern` trait, or fed to a placement capability that instantiates
//! something at each point.
//!
//! | Pattern  | Points                | Position of point $i$                          |
//! |----------|-----------------------|------------------------------------------------|
//! | `Grid`   | `rows * columns`      | $(cs, 0, rs)$, row-major                       |
//! | `Circle` | `count`               | $r(\cos\theta, 0, \sin\theta)$                 |
//! | `Spiral` | `count`               | $(r + is)(\cos\theta, 0, \sin\theta)$          |
//! | `Line`   | `count`               | $a + t(b - a)$ with $t = i / (n - 1)$          |
//!
//! Patterns are plain data and are not validated. Non-finite radii, spacings,
//! and endpoints pass through the arithmetic above unchanged, so the points of
//! such a pattern may have infinite or NaN coordinates. The number of points
//! never depends on these parameters. Placements that require finite positions
//! should reject them by returning an error.
//!
//! # Examples
//!
//! Collecting a circle of points:
//!
//! ```rust
//! use lattice::pattern::PatternEmitter;
//!
//! let points = PatternEmitter::new().circle(5.0, 8);
//! assert_eq!(8, points.len());
//! ```
//!
//! Placing objects along a line with a closure:
//!
//! ```rust
//! use lattice::pattern::{Line, Pattern};
//! use lattice::E3;
//!
//! let mut scene = Vec::new();
//! let line = Line::new(E3::origin(), E3::new(10.0, 0.0, 0.0), 3);
//! let handles = line
//!     .spawn(|position: E3| -> Result<usize, ()> {
//!         scene.push(position);
//!         Ok(scene.len() - 1)
//!     })
//!     .unwrap();
//! assert_eq!(vec![0, 1, 2], handles);
//! ```

use std::f32::consts::TAU;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::primitive::generate::Generate;
use crate::primitive::into_scalar;
use crate::E3;

/// Lazy iterator over the points of a pattern.
pub type Points<'a, P> = Generate<'a, P, E3>;

/// Placement capability.
///
/// A placement instantiates something at a position and returns a handle to
/// it. Any `FnMut(E3) -> Result<H, E>` is a placement.
pub trait Place {
    type Handle;
    type Error;

    fn place(&mut self, position: E3) -> Result<Self::Handle, Self::Error>;
}

impl<F, H, E> Place for F
where
    F: FnMut(E3) -> Result<H, E>,
{
    type Handle = H;
    type Error = E;

    fn place(&mut self, position: E3) -> Result<Self::Handle, Self::Error> {
        (self)(position)
    }
}

/// Failure of a placement while spawning a pattern.
///
/// Placement stops at the first failure. Handles that were placed before the
/// failure are not undone and are returned here.
#[derive(Debug, Error)]
#[error("placement failed at point {index} after {} points were placed", .placed.len())]
pub struct SpawnError<H, E> {
    /// Index of the point that could not be placed.
    pub index: usize,
    /// Handles of the points that were placed before the failure.
    pub placed: Vec<H>,
    pub source: E,
}

impl<H, E> SpawnError<H, E> {
    pub fn into_placed(self) -> Vec<H> {
        self.placed
    }
}

/// Ordered sequence of points.
pub trait Pattern: Sized {
    fn point_count(&self) -> usize;

    /// Gets the point at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the point count.
    fn point_from(&self, index: usize) -> E3;

    fn points(&self) -> Points<'_, Self> {
        Generate::new(self, self.point_count(), Self::point_from)
    }

    fn to_points(&self) -> Vec<E3> {
        self.points().collect()
    }

    /// Invokes a placement once for each point, in order.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as the placement fails. No further points are
    /// placed and the handles placed so far are returned in the error.
    fn spawn<P>(&self, mut placement: P) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        P: Place,
    {
        let mut placed = Vec::with_capacity(self.point_count());
        for (index, position) in self.points().enumerate() {
            match placement.place(position) {
                Ok(handle) => placed.push(handle),
                Err(source) => {
                    warn!(index, placed = placed.len(), "placement failed");
                    return Err(SpawnError {
                        index,
                        placed,
                        source,
                    });
                }
            }
        }
        Ok(placed)
    }
}

/// Rectangular lattice of points in the $xz$-plane.
///
/// Points are ordered by row and then by column. The point count saturates
/// at `usize::MAX` when `rows * columns` is not representable.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub spacing: f32,
}

impl Grid {
    pub fn new(rows: usize, columns: usize, spacing: f32) -> Self {
        Grid {
            rows,
            columns,
            spacing,
        }
    }
}

impl Pattern for Grid {
    fn point_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    fn point_from(&self, index: usize) -> E3 {
        assert!(index < self.point_count());
        let (row, column) = (index / self.columns, index % self.columns);
        E3::new(
            into_scalar(column) * self.spacing,
            0.0,
            into_scalar(row) * self.spacing,
        )
    }
}

/// Points evenly distributed on a circle about the origin.
///
/// The first point lies on the positive $x$-axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct Circle {
    pub radius: f32,
    pub count: usize,
}

impl Circle {
    pub fn new(radius: f32, count: usize) -> Self {
        Circle { radius, count }
    }
}

impl Pattern for Circle {
    fn point_count(&self) -> usize {
        self.count
    }

    fn point_from(&self, index: usize) -> E3 {
        assert!(index < self.count);
        let angle = into_scalar(index) * TAU / into_scalar(self.count);
        E3::new(
            self.radius * angle.cos(),
            0.0,
            self.radius * angle.sin(),
        )
    }
}

/// Points on a spiral about the origin.
///
/// The points sweep `turns` full revolutions. The distance from the origin
/// begins at `radius` and grows by `spacing` with each point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct Spiral {
    pub turns: u32,
    pub radius: f32,
    pub spacing: f32,
    pub count: usize,
}

impl Spiral {
    pub fn new(turns: u32, radius: f32, spacing: f32, count: usize) -> Self {
        Spiral {
            turns,
            radius,
            spacing,
            count,
        }
    }
}

impl Pattern for Spiral {
    fn point_count(&self) -> usize {
        self.count
    }

    fn point_from(&self, index: usize) -> E3 {
        assert!(index < self.count);
        let index = into_scalar(index);
        let angle = index * TAU * into_scalar(self.turns) / into_scalar(self.count);
        let radius = self.radius + (index * self.spacing);
        E3::new(radius * angle.cos(), 0.0, radius * angle.sin())
    }
}

/// Points evenly distributed on a segment, including its endpoints.
///
/// A line with a single point yields only its start.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct Line {
    pub start: E3,
    pub end: E3,
    pub count: usize,
}

impl Line {
    pub fn new(start: E3, end: E3, count: usize) -> Self {
        Line { start, end, count }
    }
}

impl Pattern for Line {
    fn point_count(&self) -> usize {
        self.count
    }

    fn point_from(&self, index: usize) -> E3 {
        assert!(index < self.count);
        if self.count == 1 {
            self.start
        }
        else {
            let t = into_scalar(index) / into_scalar(self.count - 1);
            self.start + ((self.end - self.start) * t)
        }
    }
}

/// Computes placement patterns.
///
/// `PatternEmitter` is a convenience over the pattern types of this module:
/// each function computes a fresh sequence or drives a placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternEmitter;

impl PatternEmitter {
    pub fn new() -> Self {
        PatternEmitter
    }

    pub fn grid(&self, rows: usize, columns: usize, spacing: f32) -> Vec<E3> {
        self.emit(&Grid::new(rows, columns, spacing))
    }

    pub fn circle(&self, radius: f32, count: usize) -> Vec<E3> {
        self.emit(&Circle::new(radius, count))
    }

    pub fn spiral(&self, turns: u32, radius: f32, spacing: f32, count: usize) -> Vec<E3> {
        self.emit(&Spiral::new(turns, radius, spacing, count))
    }

    pub fn line(&self, start: E3, end: E3, count: usize) -> Vec<E3> {
        self.emit(&Line::new(start, end, count))
    }

    pub fn spawn_grid<P>(
        &self,
        rows: usize,
        columns: usize,
        spacing: f32,
        placement: P,
    ) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        P: Place,
    {
        self.spawn(&Grid::new(rows, columns, spacing), placement)
    }

    pub fn spawn_circle<P>(
        &self,
        radius: f32,
        count: usize,
        placement: P,
    ) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        P: Place,
    {
        self.spawn(&Circle::new(radius, count), placement)
    }

    pub fn spawn_spiral<P>(
        &self,
        turns: u32,
        radius: f32,
        spacing: f32,
        count: usize,
        placement: P,
    ) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        P: Place,
    {
        self.spawn(&Spiral::new(turns, radius, spacing, count), placement)
    }

    pub fn spawn_line<P>(
        &self,
        start: E3,
        end: E3,
        count: usize,
        placement: P,
    ) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        P: Place,
    {
        self.spawn(&Line::new(start, end, count), placement)
    }

    fn emit<T>(&self, pattern: &T) -> Vec<E3>
    where
        T: Pattern,
    {
        let points = pattern.to_points();
        debug!(points = points.len(), "emitted pattern");
        points
    }

    fn spawn<T, P>(
        &self,
        pattern: &T,
        placement: P,
    ) -> Result<Vec<P::Handle>, SpawnError<P::Handle, P::Error>>
    where
        T: Pattern,
        P: Place,
    {
        let placed = pattern.spawn(placement)?;
        debug!(placed = placed.len(), "spawned pattern");
        Ok(placed)
    }
}
