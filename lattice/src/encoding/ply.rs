//! [PLY](https://en.wikipedia.org/wiki/PLY_(file_format)) encoding.
//!
//! This module provides support for the PLY format via the `FromPly` and
//! `ToPly` traits, which read and write `MeshBuffer`s.
//!
//! Buffers are written as ASCII PLY with a `vertex` element and a `face`
//! element. Vertices have `x`, `y`, and `z` position properties and `s` and
//! `t` texture coordinate properties. Faces have a `vertex_indices` list
//! property. When reading, texture coordinates are optional and default to the
//! origin, and every face must be a triangle.
//!
//! PLY support is implemented using the
//! [`ply-rs`](https://crates.io/crates/ply-rs) crate.
//!
//! # Examples
//!
//! Writing a cube and reading it back:
//!
//! ```rust
//! use lattice::buffer::MeshBuffer;
//! use lattice::prelude::*;
//! use lattice::primitive::cube::Cuboid;
//!
//! let cube = Cuboid::unit().to_mesh_buffer();
//!
//! let mut ply = Vec::new();
//! cube.to_ply(&mut ply).unwrap();
//!
//! let buffer = MeshBuffer::from_ply(ply.as_slice()).unwrap();
//! assert_eq!(cube, buffer);
//! ```

#![cfg(feature = "encoding-ply")]

use num::cast;
use num::NumCast;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use std::io::{self, Read, Write};
use std::iter::FromIterator;
use thiserror::Error;
use tracing::debug;

use crate::buffer::{BufferError, MeshBuffer};
use crate::{UvCoordinate, E3};

type Element = DefaultElement;

const VERTEX: &str = "vertex";
const FACE: &str = "face";
const FACE_INDICES: &str = "vertex_indices";
const FACE_INDICES_ALIAS: &str = "vertex_index";

#[derive(Debug, Error)]
pub enum PlyError {
    #[error("element `{0}` not found")]
    ElementNotFound(&'static str),
    #[error("property `{0}` not found")]
    PropertyNotFound(String),
    #[error("face with {arity} vertices is not a triangle")]
    ArityConflict { arity: usize },
    #[error("property value cannot be represented")]
    Encoding,
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

trait ElementExt {
    fn read_scalar<T>(&self, key: &str) -> Result<T, PlyError>
    where
        T: NumCast;

    fn read_list<T, I>(&self, keys: &[&str]) -> Result<I, PlyError>
    where
        T: NumCast,
        I: FromIterator<T>;
}

impl ElementExt for Element {
    fn read_scalar<T>(&self, key: &str) -> Result<T, PlyError>
    where
        T: NumCast,
    {
        self.get(key)
            .ok_or_else(|| PlyError::PropertyNotFound(key.to_owned()))?
            .clone()
            .into_scalar()
    }

    // Reads the first of the given keys that is present.
    fn read_list<T, I>(&self, keys: &[&str]) -> Result<I, PlyError>
    where
        T: NumCast,
        I: FromIterator<T>,
    {
        keys.iter()
            .find_map(|key| self.get(*key))
            .ok_or_else(|| PlyError::PropertyNotFound(keys.join("|")))?
            .clone()
            .into_list()
    }
}

trait PropertyExt {
    fn into_scalar<T>(self) -> Result<T, PlyError>
    where
        T: NumCast;

    fn into_list<T, I>(self) -> Result<I, PlyError>
    where
        T: NumCast,
        I: FromIterator<T>;
}

impl PropertyExt for Property {
    fn into_scalar<T>(self) -> Result<T, PlyError>
    where
        T: NumCast,
    {
        match self {
            Property::Char(value) => num_cast_scalar(value),
            Property::UChar(value) => num_cast_scalar(value),
            Property::Short(value) => num_cast_scalar(value),
            Property::UShort(value) => num_cast_scalar(value),
            Property::Int(value) => num_cast_scalar(value),
            Property::UInt(value) => num_cast_scalar(value),
            Property::Float(value) => num_cast_scalar(value),
            Property::Double(value) => num_cast_scalar(value),
            _ => Err(PlyError::Encoding),
        }
    }

    fn into_list<T, I>(self) -> Result<I, PlyError>
    where
        T: NumCast,
        I: FromIterator<T>,
    {
        match self {
            Property::ListChar(values) => num_cast_list(values),
            Property::ListUChar(values) => num_cast_list(values),
            Property::ListShort(values) => num_cast_list(values),
            Property::ListUShort(values) => num_cast_list(values),
            Property::ListInt(values) => num_cast_list(values),
            Property::ListUInt(values) => num_cast_list(values),
            Property::ListFloat(values) => num_cast_list(values),
            Property::ListDouble(values) => num_cast_list(values),
            _ => Err(PlyError::Encoding),
        }
    }
}

pub trait FromPly: Sized {
    /// Reads a mesh from PLY data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be parsed, if the `vertex` or
    /// `face` elements or their required properties are missing, if any face
    /// is not a triangle, or if the decoded buffers are inconsistent.
    fn from_ply<R>(read: R) -> Result<Self, PlyError>
    where
        R: Read;
}

pub trait ToPly {
    /// Writes a mesh as ASCII PLY data and returns the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if an index cannot be represented as a `uint` or if
    /// writing fails.
    fn to_ply<W>(&self, write: W) -> Result<usize, PlyError>
    where
        W: Write;
}

impl FromPly for MeshBuffer {
    fn from_ply<R>(mut read: R) -> Result<Self, PlyError>
    where
        R: Read,
    {
        let ply = Parser::<Element>::new().read_ply(&mut read)?;
        let vertex = ply
            .header
            .elements
            .get(VERTEX)
            .ok_or(PlyError::ElementNotFound(VERTEX))?;
        if !ply.header.elements.contains_key(FACE) {
            return Err(PlyError::ElementNotFound(FACE));
        }
        let uv_keys = [("s", "t"), ("u", "v")].into_iter().find(|(u, v)| {
            vertex.properties.contains_key(*u) && vertex.properties.contains_key(*v)
        });
        let vertices = elements(&ply, VERTEX);
        let faces = elements(&ply, FACE);

        let positions = vertices
            .iter()
            .map(|element| {
                Ok(E3::new(
                    element.read_scalar("x")?,
                    element.read_scalar("y")?,
                    element.read_scalar("z")?,
                ))
            })
            .collect::<Result<Vec<_>, PlyError>>()?;
        let uvs = match uv_keys {
            Some((u, v)) => vertices
                .iter()
                .map(|element| {
                    Ok(UvCoordinate::new(
                        element.read_scalar(u)?,
                        element.read_scalar(v)?,
                    ))
                })
                .collect::<Result<Vec<_>, PlyError>>()?,
            None => vec![UvCoordinate::origin(); positions.len()],
        };
        let indices = faces
            .iter()
            .map(|element| {
                let indices =
                    element.read_list::<usize, Vec<_>>(&[FACE_INDICES, FACE_INDICES_ALIAS])?;
                if indices.len() == 3 {
                    Ok(indices)
                }
                else {
                    Err(PlyError::ArityConflict {
                        arity: indices.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>, PlyError>>()?;
        let buffer = MeshBuffer::from_raw_buffers(indices.into_iter().flatten(), positions, uvs)?;
        debug!(
            vertices = buffer.vertex_count(),
            triangles = buffer.triangle_count(),
            "decoded PLY"
        );
        Ok(buffer)
    }
}

impl ToPly for MeshBuffer {
    fn to_ply<W>(&self, mut write: W) -> Result<usize, PlyError>
    where
        W: Write,
    {
        let mut ply = Ply::<Element>::new();
        ply.header.encoding = Encoding::Ascii;
        ply.header.comments.push("generated by lattice".to_owned());

        let mut vertex = ElementDef::new(VERTEX.to_owned());
        for key in ["x", "y", "z", "s", "t"] {
            vertex.properties.add(PropertyDef::new(
                key.to_owned(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        vertex.count = self.vertex_count();
        ply.header.elements.add(vertex);
        let mut face = ElementDef::new(FACE.to_owned());
        face.properties.add(PropertyDef::new(
            FACE_INDICES.to_owned(),
            PropertyType::List(ScalarType::UChar, ScalarType::UInt),
        ));
        face.count = self.triangle_count();
        ply.header.elements.add(face);

        let vertices = self
            .as_position_slice()
            .iter()
            .zip(self.as_uv_slice())
            .map(|(position, uv)| {
                let mut element = Element::new();
                element.insert("x".to_owned(), Property::Float(position.x));
                element.insert("y".to_owned(), Property::Float(position.y));
                element.insert("z".to_owned(), Property::Float(position.z));
                element.insert("s".to_owned(), Property::Float(uv.x));
                element.insert("t".to_owned(), Property::Float(uv.y));
                element
            })
            .collect();
        let faces = self
            .as_index_slice()
            .iter()
            .map(|trigon| {
                let indices = trigon
                    .into_iter()
                    .map(|index| <u32 as NumCast>::from(index).ok_or(BufferError::IndexOverflow))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut element = Element::new();
                element.insert(FACE_INDICES.to_owned(), Property::ListUInt(indices));
                Ok(element)
            })
            .collect::<Result<Vec<_>, PlyError>>()?;
        ply.payload.insert(VERTEX.to_owned(), vertices);
        ply.payload.insert(FACE.to_owned(), faces);

        let written = Writer::<Element>::new().write_ply(&mut write, &mut ply)?;
        debug!(bytes = written, "encoded PLY");
        Ok(written)
    }
}

// Elements that are declared in the header but absent from the payload are
// empty.
fn elements<'a>(ply: &'a Ply<Element>, key: &str) -> &'a [Element] {
    ply.payload
        .get(key)
        .map(|elements| elements.as_slice())
        .unwrap_or(&[])
}

fn num_cast_scalar<T, U>(value: T) -> Result<U, PlyError>
where
    T: NumCast,
    U: NumCast,
{
    cast::cast(value).ok_or(PlyError::Encoding)
}

fn num_cast_list<T, U, I>(values: Vec<T>) -> Result<I, PlyError>
where
    T: NumCast,
    U: NumCast,
    I: FromIterator<U>,
{
    values
        .into_iter()
        .map(num_cast_scalar)
        .collect::<Result<_, _>>()
}
