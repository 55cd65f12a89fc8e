//! Serialization and encodings.
//!
//! This module provides encoding support enabled via Cargo features. Each
//! enabled encoding has a corresponding sub-module. For example, when [PLY]
//! support is enabled, the `ply` module is exposed. The following table
//! summarizes the encodings supported by Lattice:
//!
//! | Feature        | Default | Encoding | Read | Write |
//! |----------------|---------|----------|------|-------|
//! | `encoding-ply` | No      | [PLY]    | Yes  | Yes   |
//!
//! Encodings operate on `MeshBuffer`s, so that generated surfaces can be
//! consumed by external renderers and tools.
//!
//! [PLY]: https://en.wikipedia.org/wiki/PLY_(file_format)

pub mod ply;
