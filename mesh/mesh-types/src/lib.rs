//! Core surface mesh types for fundus extraction.
//!
//! This crate provides the foundational types shared by the fundus
//! workspace:
//!
//! - [`Vertex`] - A point on the surface
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`ScalarField`] - A named per-vertex scalar array (curvature, depth, labels)
//! - [`grid`] - A triangulated height-field builder used by tests and benches
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Servers
//! - Python bindings
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Cortical surfaces are usually expressed in millimeters.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Point3, ScalarField, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! let depth = ScalarField::new("depth", vec![0.0, 0.5, 1.0]);
//! assert_eq!(depth.len(), mesh.vertex_count());
//! ```
//!
//! # Quality Standards
//!
//! This crate maintains A-grade standards per [STANDARDS.md](../../STANDARDS.md):
//! - ≥90% test coverage
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod mesh;
mod scalar;
mod vertex;

// Re-export core types
pub use mesh::{IndexedMesh, grid};
pub use scalar::ScalarField;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
