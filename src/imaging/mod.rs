//! Image dimension probing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` (header read, no full decode) |
//!
//! The module is split into:
//! - **Backend**: [`ImageProbe`] trait and [`ProbeError`]
//! - **Rust backend**: [`RustProbe`], the production implementation
//!
//! Vector files never reach a probe; the scanner gives them a fixed size.

pub mod backend;
pub mod rust_backend;

pub use backend::{ImageProbe, ProbeError};
pub use rust_backend::RustProbe;
