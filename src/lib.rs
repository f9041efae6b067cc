//! A png decoder with composable pixel buffers
//!
//! This crate reads non interlaced, 8 bit depth PNG images into
//! a raw interleaved pixel buffer and lets the caller read and
//! write that buffer, grow it onto a larger canvas, place one
//! decoded image inside another or stitch two images together,
//! the building blocks of a texture atlas.
//!
//! # Features
//! - Chunk level PNG parsing with optional CRC validation
//! - Scanline reconstruction for all five filter types
//! - Pure compositing, `resize`, `insert` and `merge` always
//!   build a new image and never touch their inputs
//!
//! # Usage
//! Add the library to `Cargo.toml`
//!
//! ```toml
//! png-canvas = "0.1"
//! ```
//!
//! #### Decode to a pixel buffer
//!
//! ```no_run
//! use png_canvas::PngDecoder;
//!
//! let data = std::fs::read("image.png").unwrap();
//!
//! let mut decoder = PngDecoder::new(&data);
//! let image = decoder.decode().unwrap();
//!
//! println!("{} x {}", image.width(), image.height());
//! ```
//!
//! #### Stitch two decoded images into an atlas
//!
//! ```no_run
//! use png_canvas::{MergeDirection, PngDecoder};
//!
//! let left_bytes = std::fs::read("left.png").unwrap();
//! let right_bytes = std::fs::read("right.png").unwrap();
//!
//! let left = PngDecoder::new(&left_bytes).decode().unwrap();
//! let right = PngDecoder::new(&right_bytes).decode().unwrap();
//!
//! let atlas = left.merge(&right, MergeDirection::Horizontal, 0).unwrap();
//! ```
//!
//! # What this crate does not do
//!
//! Interlaced (Adam7) images, palette resolution, bit depths
//! other than 8 and animated PNG are all rejected with an error
//! rather than decoded approximately.
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate

pub use decoder::{PngDecoder, PngInfo};
pub use enums::ColorType;
pub use error::ImageErrors;
pub use image::{Image, MergeDirection};
pub use options::DecoderOptions;

mod bytestream;
mod constants;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod image;
mod inflate;
mod options;
