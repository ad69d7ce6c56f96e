//! A library for converting raster images into multi-resolution ICO files.
//!
//! A conversion decodes one source image (PNG, BMP or ICO) into RGBA pixels,
//! resamples it to each requested square size with a premultiplied-alpha
//! Lanczos filter, encodes every size as a 32-bit frame (PNG or BMP), and
//! assembles the frames into a single ICO container:
//!
//! ```no_run
//! use icoforge::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions::default().with_sizes(vec![16, 32, 256])?;
//! let conversion =
//!     convert_file(Path::new("logo.png"), Path::new("app.ico"), &options)?;
//! println!("wrote {} bytes", conversion.bytes_written);
//! # Ok::<(), icoforge::Error>(())
//! ```
//!
//! Existing ICO files can be inspected with [`IconDir`].

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmpdata;
mod bmpdepth;
mod container;
mod convert;
mod error;
mod frame;
mod icondir;
mod pixels;
mod pngdata;
pub mod resample;
mod size;
pub mod source;
mod writer;

pub use crate::container::{
    EntrySpan, IconContainer, ICONDIRENTRY_LEN, ICONDIR_LEN,
};
pub use crate::convert::{
    build_container, convert_bytes, convert_file, Conversion, ConvertOptions,
};
pub use crate::error::{Error, Result};
pub use crate::frame::{FrameEncoding, IconFrame};
pub use crate::icondir::{IconDir, IconDirEntry};
pub use crate::pixels::PixelBuffer;
pub use crate::size::{SizeSpec, DEFAULT_SIZES, MAX_SIZE, MIN_SIZE};
pub use crate::source::SourceFormat;
pub use crate::writer::write_atomic;

//===========================================================================//
