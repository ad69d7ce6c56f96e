use crate::bmpdata::{self, BMP_SIGNATURE};
use crate::error::{Error, Result};
use crate::icondir::IconDir;
use crate::pixels::PixelBuffer;
use crate::pngdata::{self, PNG_SIGNATURE};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

//===========================================================================//

// ICO files start with a zero reserved field and a type field of 1.
const ICO_SIGNATURE: &[u8] = &[0, 0, 1, 0];

//===========================================================================//

/// The raster formats a source image may be stored in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SourceFormat {
    /// Portable Network Graphics, any color type and bit depth.
    Png,
    /// An uncompressed Windows bitmap file.
    Bmp,
    /// An existing ICO file; its largest image is used.
    Ico,
}

impl SourceFormat {
    /// Identifies the format of `data` from its leading bytes.
    pub fn detect(data: &[u8]) -> Option<SourceFormat> {
        if data.starts_with(PNG_SIGNATURE) {
            Some(SourceFormat::Png)
        } else if data.starts_with(BMP_SIGNATURE) {
            Some(SourceFormat::Bmp)
        } else if data.starts_with(ICO_SIGNATURE) {
            Some(SourceFormat::Ico)
        } else {
            None
        }
    }

    /// Decodes `data`, which must be in this format, into RGBA.
    fn decode(self, data: &[u8]) -> Result<PixelBuffer> {
        let decoded = match self {
            SourceFormat::Png => pngdata::read_png(data),
            SourceFormat::Bmp => bmpdata::read_bmp_file(data),
            SourceFormat::Ico => return decode_ico(data),
        };
        decoded.map_err(|error| Error::Decode(describe(self, &error)))
    }
}

fn describe(format: SourceFormat, error: &io::Error) -> String {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        format!("{:?} source is truncated", format)
    } else {
        format!("malformed {:?} source: {}", format, error)
    }
}

fn decode_ico(data: &[u8]) -> Result<PixelBuffer> {
    let icondir = IconDir::read(Cursor::new(data))?;
    match icondir.largest_entry() {
        Some(entry) => {
            tracing::debug!(
                width = entry.width(),
                height = entry.height(),
                "using largest image of ICO source"
            );
            entry.decode()
        }
        None => decode_error!("ICO source contains no images"),
    }
}

//===========================================================================//

/// Decodes raw image bytes into an RGBA buffer.  Returns `Error::Decode` if
/// the bytes aren't a recognized raster format, are truncated, or are
/// otherwise malformed.
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    let format = match SourceFormat::detect(data) {
        Some(format) => format,
        None => decode_error!(
            "unrecognized image format ({} bytes, expected PNG, BMP or ICO)",
            data.len()
        ),
    };
    let buffer = format.decode(data)?;
    tracing::debug!(
        ?format,
        width = buffer.width(),
        height = buffer.height(),
        "decoded source image"
    );
    Ok(buffer)
}

/// Reads and decodes the image at `path`.  Returns `Error::InputNotFound` if
/// nothing exists there.
pub fn load(path: &Path) -> Result<PixelBuffer> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(Error::InputNotFound { path: path.to_path_buf() });
        }
        Err(source) => {
            return Err(Error::Read { path: path.to_path_buf(), source });
        }
    };
    decode(&data)
}

//===========================================================================//


//===========================================================================//
