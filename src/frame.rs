use crate::bmpdata;
use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::pngdata;
use crate::size::SizeSpec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

//===========================================================================//

// Every frame stores 8-bit RGBA, so every directory entry reports 32 bpp on a
// single plane with no color table.
const FRAME_BITS_PER_PIXEL: u16 = 32;
const FRAME_COLOR_PLANES: u16 = 1;
const FRAME_NUM_COLORS: u8 = 0;

//===========================================================================//

/// How the pixels of one icon frame are stored inside the container.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrameEncoding {
    /// An 8-bit RGBA PNG stream.  Compact, and understood by every ICO
    /// reader since Windows Vista.
    #[default]
    Png,
    /// A 32-bit BGRA bitmap followed by a 1-bit transparency mask, the way
    /// ICO files stored images before PNG support.
    Bmp,
}

impl FrameEncoding {
    /// Encodes `buffer` into a frame payload.
    fn encode_payload(self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let encoded = match self {
            FrameEncoding::Png => {
                let mut data = Vec::new();
                pngdata::write_png(buffer, &mut data).map(|()| data)
            }
            FrameEncoding::Bmp => bmpdata::write_icon_dib(buffer),
        };
        encoded.map_err(|error| {
            Error::Encode(format!(
                "could not encode {}x{} frame as {}: {}",
                buffer.width(),
                buffer.height(),
                self,
                error
            ))
        })
    }
}

impl fmt::Display for FrameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FrameEncoding::Png => f.write_str("PNG"),
            FrameEncoding::Bmp => f.write_str("BMP"),
        }
    }
}

//===========================================================================//

/// One encoded icon image, ready to be placed in a container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconFrame {
    size: SizeSpec,
    encoding: FrameEncoding,
    data: Vec<u8>,
}

impl IconFrame {
    /// Encodes a square buffer into a new frame.  Returns `Error::Encode` if
    /// the buffer isn't square, if its edge is outside `[1, 256]`, or if the
    /// encoder produces no bytes.
    pub fn encode(
        buffer: &PixelBuffer,
        encoding: FrameEncoding,
    ) -> Result<IconFrame> {
        if !buffer.is_square() {
            encode_error!(
                "icon frames must be square (was {}x{})",
                buffer.width(),
                buffer.height()
            );
        }
        let size = match SizeSpec::new(buffer.width() as i64) {
            Ok(size) => size,
            Err(_) => encode_error!(
                "icon frames must be between 1x1 and 256x256 (was {}x{})",
                buffer.width(),
                buffer.height()
            ),
        };
        let data = encoding.encode_payload(buffer)?;
        if data.is_empty() {
            encode_error!(
                "{} encoder produced an empty {} frame",
                encoding,
                size
            );
        }
        Ok(IconFrame { size, encoding, data })
    }

    /// Returns the edge length of the frame.
    pub fn size(&self) -> SizeSpec {
        self.size
    }

    /// Returns how the payload is encoded.
    pub fn encoding(&self) -> FrameEncoding {
        self.encoding
    }

    /// Returns the encoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the directory's width byte (256 is stored as 0).
    pub fn width_byte(&self) -> u8 {
        self.size.directory_byte()
    }

    /// Returns the directory's height byte (256 is stored as 0).
    pub fn height_byte(&self) -> u8 {
        self.size.directory_byte()
    }

    /// Returns the directory's color count, which is always 0.
    pub fn num_colors(&self) -> u8 {
        FRAME_NUM_COLORS
    }

    /// Returns the directory's plane count, which is always 1.
    pub fn color_planes(&self) -> u16 {
        FRAME_COLOR_PLANES
    }

    /// Returns the directory's bit count, which is always 32.
    pub fn bits_per_pixel(&self) -> u16 {
        FRAME_BITS_PER_PIXEL
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{FrameEncoding, IconFrame};
    use crate::bmpdata;
    use crate::error::Error;
    use crate::pixels::PixelBuffer;
    use crate::pngdata;

    #[test]
    fn png_frame_metadata() {
        let buffer = PixelBuffer::filled(16, 16, [1, 2, 3, 4]);
        let frame = IconFrame::encode(&buffer, FrameEncoding::Png).unwrap();
        assert_eq!(frame.size().pixels(), 16);
        assert_eq!(frame.width_byte(), 16);
        assert_eq!(frame.height_byte(), 16);
        assert_eq!(frame.num_colors(), 0);
        assert_eq!(frame.color_planes(), 1);
        assert_eq!(frame.bits_per_pixel(), 32);
        assert!(frame.data().starts_with(pngdata::PNG_SIGNATURE));
        assert_eq!(pngdata::read_png(frame.data()).unwrap(), buffer);
    }

    #[test]
    fn bmp_frame_is_32bpp_dib() {
        let buffer = PixelBuffer::filled(3, 3, [9, 8, 7, 0]);
        let frame = IconFrame::encode(&buffer, FrameEncoding::Bmp).unwrap();
        assert_eq!(frame.encoding(), FrameEncoding::Bmp);
        assert_eq!(frame.bits_per_pixel(), 32);
        assert_eq!(&frame.data()[14..16], b"\x20\x00");
        assert_eq!(bmpdata::read_icon_dib(frame.data()).unwrap(), buffer);
    }

    #[test]
    fn size_256_uses_zero_directory_bytes() {
        let buffer = PixelBuffer::filled(256, 256, [0, 0, 0, 255]);
        let frame = IconFrame::encode(&buffer, FrameEncoding::Png).unwrap();
        assert_eq!(frame.width_byte(), 0);
        assert_eq!(frame.height_byte(), 0);
        assert_eq!(frame.size().pixels(), 256);
    }

    #[test]
    fn non_square_buffer_is_rejected() {
        let buffer = PixelBuffer::filled(16, 8, [0, 0, 0, 255]);
        match IconFrame::encode(&buffer, FrameEncoding::Png) {
            Err(Error::Encode(message)) => {
                assert!(message.contains("square"))
            }
            other => panic!("Expected Encode error, got {:?}", other),
        }
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let buffer = PixelBuffer::filled(257, 257, [0, 0, 0, 255]);
        assert!(matches!(
            IconFrame::encode(&buffer, FrameEncoding::Bmp),
            Err(Error::Encode(_))
        ));
    }
}

//===========================================================================//
