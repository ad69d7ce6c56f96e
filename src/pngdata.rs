use crate::pixels::PixelBuffer;
use std::io::{self, Read, Write};

//===========================================================================//

// The signature that all PNG files start with.
pub(crate) const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

fn read_png_info<R: Read>(reader: R) -> io::Result<png::Reader<R>> {
    let mut decoder = png::Decoder::new(reader);
    // Expand palettes, tRNS chunks and sub-byte samples, and drop the low
    // byte of 16-bit samples, so that every image arrives as 8-bit gray,
    // gray+alpha, RGB or RGBA.
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::STRIP_16,
    );
    let png_reader = match decoder.read_info() {
        Ok(png_reader) => png_reader,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    let info = png_reader.info();
    if info.width < 1 || info.height < 1 {
        invalid_data!(
            "Invalid PNG dimensions (was {}x{}, but must be at least 1x1)",
            info.width,
            info.height
        );
    }
    Ok(png_reader)
}

/// Decodes just enough of a PNG stream to determine its size.
pub(crate) fn read_png_size<R: Read>(reader: R) -> io::Result<(u32, u32)> {
    let png_reader = read_png_info(reader)?;
    Ok((png_reader.info().width, png_reader.info().height))
}

/// Decodes a PNG stream of any color type and bit depth into RGBA8.
pub(crate) fn read_png<R: Read>(reader: R) -> io::Result<PixelBuffer> {
    let mut png_reader = read_png_info(reader)?;
    let mut buffer = vec![0u8; png_reader.output_buffer_size()];
    let frame = match png_reader.next_frame(&mut buffer) {
        Ok(frame) => frame,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    buffer.truncate(frame.buffer_size());
    if frame.bit_depth != png::BitDepth::Eight {
        invalid_data!("Unsupported PNG bit depth: {:?}", frame.bit_depth);
    }
    let rgba_data = match frame.color_type {
        png::ColorType::Rgba => buffer,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
            for rgb in buffer.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(u8::MAX);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buffer.len() * 2);
            for pixel in buffer.chunks_exact(2) {
                let gray = pixel[0];
                rgba.extend_from_slice(&[gray, gray, gray, pixel[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buffer.len() * 4);
            for gray in buffer.into_iter() {
                rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            invalid_data!("PNG palette was not expanded");
        }
    };
    let expected_len = PixelBuffer::data_len(frame.width, frame.height);
    if Some(rgba_data.len()) != expected_len {
        invalid_data!(
            "PNG frame has {} bytes of RGBA data, but a {}x{} image needs \
             {:?}",
            rgba_data.len(),
            frame.width,
            frame.height,
            expected_len
        );
    }
    Ok(PixelBuffer::from_rgba_data(frame.width, frame.height, rgba_data))
}

//===========================================================================//

/// Encodes the buffer as an 8-bit RGBA PNG.  The alpha channel is always
/// written, even for opaque images, so that every icon frame has a 32-bit
/// depth.
pub(crate) fn write_png<W: Write>(
    buffer: &PixelBuffer,
    writer: W,
) -> io::Result<()> {
    match write_png_enc(buffer, writer) {
        Ok(()) => Ok(()),
        Err(png::EncodingError::IoError(error)) => Err(error),
        Err(png::EncodingError::Format(error)) => {
            invalid_input!("PNG format error: {}", error);
        }
        Err(png::EncodingError::LimitsExceeded) => {
            invalid_input!("PNG limits exceeded");
        }
        Err(png::EncodingError::Parameter(error)) => {
            invalid_input!("PNG parameter error: {}", error);
        }
    }
}

fn write_png_enc<W: Write>(
    buffer: &PixelBuffer,
    writer: W,
) -> Result<(), png::EncodingError> {
    let mut encoder =
        png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(buffer.rgba_data())?;
    writer.finish()
}

//===========================================================================//


//===========================================================================//
