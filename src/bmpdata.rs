use crate::bmpdepth::{padded_row_size, BmpDepth};
use crate::pixels::PixelBuffer;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use image::{ImageError, ImageFormat};
use std::io::{self, Read, Write};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.
const BMP_HEADER_LEN: u32 = 40;

// The signature that all BMP files start with.
pub(crate) const BMP_SIGNATURE: &[u8] = b"BM";

// The only compression value ICO bitmaps use.
const BI_RGB: u32 = 0;

//===========================================================================//

/// The fields of an icon's BITMAPINFOHEADER that matter for decoding.
struct DibHeader {
    width: u32,
    height: u32,
    depth: BmpDepth,
    colors_used: u32,
}

/// Where the bits of one channel live within a 16- or 32-bit pixel.
#[derive(Clone, Copy)]
struct ChannelMask {
    mask: u32,
    shift: u32,
    max: u64,
}

impl ChannelMask {
    fn new(mask: u32) -> ChannelMask {
        if mask == 0 {
            return ChannelMask { mask: 0, shift: 0, max: 0 };
        }
        let shift = mask.trailing_zeros();
        ChannelMask { mask, shift, max: (mask >> shift) as u64 }
    }

    /// Scales this channel of `pixel` to 8 bits, or returns `None` if the
    /// pixel format has no such channel.
    fn extract(&self, pixel: u32) -> Option<u8> {
        if self.mask == 0 {
            return None;
        }
        let value = ((pixel & self.mask) >> self.shift) as u64;
        Some(((value * 255 + self.max / 2) / self.max) as u8)
    }
}

#[derive(Clone, Copy)]
struct ChannelMasks {
    red: ChannelMask,
    green: ChannelMask,
    blue: ChannelMask,
    alpha: ChannelMask,
}

impl ChannelMasks {
    /// The layout uncompressed 16- and 32-bit bitmaps use: 5-5-5 RGB, or
    /// BGRA with one byte per channel.
    fn for_depth(depth: BmpDepth) -> ChannelMasks {
        let (red, green, blue, alpha) = if depth == BmpDepth::Sixteen {
            (0x7c00, 0x03e0, 0x001f, 0)
        } else {
            (0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000)
        };
        ChannelMasks {
            red: ChannelMask::new(red),
            green: ChannelMask::new(green),
            blue: ChannelMask::new(blue),
            alpha: ChannelMask::new(alpha),
        }
    }

    fn store(&self, pixel: u32, rgba: &mut [u8]) {
        rgba[0] = self.red.extract(pixel).unwrap_or(0);
        rgba[1] = self.green.extract(pixel).unwrap_or(0);
        rgba[2] = self.blue.extract(pixel).unwrap_or(0);
        rgba[3] = self.alpha.extract(pixel).unwrap_or(u8::MAX);
    }
}

/// Everything needed to turn a block of bitmap rows into RGBA.
struct RowLayout {
    width: u32,
    height: u32,
    depth: BmpDepth,
    palette: Vec<(u8, u8, u8)>,
    masks: ChannelMasks,
}

impl RowLayout {
    /// Returns the number of bytes the color rows, plus the 1-bit mask rows
    /// if `with_mask` is set, occupy, or `None` on overflow.
    fn pixel_data_len(&self, with_mask: bool) -> Option<usize> {
        let mut row_len = self.depth.row_stride(self.width);
        if with_mask {
            let mask_row_len = padded_row_size((self.width as usize + 7) / 8);
            row_len = row_len.checked_add(mask_row_len)?;
        }
        row_len.checked_mul(self.height as usize)
    }
}

//===========================================================================//

fn read_dib_header<R: Read>(reader: &mut R) -> io::Result<DibHeader> {
    let header_len = reader.read_u32::<LittleEndian>()?;
    if header_len != BMP_HEADER_LEN {
        invalid_data!(
            "Invalid BMP header size (was {}, must be {})",
            header_len,
            BMP_HEADER_LEN
        );
    }
    let width = reader.read_i32::<LittleEndian>()?;
    if width < 1 {
        invalid_data!(
            "Invalid BMP width (was {}, but must be at least 1)",
            width
        );
    }
    let raw_height = reader.read_i32::<LittleEndian>()?;
    if raw_height % 2 != 0 {
        // The height is stored doubled, counting the rows of both the color
        // data and the alpha mask, so it should be divisible by 2.
        invalid_data!(
            "Invalid height field in BMP header \
             (was {}, but must be divisible by 2)",
            raw_height
        );
    }
    let height = raw_height / 2;
    if height < 1 {
        invalid_data!(
            "Invalid BMP height (was {}, but must be at least 1)",
            height
        );
    }
    let _planes = reader.read_u16::<LittleEndian>()?;
    let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
    let compression = reader.read_u32::<LittleEndian>()?;
    let _image_size = reader.read_u32::<LittleEndian>()?;
    let _horz_ppm = reader.read_i32::<LittleEndian>()?;
    let _vert_ppm = reader.read_i32::<LittleEndian>()?;
    let colors_used = reader.read_u32::<LittleEndian>()?;
    let _colors_important = reader.read_u32::<LittleEndian>()?;
    let depth = match BmpDepth::from_bits_per_pixel(bits_per_pixel) {
        Some(depth) => depth,
        None => {
            invalid_data!(
                "Unsupported BMP bits-per-pixel ({})",
                bits_per_pixel
            );
        }
    };
    if compression != BI_RGB {
        invalid_data!("Unsupported BMP compression ({})", compression);
    }
    Ok(DibHeader {
        width: width as u32,
        height: height as u32,
        depth,
        colors_used,
    })
}

fn read_palette<R: Read>(
    reader: &mut R,
    header: &DibHeader,
) -> io::Result<Vec<(u8, u8, u8)>> {
    let max_len = header.depth.max_palette_len();
    let num_colors = if header.colors_used == 0 {
        max_len
    } else if (header.colors_used as usize) <= max_len {
        header.colors_used as usize
    } else {
        invalid_data!(
            "Too many colors in BMP color table (was {}, but max is {})",
            header.colors_used,
            max_len
        );
    };
    let mut color_table = Vec::<(u8, u8, u8)>::with_capacity(num_colors);
    for _ in 0..num_colors {
        let blue = reader.read_u8()?;
        let green = reader.read_u8()?;
        let red = reader.read_u8()?;
        let _reserved = reader.read_u8()?;
        color_table.push((red, green, blue));
    }
    Ok(color_table)
}

fn palette_color(
    palette: &[(u8, u8, u8)],
    index: u8,
) -> io::Result<(u8, u8, u8)> {
    match palette.get(index as usize) {
        Some(&color) => Ok(color),
        None => invalid_data!(
            "Color index {} is outside of the {}-entry color table",
            index,
            palette.len()
        ),
    }
}

/// Reads the color rows, which are stored from the *bottom* row up, into
/// `rgba`.
fn read_color_rows<R: Read>(
    reader: &mut R,
    layout: &RowLayout,
    rgba: &mut [u8],
) -> io::Result<()> {
    let width = layout.width as usize;
    let row_data_size = layout.depth.row_data_size(layout.width);
    let row_padding_size =
        layout.depth.row_stride(layout.width) - row_data_size;
    let mut row_padding = vec![0; row_padding_size];
    for row in 0..layout.height {
        let dest_row = layout.height - row - 1;
        let mut start = 4 * dest_row as usize * width;
        match layout.depth {
            BmpDepth::One | BmpDepth::Four => {
                let bits = layout.depth.bits_per_pixel() as usize;
                let per_byte = 8 / bits;
                let index_mask = (1u8 << bits) - 1;
                let mut col = 0;
                for _ in 0..row_data_size {
                    let byte = reader.read_u8()?;
                    for slot in 0..per_byte {
                        if col == width {
                            break;
                        }
                        let shift = bits * (per_byte - 1 - slot);
                        let index = (byte >> shift) & index_mask;
                        let (red, green, blue) =
                            palette_color(&layout.palette, index)?;
                        rgba[start] = red;
                        rgba[start + 1] = green;
                        rgba[start + 2] = blue;
                        col += 1;
                        start += 4;
                    }
                }
            }
            BmpDepth::Eight => {
                for _ in 0..width {
                    let index = reader.read_u8()?;
                    let (red, green, blue) =
                        palette_color(&layout.palette, index)?;
                    rgba[start] = red;
                    rgba[start + 1] = green;
                    rgba[start + 2] = blue;
                    start += 4;
                }
            }
            BmpDepth::Sixteen => {
                for _ in 0..width {
                    let color = reader.read_u16::<LittleEndian>()? as u32;
                    layout.masks.store(color, &mut rgba[start..start + 4]);
                    start += 4;
                }
            }
            BmpDepth::TwentyFour => {
                for _ in 0..width {
                    let blue = reader.read_u8()?;
                    let green = reader.read_u8()?;
                    let red = reader.read_u8()?;
                    rgba[start] = red;
                    rgba[start + 1] = green;
                    rgba[start + 2] = blue;
                    start += 4;
                }
            }
            BmpDepth::ThirtyTwo => {
                for _ in 0..width {
                    let color = reader.read_u32::<LittleEndian>()?;
                    layout.masks.store(color, &mut rgba[start..start + 4]);
                    start += 4;
                }
            }
        }
        reader.read_exact(&mut row_padding)?;
    }
    Ok(())
}

//===========================================================================//

/// Decodes just enough of the bitmap stored in an ICO entry to determine its
/// size.
pub(crate) fn read_icon_dib_size(data: &[u8]) -> io::Result<(u32, u32)> {
    let mut reader = data;
    let header = read_dib_header(&mut reader)?;
    Ok((header.width, header.height))
}

/// Decodes the bitmap stored in an ICO entry: a BITMAPINFOHEADER whose height
/// counts both the color rows and the 1-bit transparency mask rows.
pub(crate) fn read_icon_dib(data: &[u8]) -> io::Result<PixelBuffer> {
    let mut reader = data;
    let header = read_dib_header(&mut reader)?;
    let palette = read_palette(&mut reader, &header)?;
    let layout = RowLayout {
        width: header.width,
        height: header.height,
        depth: header.depth,
        palette,
        masks: ChannelMasks::for_depth(header.depth),
    };
    // At 32 bpp the color data carries alpha already and the mask is
    // ignored.
    let has_mask = header.depth != BmpDepth::ThirtyTwo;

    // The header's dimensions are untrusted; make sure the rows are actually
    // there before allocating the output.
    match layout.pixel_data_len(has_mask) {
        Some(len) if len <= reader.len() => {}
        Some(len) => invalid_data!(
            "BMP data is truncated ({}x{} image needs {} bytes of pixel \
             data, but only {} remain)",
            header.width,
            header.height,
            len,
            reader.len()
        ),
        None => invalid_data!(
            "BMP dimensions are too large ({}x{})",
            header.width,
            header.height
        ),
    }
    let mut rgba = match PixelBuffer::data_len(header.width, header.height) {
        Some(len) => vec![u8::MAX; len],
        None => invalid_data!("Width * Height is too large"),
    };
    read_color_rows(&mut reader, &layout, &mut rgba)?;

    // Read in the alpha mask (1 bit per pixel), which again is stored row by
    // row, starting from the *bottom* row, with each row padded to a multiple
    // of four bytes.
    if has_mask {
        let width = header.width as usize;
        let height = header.height as usize;
        let row_mask_size = (width + 7) / 8;
        let row_padding_size = padded_row_size(row_mask_size) - row_mask_size;
        let mut row_padding = vec![0; row_padding_size];
        for row in 0..height {
            let mut start = 4 * (height - row - 1) * width;
            let mut col = 0;
            for _ in 0..row_mask_size {
                let byte = reader.read_u8()?;
                for bit in 0..8 {
                    if ((byte >> (7 - bit)) & 0x1) == 1 {
                        rgba[start + 3] = 0;
                    }
                    col += 1;
                    if col == width {
                        break;
                    }
                    start += 4;
                }
            }
            reader.read_exact(&mut row_padding)?;
        }
    }

    Ok(PixelBuffer::from_rgba_data(header.width, header.height, rgba))
}

/// Decodes a standalone Windows bitmap file.
pub(crate) fn read_bmp_file(data: &[u8]) -> io::Result<PixelBuffer> {
    let decoded = image::load_from_memory_with_format(data, ImageFormat::Bmp);
    let rgba = match decoded {
        Ok(decoded) => decoded.to_rgba8(),
        Err(ImageError::IoError(error)) => return Err(error),
        Err(error) => invalid_data!("Malformed BMP data: {}", error),
    };
    let (width, height) = rgba.dimensions();
    if width < 1 || height < 1 {
        invalid_data!(
            "Invalid BMP dimensions (was {}x{}, but must be at least 1x1)",
            width,
            height
        );
    }
    Ok(PixelBuffer::from_rgba_data(width, height, rgba.into_raw()))
}

//===========================================================================//

/// Encodes `buffer` as the 32-bpp bitmap an ICO entry stores: a
/// BITMAPINFOHEADER with a doubled height, BGRA color rows from the bottom
/// up, then a 1-bit mask marking fully transparent pixels.
pub(crate) fn write_icon_dib(buffer: &PixelBuffer) -> io::Result<Vec<u8>> {
    let width = buffer.width();
    let height = buffer.height();
    let rgba = buffer.rgba_data();
    let depth = BmpDepth::ThirtyTwo;
    if width > i32::MAX as u32 || height > (i32::MAX / 2) as u32 {
        invalid_input!("Image is too large for a BMP ({}x{})", width, height);
    }

    // Determine the size of the encoded data:
    let rgb_row_size = depth.row_stride(width);
    let mask_row_data_size = (width as usize + 7) / 8;
    let mask_row_size = padded_row_size(mask_row_data_size);
    let mask_row_padding = vec![0u8; mask_row_size - mask_row_data_size];
    let data_size = BMP_HEADER_LEN as usize
        + height as usize * (rgb_row_size + mask_row_size);
    let mut data = Vec::<u8>::with_capacity(data_size);

    // Write the BITMAPINFOHEADER struct:
    data.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;
    data.write_i32::<LittleEndian>(width as i32)?;
    data.write_i32::<LittleEndian>(2 * height as i32)?;
    data.write_u16::<LittleEndian>(1)?; // planes
    data.write_u16::<LittleEndian>(depth.bits_per_pixel())?;
    data.write_u32::<LittleEndian>(BI_RGB)?;
    data.write_u32::<LittleEndian>(0)?; // image size
    data.write_i32::<LittleEndian>(0)?; // horz ppm
    data.write_i32::<LittleEndian>(0)?; // vert ppm
    data.write_u32::<LittleEndian>(0)?; // colors used
    data.write_u32::<LittleEndian>(0)?; // colors important
    debug_assert_eq!(data.len(), BMP_HEADER_LEN as usize);

    // Write the color data.  32-bpp rows never need padding.
    for row in 0..height {
        let start = 4 * ((height - row - 1) * width) as usize;
        for pixel in rgba[start..start + 4 * width as usize].chunks_exact(4) {
            data.write_u8(pixel[2])?;
            data.write_u8(pixel[1])?;
            data.write_u8(pixel[0])?;
            data.write_u8(pixel[3])?;
        }
    }

    // Write the mask data:
    for row in 0..height {
        let mut start = 4 * ((height - row - 1) * width) as usize;
        let mut col = 0;
        for _ in 0..mask_row_data_size {
            let mut byte = 0;
            for bit in 0..8 {
                if rgba[start + 3] == 0 {
                    byte |= 1 << (7 - bit);
                }
                col += 1;
                if col == width {
                    break;
                }
                start += 4;
            }
            data.write_u8(byte)?;
        }
        data.write_all(&mask_row_padding)?;
    }

    debug_assert_eq!(data.len(), data_size);
    Ok(data)
}

//===========================================================================//


//===========================================================================//
