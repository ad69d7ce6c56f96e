use crate::bmpdata;
use crate::container::{ICON_RESOURCE_TYPE, ICONDIR_LEN};
use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::pngdata::{self, PNG_SIGNATURE};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

//===========================================================================//

/// The parsed contents of an existing ICO file.
#[derive(Clone, Debug)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Returns the entries in this file, in directory order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Returns the entry with the most pixels, preferring the earliest one
    /// on ties, or `None` if the file has no entries.
    pub fn largest_entry(&self) -> Option<&IconDirEntry> {
        let mut best: Option<&IconDirEntry> = None;
        for entry in self.entries.iter() {
            let area = entry.width as u64 * entry.height as u64;
            match best {
                Some(b) if b.width as u64 * b.height as u64 >= area => {}
                _ => best = Some(entry),
            }
        }
        best
    }

    /// Reads an ICO file into memory.  Returns `Error::Decode` if the file is
    /// truncated or malformed.
    pub fn read<R: Read + Seek>(reader: R) -> Result<IconDir> {
        IconDir::read_io(reader).map_err(|error| {
            Error::Decode(format!("Malformed ICO data: {}", error))
        })
    }

    fn read_io<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_RESOURCE_TYPE {
            invalid_data!(
                "Unsupported resource type (was {}, but must be {})",
                restype,
                ICON_RESOURCE_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            if (data_offset as u64) < ICONDIR_LEN as u64 {
                invalid_data!(
                    "Image data offset {} overlaps the ICONDIR header",
                    data_offset
                );
            }
            // The directory stores a size of 256 as a zero byte.  Later on
            // we replace these values with the actual width/height from the
            // image data when that data is readable.
            let width = if width_byte == 0 { 256 } else { width_byte as u32 };
            let height =
                if height_byte == 0 { 256 } else { height_byte as u32 };
            entries.push(IconDirEntry {
                width,
                height,
                width_byte,
                height_byte,
                num_colors,
                color_planes,
                bits_per_pixel,
                data_offset,
                data: Vec::new(),
                data_size,
            });
        }
        for entry in entries.iter_mut() {
            reader.seek(SeekFrom::Start(entry.data_offset as u64))?;
            let mut data = Vec::new();
            (&mut reader)
                .take(entry.data_size as u64)
                .read_to_end(&mut data)?;
            if data.len() != entry.data_size as usize {
                invalid_data!(
                    "Image data at offset {} is truncated \
                     (was {} bytes, but should be {})",
                    entry.data_offset,
                    data.len(),
                    entry.data_size
                );
            }
            entry.data = data;
            // Ignore any errors here.  If this entry's image data is
            // malformed, defer errors until the user actually tries to decode
            // that image.
            if let Ok((width, height)) = entry.decode_size() {
                entry.width = width;
                entry.height = height;
            }
        }
        Ok(IconDir { entries })
    }
}

//===========================================================================//

/// One entry in an ICO file; a single image.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    width_byte: u8,
    height_byte: u8,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_offset: u32,
    data_size: u32,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw width and height bytes stored in the directory.
    pub fn directory_bytes(&self) -> (u8, u8) {
        (self.width_byte, self.height_byte)
    }

    /// Returns the number of palette colors recorded in the directory.
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes recorded in the directory.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel (color depth) recorded in the directory.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the byte offset of the image data within the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Returns true if the image is encoded as a PNG, or false if it is
    /// encoded as a BMP.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decodes just enough of the raw image data to determine its size.
    fn decode_size(&self) -> io::Result<(u32, u32)> {
        if self.is_png() {
            pngdata::read_png_size(self.data.as_slice())
        } else {
            bmpdata::read_icon_dib_size(&self.data)
        }
    }

    /// Decodes this entry into an image.  Returns `Error::Decode` if the data
    /// is malformed or doesn't match the size in the directory.
    pub fn decode(&self) -> Result<PixelBuffer> {
        let image = if self.is_png() {
            pngdata::read_png(self.data.as_slice())
        } else {
            bmpdata::read_icon_dib(&self.data)
        };
        let image = image.map_err(|error| {
            Error::Decode(format!("Malformed ICO image data: {}", error))
        })?;
        if image.width() != self.width || image.height() != self.height {
            decode_error!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {}x{})",
                image.width(),
                image.height(),
                self.width,
                self.height
            );
        }
        Ok(image)
    }
}

//===========================================================================//


//===========================================================================//
