use crate::error::{Error, Result};
use crate::frame::IconFrame;
use crate::size::SizeSpec;
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashSet;
use std::io::{self, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const ICONDIR_LEN: u32 = 6;

/// The size of one ICONDIRENTRY record, in bytes.
pub const ICONDIRENTRY_LEN: u32 = 16;

// The value of the ICONDIR type field for icons (cursors use 2).
pub(crate) const ICON_RESOURCE_TYPE: u16 = 1;

//===========================================================================//

/// Where one frame's payload lives within the container.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntrySpan {
    /// Byte offset of the payload from the start of the file.
    pub offset: u32,
    /// Byte length of the payload.
    pub length: u32,
}

//===========================================================================//

/// An ordered set of icon frames with distinct sizes; the contents of a
/// single ICO file.
#[derive(Clone, Debug)]
pub struct IconContainer {
    frames: Vec<IconFrame>,
    spans: Vec<EntrySpan>,
}

impl IconContainer {
    /// Collects `frames` into a container, keeping their order.  If two
    /// frames have the same size, the first one wins and later ones are
    /// dropped.  Returns `Error::NoFrames` for an empty list, or
    /// `Error::Encode` if the payloads don't fit in a 32-bit file.
    pub fn new(frames: Vec<IconFrame>) -> Result<IconContainer> {
        let mut seen = HashSet::<SizeSpec>::with_capacity(frames.len());
        let mut kept = Vec::<IconFrame>::with_capacity(frames.len());
        for frame in frames.into_iter() {
            if seen.insert(frame.size()) {
                kept.push(frame);
            } else {
                tracing::warn!(
                    size = frame.size().pixels(),
                    "dropping duplicate icon frame"
                );
            }
        }
        if kept.is_empty() {
            return Err(Error::NoFrames);
        }
        let spans = IconContainer::compute_spans(&kept)?;
        Ok(IconContainer { frames: kept, spans })
    }

    fn compute_spans(frames: &[IconFrame]) -> Result<Vec<EntrySpan>> {
        let directory_len = ICONDIRENTRY_LEN as u64 * frames.len() as u64;
        let mut offset = ICONDIR_LEN as u64 + directory_len;
        let mut spans = Vec::with_capacity(frames.len());
        for frame in frames.iter() {
            let length = frame.data().len() as u64;
            if offset + length > u32::MAX as u64 {
                encode_error!(
                    "icon payloads overflow the 32-bit offset field \
                     (frame {} would end at byte {})",
                    frame.size(),
                    offset + length
                );
            }
            spans.push(EntrySpan {
                offset: offset as u32,
                length: length as u32,
            });
            offset += length;
        }
        Ok(spans)
    }

    /// Returns the frames, in directory order.
    pub fn frames(&self) -> &[IconFrame] {
        &self.frames
    }

    /// Returns the number of frames (the ICONDIR count field).
    pub fn frame_count(&self) -> u16 {
        // Frame sizes are distinct and at most 256, so this can't truncate.
        self.frames.len() as u16
    }

    /// Returns the payload offset and length of each frame, in directory
    /// order.
    pub fn layout(&self) -> &[EntrySpan] {
        &self.spans
    }

    /// Returns the total size of the encoded file, in bytes.
    pub fn total_len(&self) -> usize {
        match self.spans.last() {
            Some(span) => span.offset as usize + span.length as usize,
            None => ICONDIR_LEN as usize,
        }
    }

    /// Writes the ICO file: header, directory, then each payload.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.frame_count())?;
        for (frame, span) in self.frames.iter().zip(self.spans.iter()) {
            writer.write_u8(frame.width_byte())?;
            writer.write_u8(frame.height_byte())?;
            writer.write_u8(frame.num_colors())?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(frame.color_planes())?;
            writer.write_u16::<LittleEndian>(frame.bits_per_pixel())?;
            writer.write_u32::<LittleEndian>(span.length)?;
            writer.write_u32::<LittleEndian>(span.offset)?;
        }
        for frame in self.frames.iter() {
            writer.write_all(frame.data())?;
        }
        Ok(())
    }

    /// Encodes the whole ICO file into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.total_len());
        if let Err(error) = self.write(&mut data) {
            encode_error!("could not assemble icon container: {}", error);
        }
        debug_assert_eq!(data.len(), self.total_len());
        Ok(data)
    }
}

//===========================================================================//


//===========================================================================//
