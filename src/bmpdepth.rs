//===========================================================================//

/// The pixel layouts an uncompressed bitmap may use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    Four,
    Eight,
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn from_bits_per_pixel(
        bits_per_pixel: u16,
    ) -> Option<BmpDepth> {
        match bits_per_pixel {
            1 => Some(BmpDepth::One),
            4 => Some(BmpDepth::Four),
            8 => Some(BmpDepth::Eight),
            16 => Some(BmpDepth::Sixteen),
            24 => Some(BmpDepth::TwentyFour),
            32 => Some(BmpDepth::ThirtyTwo),
            _ => None,
        }
    }

    pub(crate) fn bits_per_pixel(&self) -> u16 {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::Four => 4,
            BmpDepth::Eight => 8,
            BmpDepth::Sixteen => 16,
            BmpDepth::TwentyFour => 24,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// The largest color table this depth can index into (zero for direct
    /// color depths).
    pub(crate) fn max_palette_len(&self) -> usize {
        match *self {
            BmpDepth::One => 2,
            BmpDepth::Four => 16,
            BmpDepth::Eight => 256,
            _ => 0,
        }
    }

    /// The number of meaningful bytes in one row of `width` pixels.
    pub(crate) fn row_data_size(&self, width: u32) -> usize {
        (width as usize * self.bits_per_pixel() as usize + 7) / 8
    }

    /// The number of bytes one row of `width` pixels occupies, including the
    /// padding up to a multiple of four bytes.
    pub(crate) fn row_stride(&self, width: u32) -> usize {
        padded_row_size(self.row_data_size(width))
    }
}

/// Rounds a row length up to the four-byte alignment bitmaps require.
pub(crate) fn padded_row_size(row_data_size: usize) -> usize {
    ((row_data_size + 3) / 4) * 4
}

//===========================================================================//


//===========================================================================//
