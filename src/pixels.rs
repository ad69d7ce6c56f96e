//===========================================================================//

// Size limits for pixel buffers:
const MIN_WIDTH: u32 = 1;
const MIN_HEIGHT: u32 = 1;

//===========================================================================//

/// A decoded image: 8-bit RGBA pixels in row-major order from top to bottom.
/// Color channels are *not* premultiplied by alpha.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a new buffer with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero, and `rgba_data` must have `4 *
    /// width * height` bytes and be in row-major order from top to bottom.
    /// Panics if the dimensions are out of range or if `rgba_data` is the
    /// wrong length.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> PixelBuffer {
        if width < MIN_WIDTH {
            panic!(
                "Invalid width (was {}, but must be at least {})",
                width, MIN_WIDTH
            );
        }
        if height < MIN_HEIGHT {
            panic!(
                "Invalid height (was {}, but must be at least {})",
                height, MIN_HEIGHT
            );
        }
        let expected_data_len = PixelBuffer::data_len(width, height);
        if Some(rgba_data.len()) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {:?} for {}x{} \
                 image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        PixelBuffer { width, height, rgba_data }
    }

    /// Creates a buffer of the given size filled with one RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
        let num_pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(num_pixels * 4);
        for _ in 0..num_pixels {
            data.extend_from_slice(&rgba);
        }
        PixelBuffer::from_rgba_data(width, height, data)
    }

    /// Returns the number of RGBA bytes a `width` x `height` image needs, or
    /// `None` if that doesn't fit in memory.
    pub(crate) fn data_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the image is square.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Returns the RGBA value of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = 4 * (y as usize * self.width as usize + x as usize);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.rgba_data[start..start + 4]);
        rgba
    }

    /// Returns true if every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.rgba_data.chunks_exact(4).all(|pixel| pixel[3] == u8::MAX)
    }

    /// Consumes the buffer and returns its RGBA data.
    pub fn into_rgba_data(self) -> Vec<u8> {
        self.rgba_data
    }
}

//===========================================================================//


//===========================================================================//
