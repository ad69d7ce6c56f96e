use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

//===========================================================================//

/// The smallest edge length an icon frame may have.
pub const MIN_SIZE: u32 = 1;

/// The largest edge length an icon frame may have.  The ICO directory stores
/// this size as a zero byte.
pub const MAX_SIZE: u32 = 256;

/// The frame sizes written when the caller doesn't ask for specific ones.
pub const DEFAULT_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

//===========================================================================//

/// The edge length, in pixels, of one square icon frame.  Always within
/// `[MIN_SIZE, MAX_SIZE]`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct SizeSpec(u32);

impl SizeSpec {
    /// Validates a requested edge length.  Returns `Error::InvalidSize` if
    /// `size` is zero, negative, or greater than 256.
    pub fn new(size: i64) -> Result<SizeSpec> {
        if size < MIN_SIZE as i64 || size > MAX_SIZE as i64 {
            return Err(Error::InvalidSize { size });
        }
        Ok(SizeSpec(size as u32))
    }

    /// Validates a whole list of requested sizes, failing on the first bad
    /// one.  Duplicates are kept; the container collapses them later.
    pub fn parse_list<I>(sizes: I) -> Result<Vec<SizeSpec>>
    where
        I: IntoIterator<Item = i64>,
    {
        sizes.into_iter().map(SizeSpec::new).collect()
    }

    /// Returns `DEFAULT_SIZES` as validated sizes.
    pub fn defaults() -> Vec<SizeSpec> {
        DEFAULT_SIZES.iter().map(|&size| SizeSpec(size)).collect()
    }

    /// Returns the edge length in pixels.
    pub fn pixels(self) -> u32 {
        self.0
    }

    /// Returns the value stored in the one-byte width/height fields of an
    /// ICO directory entry.
    pub fn directory_byte(self) -> u8 {
        // A width/height byte of zero indicates a size of 256.
        if self.0 >= MAX_SIZE {
            0
        } else {
            self.0 as u8
        }
    }
}

impl TryFrom<u32> for SizeSpec {
    type Error = Error;

    fn try_from(size: u32) -> Result<SizeSpec> {
        SizeSpec::new(size as i64)
    }
}

impl From<SizeSpec> for u32 {
    fn from(size: SizeSpec) -> u32 {
        size.0
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

//===========================================================================//


//===========================================================================//
