use crate::container::IconContainer;
use crate::error::{Error, Result};
use crate::frame::{FrameEncoding, IconFrame};
use crate::pixels::PixelBuffer;
use crate::resample;
use crate::size::SizeSpec;
use crate::source;
use crate::writer;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::Path;

//===========================================================================//

/// Settings for one conversion.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Frame sizes to produce, in directory order.
    pub sizes: Vec<SizeSpec>,
    /// How each frame's pixels are stored.
    pub encoding: FrameEncoding,
    /// Whether sizes are resampled and encoded concurrently.
    pub parallel: bool,
    /// Worker count for a dedicated thread pool; `None` shares rayon's global
    /// pool.
    pub threads: Option<NonZeroUsize>,
    /// Whether missing parent directories of the destination are created.
    pub create_dirs: bool,
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions {
            sizes: SizeSpec::defaults(),
            encoding: FrameEncoding::default(),
            parallel: true,
            threads: None,
            create_dirs: true,
        }
    }
}

impl ConvertOptions {
    /// Replaces the size list with validated `sizes`.  Returns
    /// `Error::InvalidSize` for the first size outside `[1, 256]`.
    pub fn with_sizes<I>(self, sizes: I) -> Result<ConvertOptions>
    where
        I: IntoIterator<Item = i64>,
    {
        Ok(self.with_size_specs(SizeSpec::parse_list(sizes)?))
    }

    /// Replaces the size list.
    pub fn with_size_specs(mut self, sizes: Vec<SizeSpec>) -> ConvertOptions {
        self.sizes = sizes;
        self
    }

    /// Sets the frame encoding.
    pub fn with_encoding(mut self, encoding: FrameEncoding) -> ConvertOptions {
        self.encoding = encoding;
        self
    }

    /// Turns the concurrent per-size stage on or off.
    pub fn with_parallel(mut self, parallel: bool) -> ConvertOptions {
        self.parallel = parallel;
        self
    }

    /// Runs the concurrent stage on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: NonZeroUsize) -> ConvertOptions {
        self.threads = Some(threads);
        self
    }

    /// Sets whether missing destination directories are created.
    pub fn with_create_dirs(mut self, create_dirs: bool) -> ConvertOptions {
        self.create_dirs = create_dirs;
        self
    }

    /// Returns the sizes to produce with duplicates removed, keeping the
    /// first occurrence of each.
    pub fn distinct_sizes(&self) -> Vec<SizeSpec> {
        let mut seen = HashSet::with_capacity(self.sizes.len());
        let mut distinct = Vec::with_capacity(self.sizes.len());
        for &size in self.sizes.iter() {
            if seen.insert(size) {
                distinct.push(size);
            } else {
                tracing::warn!(
                    size = size.pixels(),
                    "ignoring duplicate icon size"
                );
            }
        }
        distinct
    }
}

//===========================================================================//

/// What a finished conversion produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conversion {
    /// The frame sizes written, in directory order.
    pub sizes: Vec<SizeSpec>,
    /// The length of the written file, in bytes.
    pub bytes_written: usize,
}

//===========================================================================//

fn render_frame(
    image: &PixelBuffer,
    size: SizeSpec,
    encoding: FrameEncoding,
) -> Result<IconFrame> {
    let resized = resample::resize_square(image, size);
    let frame = IconFrame::encode(&resized, encoding)?;
    tracing::debug!(
        size = size.pixels(),
        %encoding,
        bytes = frame.data().len(),
        "encoded icon frame"
    );
    Ok(frame)
}

fn render_frames(
    image: &PixelBuffer,
    sizes: &[SizeSpec],
    options: &ConvertOptions,
) -> Result<Vec<IconFrame>> {
    let encoding = options.encoding;
    if !options.parallel {
        return sizes
            .iter()
            .map(|&size| render_frame(image, size, encoding))
            .collect();
    }
    // Collecting into a Result stops handing out work after the first error.
    let fan_out = || {
        sizes
            .par_iter()
            .map(|&size| render_frame(image, size, encoding))
            .collect::<Result<Vec<IconFrame>>>()
    };
    match options.threads {
        None => fan_out(),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.get())
                .build()
                .map_err(|error| {
                    Error::Encode(format!(
                        "failed to build thread pool: {}",
                        error
                    ))
                })?;
            pool.install(fan_out)
        }
    }
}

/// Resamples and encodes `image` at every requested size and assembles the
/// frames into a container.
#[tracing::instrument(
    skip(image, options),
    fields(width = image.width(), height = image.height())
)]
pub fn build_container(
    image: &PixelBuffer,
    options: &ConvertOptions,
) -> Result<IconContainer> {
    let sizes = options.distinct_sizes();
    if sizes.is_empty() {
        return Err(Error::NoFrames);
    }
    let frames = render_frames(image, &sizes, options)?;
    IconContainer::new(frames)
}

/// Converts encoded source image bytes into the bytes of an ICO file.
pub fn convert_bytes(
    data: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let image = source::decode(data)?;
    build_container(&image, options)?.to_bytes()
}

/// Converts the image at `source_path` into an ICO file at
/// `destination_path`.  Nothing is written unless every stage succeeds.
#[tracing::instrument(skip(options))]
pub fn convert_file(
    source_path: &Path,
    destination_path: &Path,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let image = source::load(source_path)?;
    let container = build_container(&image, options)?;
    let data = container.to_bytes()?;
    writer::write_atomic(destination_path, &data, options.create_dirs)?;
    let sizes: Vec<SizeSpec> =
        container.frames().iter().map(IconFrame::size).collect();
    tracing::info!(
        frames = sizes.len(),
        bytes = data.len(),
        "wrote {}",
        destination_path.display()
    );
    Ok(Conversion { sizes, bytes_written: data.len() })
}

//===========================================================================//


//===========================================================================//
