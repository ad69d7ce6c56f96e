use std::io;
use std::path::PathBuf;

//===========================================================================//

/// A specialized `Result` type for icon conversion.
pub type Result<T> = std::result::Result<T, Error>;

/// The ways an icon conversion can fail.  Each variant's message starts with
/// the stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The source image path does not exist.
    #[error("input: source file {} does not exist", path.display())]
    InputNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The source image exists but could not be read.
    #[error("input: could not read {}: {source}", path.display())]
    Read {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The source bytes are not a supported, well-formed raster image.
    #[error("decode: {0}")]
    Decode(String),

    /// A requested frame size is outside of `[1, 256]`.
    #[error("size: invalid icon size {size} (must be between 1 and 256)")]
    InvalidSize {
        /// The rejected size.
        size: i64,
    },

    /// No frames were requested.
    #[error("size: no icon sizes were requested")]
    NoFrames,

    /// A frame payload or the container could not be built.
    #[error("encode: {0}")]
    Encode(String),

    /// The destination could not be created or written.
    #[error("write: could not write {}: {source}", path.display())]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns a short name for the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match *self {
            Error::InputNotFound { .. } | Error::Read { .. } => "input",
            Error::Decode(_) => "decode",
            Error::InvalidSize { .. } | Error::NoFrames => "size",
            Error::Encode(_) => "encode",
            Error::Write { .. } => "write",
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::Error;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn messages_name_their_stage() {
        let missing = Error::InputNotFound { path: PathBuf::from("a.png") };
        assert!(missing.to_string().starts_with("input:"));
        assert!(missing.to_string().contains("a.png"));
        assert!(Error::Decode("x".to_string())
            .to_string()
            .starts_with("decode:"));
        assert!(Error::InvalidSize { size: 300 }
            .to_string()
            .contains("300"));
        assert!(Error::Encode("x".to_string())
            .to_string()
            .starts_with("encode:"));
    }

    #[test]
    fn write_error_keeps_its_source() {
        let error = Error::Write {
            path: PathBuf::from("out/app.ico"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        };
        assert_eq!(error.stage(), "write");
        assert!(error.to_string().contains("nope"));
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "nope");
    }

    #[test]
    fn stages() {
        assert_eq!(Error::NoFrames.stage(), "size");
        assert_eq!(Error::InvalidSize { size: 0 }.stage(), "size");
        assert_eq!(Error::Decode(String::new()).stage(), "decode");
        let read = Error::Read {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        };
        assert_eq!(read.stage(), "input");
    }
}

//===========================================================================//
