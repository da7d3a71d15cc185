use std::fmt::Display;

use bytemuck::Pod;
use thiserror::Error;

use crate::curie;
use crate::params::CURIE;

pub type Bytes = Vec<u8>;

/// Copy a slice of plain numbers into a little endian byte buffer
pub fn to_bytes<T: Pod>(data: &[T]) -> Bytes {
    bytemuck::cast_slice(data).to_vec()
}

/// Which measurement a data array holds. The summary layer only ever reads the
/// m/z and intensity arrays; anything else is carried along by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ArrayType {
    #[default]
    Unknown,
    MZArray,
    IntensityArray,
    NonStandardDataArray {
        name: Box<String>,
    },
}

const MZ_ARRAY: CURIE = curie!(MS:1000514);
const INTENSITY_ARRAY: CURIE = curie!(MS:1000515);

impl Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown array"),
            Self::MZArray => f.write_str("m/z array"),
            Self::IntensityArray => f.write_str("intensity array"),
            Self::NonStandardDataArray { name } => f.write_str(name),
        }
    }
}

impl ArrayType {
    /// The element type writers conventionally use: `Float64` for m/z, `Float32` otherwise
    pub const fn preferred_dtype(&self) -> BinaryDataArrayType {
        match self {
            Self::MZArray => BinaryDataArrayType::Float64,
            _ => BinaryDataArrayType::Float32,
        }
    }

    pub fn nonstandard<S: ToString>(name: S) -> ArrayType {
        Self::NonStandardDataArray {
            name: Box::new(name.to_string()),
        }
    }

    /// The array kind a term like `MS:1000514` names
    pub fn from_curie(term: &CURIE) -> ArrayType {
        match *term {
            MZ_ARRAY => Self::MZArray,
            INTENSITY_ARRAY => Self::IntensityArray,
            _ => Self::Unknown,
        }
    }

    pub const fn as_curie(&self) -> Option<CURIE> {
        match self {
            Self::MZArray => Some(MZ_ARRAY),
            Self::IntensityArray => Some(INTENSITY_ARRAY),
            _ => None,
        }
    }
}

/// The numeric type each element of a data array is stored as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinaryDataArrayType {
    #[default]
    Unknown,
    Float64,
    Float32,
    Int64,
    Int32,
    ASCII,
}

impl Display for BinaryDataArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Float64 => "64-bit float",
            Self::Float32 => "32-bit float",
            Self::Int64 => "64-bit integer",
            Self::Int32 => "32-bit integer",
            Self::ASCII => "null-terminated ASCII string",
        };
        f.write_str(label)
    }
}

impl BinaryDataArrayType {
    /// Width of one element in bytes. Text and unknown buffers are read bytewise.
    pub const fn size_of(&self) -> usize {
        match self {
            Self::Float64 | Self::Int64 => 8,
            Self::Float32 | Self::Int32 => 4,
            Self::Unknown | Self::ASCII => 1,
        }
    }
}

/// How the bytes of a [`DataArray`](super::DataArray) are currently stored.
///
/// `NoCompression` and `Zlib` are base64 encoded text as found in XML formats,
/// `Decoded` is raw little endian bytes ready to be viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinaryCompressionType {
    #[default]
    NoCompression,
    Zlib,
    Decoded,
}

impl Display for BinaryCompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NoCompression => "base64",
            Self::Zlib => "zlib+base64",
            Self::Decoded => "decoded",
        };
        f.write_str(label)
    }
}

/// Failures while turning a stored array into numbers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayRetrievalError {
    #[error("No {0} is attached")]
    NotFound(ArrayType),
    #[error("Invalid base64 payload: {0}")]
    DecodingError(String),
    #[error("Invalid zlib stream: {0}")]
    DecompressionError(String),
    #[error("Buffer length is not a multiple of the element width")]
    DataTypeSizeMismatch,
    #[error("A {0} array cannot be read as numbers")]
    UnsupportedDataType(BinaryDataArrayType),
    #[error("m/z array has {mz} entries but the intensity array has {intensity}")]
    LengthMismatch { mz: usize, intensity: usize },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_array_terms() {
        assert_eq!(ArrayType::from_curie(&curie!(MS:1000514)), ArrayType::MZArray);
        assert_eq!(
            ArrayType::IntensityArray.as_curie(),
            Some(curie!(MS:1000515))
        );
        assert_eq!(ArrayType::from_curie(&curie!(MS:1000516)), ArrayType::Unknown);
        assert_eq!(ArrayType::nonstandard("ion mobility").as_curie(), None);
        assert_eq!(ArrayType::nonstandard("ion mobility").to_string(), "ion mobility");
        assert_eq!(
            ArrayRetrievalError::NotFound(ArrayType::MZArray).to_string(),
            "No m/z array is attached"
        );
    }
}
