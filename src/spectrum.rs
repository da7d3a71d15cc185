//! Represent the metadata and signal that compose a single mass spectrum.
pub mod bindata;
pub mod scan_properties;
pub mod spectrum_types;

pub use crate::spectrum::bindata::{
    ArrayRetrievalError, ArrayType, BinaryArrayMap, BinaryCompressionType, BinaryDataArrayType,
    DataArray, MZIntensityPair,
};
pub use crate::spectrum::scan_properties::*;
pub use crate::spectrum::spectrum_types::{RawSpectrum, SpectrumLike};
