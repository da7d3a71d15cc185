mod array;
mod encodings;
mod map;

pub use array::DataArray;
pub use encodings::{
    to_bytes, ArrayRetrievalError, ArrayType, BinaryCompressionType, BinaryDataArrayType, Bytes,
};
pub use map::{BinaryArrayMap, MZIntensityPair};
