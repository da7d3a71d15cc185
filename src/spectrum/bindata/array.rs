use std::borrow::Cow;
use std::fmt::{self, Formatter};
use std::io::prelude::*;
use std::mem;

use bytemuck::Pod;
use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use num_traits::AsPrimitive;

use super::encodings::{
    to_bytes, ArrayRetrievalError, ArrayType, BinaryCompressionType, BinaryDataArrayType, Bytes,
};

/// Represents a data array that holds a byte buffer that may be compressed, base64 encoded,
/// or raw little endian bytes, and provides views of those bytes as numbers.
///
/// This type is modeled after the `<binaryDataArray>` element in mzML. Encoded buffers are
/// only decoded when a numeric view is requested, so holding an array is cheap until it
/// is read.
#[derive(Default, Clone, PartialEq)]
pub struct DataArray {
    pub data: Bytes,
    pub dtype: BinaryDataArrayType,
    pub compression: BinaryCompressionType,
    pub name: ArrayType,
}

impl core::fmt::Debug for DataArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataArray")
            .field("name", &self.name)
            .field("data size", &self.data.len())
            .field("dtype", &self.dtype)
            .field("compression", &self.compression)
            .finish()
    }
}

const EMPTY_BUFFER: [u8; 0] = [];

impl DataArray {
    pub fn new() -> DataArray {
        DataArray {
            ..Default::default()
        }
    }

    pub fn from_name(name: &ArrayType) -> DataArray {
        Self::from_name_and_type(name, name.preferred_dtype())
    }

    pub fn from_name_and_type(name: &ArrayType, dtype: BinaryDataArrayType) -> DataArray {
        DataArray {
            dtype,
            name: name.clone(),
            compression: BinaryCompressionType::Decoded,
            ..Default::default()
        }
    }

    /// Wrap an already decoded byte buffer
    pub fn wrap(name: &ArrayType, dtype: BinaryDataArrayType, data: Bytes) -> DataArray {
        DataArray {
            dtype,
            name: name.clone(),
            data,
            compression: BinaryCompressionType::Decoded,
            ..Default::default()
        }
    }

    /// Wrap a buffer that is still base64 encoded and possibly compressed
    pub fn wrap_encoded(
        name: &ArrayType,
        dtype: BinaryDataArrayType,
        compression: BinaryCompressionType,
        data: Bytes,
    ) -> DataArray {
        DataArray {
            dtype,
            name: name.clone(),
            data,
            compression,
            ..Default::default()
        }
    }

    pub fn push<T: Pod>(&mut self, value: T) -> Result<(), ArrayRetrievalError> {
        self.extend(&[value])
    }

    pub fn extend<T: Pod>(&mut self, values: &[T]) -> Result<(), ArrayRetrievalError> {
        if !matches!(self.compression, BinaryCompressionType::Decoded) {
            self.decode_and_store()?;
        };
        if self.dtype.size_of() != mem::size_of::<T>() {
            Err(ArrayRetrievalError::DataTypeSizeMismatch)
        } else {
            self.data.extend_from_slice(bytemuck::cast_slice(values));
            Ok(())
        }
    }

    pub fn compress_zlib(bytestring: &[u8]) -> Result<Bytes, ArrayRetrievalError> {
        let mut compressor = ZlibEncoder::new(Bytes::new(), Compression::best());
        compressor
            .write_all(bytestring)
            .and_then(|_| compressor.finish())
            .map_err(|e| ArrayRetrievalError::DecompressionError(e.to_string()))
    }

    pub fn decompress_zlib(bytestring: &[u8]) -> Result<Bytes, ArrayRetrievalError> {
        let mut decompressor = ZlibDecoder::new(Bytes::new());
        decompressor
            .write_all(bytestring)
            .and_then(|_| decompressor.finish())
            .map_err(|e| ArrayRetrievalError::DecompressionError(e.to_string()))
    }

    /// Render the decoded bytes of this array in the requested storage format
    pub fn encode_bytestring(
        &self,
        compression: BinaryCompressionType,
    ) -> Result<Bytes, ArrayRetrievalError> {
        if self.compression == compression {
            log::debug!("Fast-path encoding {}:{}", self.name, self.dtype);
            return Ok(self.data.clone());
        }
        let bytestring = self.decode()?;
        match compression {
            BinaryCompressionType::Decoded => Ok(bytestring.into_owned()),
            BinaryCompressionType::NoCompression => {
                Ok(base64_simd::STANDARD.encode_type::<Bytes>(bytestring.as_ref()))
            }
            BinaryCompressionType::Zlib => {
                let compressed = Self::compress_zlib(&bytestring)?;
                Ok(base64_simd::STANDARD.encode_type::<Bytes>(&compressed))
            }
        }
    }

    /// Get the raw little endian bytes of this array, decoding them if needed
    pub fn decode(&self) -> Result<Cow<'_, [u8]>, ArrayRetrievalError> {
        if self.data.is_empty() {
            return Ok(Cow::Borrowed(&EMPTY_BUFFER));
        }

        let base64_decode = || {
            base64_simd::STANDARD
                .decode_type::<Bytes>(&self.data)
                .map_err(|e| ArrayRetrievalError::DecodingError(e.to_string()))
        };

        match self.compression {
            BinaryCompressionType::Decoded => Ok(Cow::Borrowed(self.data.as_slice())),
            BinaryCompressionType::NoCompression => Ok(Cow::Owned(base64_decode()?)),
            BinaryCompressionType::Zlib => {
                let bytestring = base64_decode()?;
                Ok(Cow::Owned(Self::decompress_zlib(&bytestring)?))
            }
        }
    }

    /// Decode the buffer in place so later views can borrow it
    pub fn decode_and_store(&mut self) -> Result<usize, ArrayRetrievalError> {
        if matches!(self.compression, BinaryCompressionType::Decoded) {
            return Ok(self.data.len());
        }
        let data = self.decode()?.into_owned();
        self.data = data;
        self.compression = BinaryCompressionType::Decoded;
        Ok(self.data.len())
    }

    /// View the array as `f64` values, widening narrower types. Decoded `Float64`
    /// buffers are borrowed when their alignment allows it.
    pub fn to_f64(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        let buffer = self.decode()?;
        match self.dtype {
            BinaryDataArrayType::Float64 => match buffer {
                Cow::Borrowed(view) => match bytemuck::try_cast_slice::<u8, f64>(view) {
                    Ok(values) => Ok(Cow::Borrowed(values)),
                    Err(_) => Ok(Cow::Owned(convert_to_f64::<f64>(view)?)),
                },
                Cow::Owned(view) => Ok(Cow::Owned(convert_to_f64::<f64>(&view)?)),
            },
            BinaryDataArrayType::Float32 => Ok(Cow::Owned(convert_to_f64::<f32>(&buffer)?)),
            BinaryDataArrayType::Int64 => Ok(Cow::Owned(convert_to_f64::<i64>(&buffer)?)),
            BinaryDataArrayType::Int32 => Ok(Cow::Owned(convert_to_f64::<i32>(&buffer)?)),
            BinaryDataArrayType::ASCII | BinaryDataArrayType::Unknown => {
                Err(ArrayRetrievalError::UnsupportedDataType(self.dtype))
            }
        }
    }

    /// The number of elements in the array
    pub fn data_len(&self) -> Result<usize, ArrayRetrievalError> {
        let width = self.dtype.size_of();
        let n = self.decode()?.len();
        if n % width != 0 {
            Err(ArrayRetrievalError::DataTypeSizeMismatch)
        } else {
            Ok(n / width)
        }
    }
}

impl<T: Pod> From<(ArrayType, BinaryDataArrayType, &[T])> for DataArray {
    fn from((name, dtype, values): (ArrayType, BinaryDataArrayType, &[T])) -> Self {
        DataArray::wrap(&name, dtype, to_bytes(values))
    }
}

fn convert_to_f64<S: Pod + AsPrimitive<f64>>(buffer: &[u8]) -> Result<Vec<f64>, ArrayRetrievalError> {
    let width = mem::size_of::<S>();
    if buffer.len() % width != 0 {
        return Err(ArrayRetrievalError::DataTypeSizeMismatch);
    }
    Ok(buffer
        .chunks_exact(width)
        .map(|chunk| bytemuck::pod_read_unaligned::<S>(chunk).as_())
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    fn mz_array() -> DataArray {
        let mut array = DataArray::from_name(&ArrayType::MZArray);
        array.extend(&[100.5f64, 200.25, 300.125]).unwrap();
        array
    }

    #[test]
    fn test_widen_float32() {
        let mut array = DataArray::from_name(&ArrayType::IntensityArray);
        array.push(10.0f32).unwrap();
        array.push(20.5f32).unwrap();
        assert_eq!(array.data_len().unwrap(), 2);
        assert_eq!(array.to_f64().unwrap().as_ref(), &[10.0, 20.5]);
        assert_eq!(
            array.push(1.0f64),
            Err(ArrayRetrievalError::DataTypeSizeMismatch)
        );
    }

    #[test]
    fn test_encoded_round_trip() {
        let array = mz_array();
        for compression in [BinaryCompressionType::NoCompression, BinaryCompressionType::Zlib] {
            let encoded = array.encode_bytestring(compression).unwrap();
            let mut restored = DataArray::wrap_encoded(
                &ArrayType::MZArray,
                BinaryDataArrayType::Float64,
                compression,
                encoded,
            );
            assert_eq!(
                restored.to_f64().unwrap().as_ref(),
                array.to_f64().unwrap().as_ref()
            );
            restored.decode_and_store().unwrap();
            assert_eq!(restored.compression, BinaryCompressionType::Decoded);
            assert_eq!(restored.data, array.data);
        }
    }

    #[test]
    fn test_corrupt_buffers() {
        let bad_base64 = DataArray::wrap_encoded(
            &ArrayType::MZArray,
            BinaryDataArrayType::Float64,
            BinaryCompressionType::NoCompression,
            b"@@not base64@@".to_vec(),
        );
        assert!(matches!(
            bad_base64.to_f64(),
            Err(ArrayRetrievalError::DecodingError(_))
        ));

        let ragged = DataArray::wrap(
            &ArrayType::MZArray,
            BinaryDataArrayType::Float64,
            vec![0u8; 12],
        );
        assert_eq!(
            ragged.to_f64(),
            Err(ArrayRetrievalError::DataTypeSizeMismatch)
        );

        let text = DataArray::wrap(
            &ArrayType::nonstandard("notes"),
            BinaryDataArrayType::ASCII,
            b"abc".to_vec(),
        );
        assert_eq!(
            text.to_f64(),
            Err(ArrayRetrievalError::UnsupportedDataType(
                BinaryDataArrayType::ASCII
            ))
        );
    }
}
