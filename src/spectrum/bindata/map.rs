use std::borrow::Cow;
use std::collections::hash_map::Iter;
use std::collections::HashMap;

use super::array::DataArray;
use super::encodings::{ArrayRetrievalError, ArrayType};

/// A single (m/z, intensity) point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MZIntensityPair {
    pub mz: f64,
    pub intensity: f64,
}

impl MZIntensityPair {
    pub const fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// The data arrays of one spectrum, keyed by what they measure
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BinaryArrayMap {
    pub byte_buffer_map: HashMap<ArrayType, DataArray>,
}

impl BinaryArrayMap {
    pub fn new() -> BinaryArrayMap {
        BinaryArrayMap {
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.byte_buffer_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_buffer_map.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, ArrayType, DataArray> {
        self.byte_buffer_map.iter()
    }

    /// Store `array` under its own name, replacing any array of the same kind
    pub fn add(&mut self, array: DataArray) {
        self.byte_buffer_map.insert(array.name.clone(), array);
    }

    pub fn get(&self, array_type: &ArrayType) -> Option<&DataArray> {
        self.byte_buffer_map.get(array_type)
    }

    pub fn clear(&mut self) {
        self.byte_buffer_map.clear();
    }

    fn get_f64(&self, array_type: &ArrayType) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        self.get(array_type)
            .ok_or_else(|| ArrayRetrievalError::NotFound(array_type.clone()))?
            .to_f64()
    }

    /// The m/z array, decoded and widened to `f64`
    pub fn mzs(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        self.get_f64(&ArrayType::MZArray)
    }

    /// The intensity array, decoded and widened to `f64`
    pub fn intensities(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        self.get_f64(&ArrayType::IntensityArray)
    }

    /// Decode the m/z and intensity arrays and pair them up point by point.
    ///
    /// The two arrays must be the same length.
    pub fn mz_intensity_pairs(&self) -> Result<Vec<MZIntensityPair>, ArrayRetrievalError> {
        let mzs = self.mzs()?;
        let intensities = self.intensities()?;
        if mzs.len() != intensities.len() {
            return Err(ArrayRetrievalError::LengthMismatch {
                mz: mzs.len(),
                intensity: intensities.len(),
            });
        }
        Ok(mzs
            .iter()
            .zip(intensities.iter())
            .map(|(mz, intensity)| MZIntensityPair::new(*mz, *intensity))
            .collect())
    }
}
