//! The spectrum model the summary layer reads from.
//!
//! [`SpectrumLike`] is the seam: anything that can hand out a [`SpectrumDescription`]
//! and, on request, its (m/z, intensity) points can be summarized. [`RawSpectrum`] is
//! the stock implementation backed by a [`BinaryArrayMap`].
use crate::params::ParamList;
use crate::spectrum::bindata::{ArrayRetrievalError, BinaryArrayMap, MZIntensityPair};
use crate::spectrum::scan_properties::{Acquisition, Precursor, SpectrumDescription};

/// A trait for providing a uniform delegated access to spectrum metadata
pub trait SpectrumLike {
    /// The method to access the spectrum description itself, which supplies
    /// the data for most other methods on this trait.
    fn description(&self) -> &SpectrumDescription;

    /// Access the acquisition information for this spectrum.
    #[inline]
    fn acquisition(&self) -> &Acquisition {
        &self.description().acquisition
    }

    #[inline]
    fn precursors(&self) -> &[Precursor] {
        &self.description().precursors
    }

    #[inline]
    fn id(&self) -> &str {
        &self.description().id
    }

    /// Access the vendor native ID string for the spectrum
    #[inline]
    fn native_id(&self) -> &str {
        &self.description().native_id
    }

    /// Access the index of the spectrum in the source file
    #[inline]
    fn index(&self) -> usize {
        self.description().index
    }

    #[inline]
    fn params(&self) -> &ParamList {
        &self.description().params
    }

    /// Whether any binary data array is attached. This must not decode anything.
    fn has_binary_data_arrays(&self) -> bool;

    /// Decode the m/z and intensity arrays into a fresh list of points
    fn mz_intensity_pairs(&self) -> Result<Vec<MZIntensityPair>, ArrayRetrievalError>;
}

impl<T: SpectrumLike + ?Sized> SpectrumLike for &T {
    fn description(&self) -> &SpectrumDescription {
        (**self).description()
    }

    fn has_binary_data_arrays(&self) -> bool {
        (**self).has_binary_data_arrays()
    }

    fn mz_intensity_pairs(&self) -> Result<Vec<MZIntensityPair>, ArrayRetrievalError> {
        (**self).mz_intensity_pairs()
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
/// Represents a spectrum whose signal is held as (possibly still encoded) data arrays
pub struct RawSpectrum {
    /// The spectrum metadata describing acquisition conditions and details.
    pub description: SpectrumDescription,
    /// The data arrays describing the m/z, intensity, and potentially other
    /// measured properties
    pub arrays: BinaryArrayMap,
}

impl RawSpectrum {
    pub fn new(description: SpectrumDescription, arrays: BinaryArrayMap) -> Self {
        Self {
            description,
            arrays,
        }
    }
}

impl From<SpectrumDescription> for RawSpectrum {
    fn from(description: SpectrumDescription) -> Self {
        Self::new(description, BinaryArrayMap::new())
    }
}

impl SpectrumLike for RawSpectrum {
    #[inline]
    fn description(&self) -> &SpectrumDescription {
        &self.description
    }

    fn has_binary_data_arrays(&self) -> bool {
        !self.arrays.is_empty()
    }

    fn mz_intensity_pairs(&self) -> Result<Vec<MZIntensityPair>, ArrayRetrievalError> {
        self.arrays.mz_intensity_pairs()
    }
}
