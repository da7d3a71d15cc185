//! `mzsummary` flattens the controlled vocabulary metadata attached to a mass spectrum
//! into a fixed-shape [`SpectrumSummary`] record, and reads the delimited text tables
//! that often travel alongside spectra.
//!
//! ```
//! use mzsummary::prelude::*;
//! use mzsummary::params::ControlledVocabulary;
//! use mzsummary::spectrum::{RawSpectrum, SpectrumDescription};
//! use mzsummary::SpectrumSummary;
//!
//! let mut description = SpectrumDescription::new("scan=12", "12", 0);
//! description.add_param(ControlledVocabulary::MS.param_val(1000511, "ms level", 1));
//! let spectrum = RawSpectrum::from(description);
//!
//! let summary = SpectrumSummary::from_spectrum(&spectrum);
//! assert_eq!(summary.scan_number, 12);
//! assert_eq!(summary.ms_level, 1);
//! ```
pub mod io;
pub mod meta;
pub mod params;
pub mod prelude;
pub mod spectrum;
pub mod summary;

pub use crate::io::{DefaultTabHandler, TabHandler, TabReader, TabReaderError};
pub use crate::meta::{psi_ms, CVResolver, Ontology};
pub use crate::params::{Param, ParamDescribed, ParamLike, CURIE};
pub use crate::spectrum::{MZIntensityPair, RawSpectrum, SpectrumLike};
pub use crate::summary::{summarize_all, DetailLevel, PrecursorSummary, SpectrumSummary};
