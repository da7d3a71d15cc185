//! The traits needed to work with spectra, parameters and tables
pub use crate::io::TabHandler;
pub use crate::meta::CVResolver;
pub use crate::params::{ParamDescribed, ParamLike};
pub use crate::spectrum::SpectrumLike;
