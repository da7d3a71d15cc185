//! Reading auxiliary delimited text files, like the tab-separated tables that often
//! accompany mass spectrometry runs.
pub mod tab;

pub use crate::io::tab::{DefaultTabHandler, TabHandler, TabReader, TabReaderError};
