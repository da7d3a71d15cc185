//! Metadata that describe the instrument and the controlled vocabulary used to tag it.
pub mod instrument;
pub mod ontology;

pub use crate::meta::instrument::{Component, ComponentType, InstrumentConfiguration};
pub use crate::meta::ontology::{psi_ms, CVResolver, Ontology, TermEntry};
