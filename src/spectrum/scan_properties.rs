use std::sync::Arc;

use crate::curie;
use crate::impl_param_described;
use crate::meta::InstrumentConfiguration;
use crate::params::{find_param_by_curie, Param, ParamDescribed, ParamLike, ParamList, CURIE};

/// selected ion m/z
pub const SELECTED_ION_MZ: CURIE = curie!(MS:1000744);
/// m/z, the term older writers used on selected ions
pub const LEGACY_MZ: CURIE = curie!(MS:1000040);
/// charge state
pub const CHARGE_STATE: CURIE = curie!(MS:1000041);
/// peak intensity
pub const PEAK_INTENSITY: CURIE = curie!(MS:1000042);

#[derive(Default, Debug, Clone, PartialEq)]
/// Describes a single scan event. Unless additional post-processing is done,
/// there is usually only one event per spectrum.
pub struct ScanEvent {
    /// The instrument configuration the scan was acquired with, shared with the run
    pub instrument_configuration: Option<Arc<InstrumentConfiguration>>,
    pub params: ParamList,
}

impl ScanEvent {
    pub fn new(instrument_configuration: Option<Arc<InstrumentConfiguration>>) -> Self {
        Self {
            instrument_configuration,
            params: ParamList::new(),
        }
    }
}

pub type ScanEventList = Vec<ScanEvent>;

#[derive(Default, Debug, Clone, PartialEq)]
/// Describe the series of acquisition events that constructed the spectrum
/// being described.
pub struct Acquisition {
    pub scans: ScanEventList,
    pub params: ParamList,
}

impl Acquisition {
    pub fn first_scan(&self) -> Option<&ScanEvent> {
        self.scans.first()
    }

    pub fn first_scan_mut(&mut self) -> Option<&mut ScanEvent> {
        if self.scans.is_empty() {
            self.scans.push(ScanEvent::default());
        }
        self.scans.first_mut()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Describes a single selected ion from a precursor isolation. Its properties are
/// carried as controlled vocabulary terms.
pub struct SelectedIon {
    pub params: ParamList,
}

impl SelectedIon {
    fn first_of(&self, terms: &[CURIE]) -> Option<&Param> {
        terms
            .iter()
            .find_map(|term| find_param_by_curie(&self.params, term))
    }

    /// The selected ion's m/z as reported, written either as `selected ion m/z`
    /// or the older plain `m/z` term
    pub fn mz(&self) -> Option<f64> {
        self.first_of(&[SELECTED_ION_MZ, LEGACY_MZ])
            .and_then(|p| p.to_f64().ok())
    }

    pub fn charge(&self) -> Option<i32> {
        self.get_param_by_curie(&CHARGE_STATE)
            .and_then(|p| p.to_i32().ok())
    }

    pub fn intensity(&self) -> Option<f64> {
        self.get_param_by_curie(&PEAK_INTENSITY)
            .and_then(|p| p.to_f64().ok())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
/// Describes a precursor ion of the owning spectrum.
pub struct Precursor {
    /// The candidate ions selected in the isolation, in reported order
    pub selected_ions: Vec<SelectedIon>,
    /// Additional parameters describing this precursor ion
    pub params: ParamList,
}

impl Precursor {
    pub fn first_ion(&self) -> Option<&SelectedIon> {
        self.selected_ions.first()
    }
}

/**
The set of descriptive metadata that give context for how a mass spectrum was acquired
within a particular run.

Spectrum-level terms like `ms level` or `base peak m/z` are stored in `params`, while
the terms describing how the scan was taken live on the [`ScanEvent`]s of the
[`Acquisition`].
*/
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpectrumDescription {
    pub id: String,
    /// The vendor's own identifier for the spectrum. It is opaque and not necessarily numeric.
    pub native_id: String,
    pub index: usize,

    pub params: ParamList,
    pub acquisition: Acquisition,
    pub precursors: Vec<Precursor>,
}

impl SpectrumDescription {
    pub fn new<S: Into<String>, N: Into<String>>(id: S, native_id: N, index: usize) -> Self {
        Self {
            id: id.into(),
            native_id: native_id.into(),
            index,
            ..Default::default()
        }
    }

    pub fn first_scan(&self) -> Option<&ScanEvent> {
        self.acquisition.first_scan()
    }
}

impl_param_described!(
    Acquisition,
    Precursor,
    SelectedIon,
    ScanEvent,
    SpectrumDescription
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::ControlledVocabulary;

    #[test]
    fn test_selected_ion_terms() {
        let mut ion = SelectedIon::default();
        assert!(ion.mz().is_none());
        ion.add_param(ControlledVocabulary::MS.param_val(1000040, "m/z", "445.34"));
        assert_eq!(ion.mz(), Some(445.34));
        ion.add_param(ControlledVocabulary::MS.param_val(1000744, "selected ion m/z", "445.5"));
        assert_eq!(ion.mz(), Some(445.5));
        ion.add_param(ControlledVocabulary::MS.param_val(1000041, "charge state", "2"));
        ion.add_param(ControlledVocabulary::MS.param_val(1000042, "peak intensity", "1e5"));
        assert_eq!(ion.charge(), Some(2));
        assert_eq!(ion.intensity(), Some(100000.0));
    }

    #[test]
    fn test_first_scan_mut_creates() {
        let mut acquisition = Acquisition::default();
        assert!(acquisition.first_scan().is_none());
        acquisition
            .first_scan_mut()
            .unwrap()
            .add_param(ControlledVocabulary::MS.param_val(1000016, "scan start time", "1"));
        assert_eq!(acquisition.scans.len(), 1);
    }
}
