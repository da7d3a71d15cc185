//! Flatten a spectrum's controlled vocabulary metadata into a fixed-shape record.
//!
//! [`SpectrumSummary`] is what reporting and export code consumes: plain numbers and
//! strings, each with a well-defined default, regardless of which terms a vendor
//! chose to write. Extraction never fails. A missing or unreadable term leaves its
//! field at the default and is noted at `debug` level.
//!
//! Scalar fields are filled from [`SUMMARY_RULES`], a table mapping each field to
//! the section of the description it is read from, the term(s) it is written as,
//! and how the value is coerced.
use log::{debug, warn};

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use crate::curie;
use crate::meta::ontology::{psi_ms, CVResolver, FT_ICR, ION_TRAP, MASS_ANALYZER_TYPE, ORBITRAP};
use crate::params::{
    find_param_by_curie, Param, ParamDescribed, ParamLike, ParamValueParseError, CURIE,
};
use crate::spectrum::bindata::MZIntensityPair;
use crate::spectrum::scan_properties::{Precursor, ScanEvent, SpectrumDescription};
use crate::spectrum::SpectrumLike;

/// The user parameter Thermo writers use for the monoisotopic m/z the instrument
/// determined for the precursor
pub const VENDOR_MONOISOTOPIC_MZ_LABEL: &str = "[Thermo Trailer Extra]Monoisotopic M/Z:";

/// How much of a spectrum to project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetailLevel {
    /// Project metadata and copy the peak data
    #[default]
    Full,
    /// Project metadata only, never touching the data arrays
    MetadataOnly,
}

/// Which part of the spectrum description a term is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSection {
    /// The first scan event of the acquisition
    Scan,
    /// The spectrum itself
    Spectrum,
}

/// How a term's value becomes a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    Integer,
    Float,
    Text,
    /// A time, converted to seconds using the term's unit
    Seconds,
}

/// The scalar fields of [`SpectrumSummary`] that are read from a single term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    ScanEvent,
    MsLevel,
    RetentionTime,
    FilterString,
    MzLow,
    MzHigh,
    BasePeakMz,
    BasePeakIntensity,
    TotalIonCurrent,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Integer(i32),
    Float(f64),
    Text(String),
}

impl Coercion {
    fn apply(&self, param: &Param) -> Result<FieldValue, ParamValueParseError> {
        match self {
            Coercion::Integer => param.to_i32().map(FieldValue::Integer),
            Coercion::Float => param.to_f64().map(FieldValue::Float),
            Coercion::Text => Ok(FieldValue::Text(param.value.clone())),
            Coercion::Seconds => param.to_seconds().map(FieldValue::Float),
        }
    }
}

impl SummaryField {
    /// How the term backing this field is read
    pub const fn coercion(&self) -> Coercion {
        match self {
            SummaryField::ScanEvent | SummaryField::MsLevel => Coercion::Integer,
            SummaryField::RetentionTime => Coercion::Seconds,
            SummaryField::FilterString => Coercion::Text,
            SummaryField::MzLow
            | SummaryField::MzHigh
            | SummaryField::BasePeakMz
            | SummaryField::BasePeakIntensity
            | SummaryField::TotalIonCurrent => Coercion::Float,
        }
    }

    /// Store `value` if it has this field's type. Anything else leaves the field untouched.
    fn assign(&self, summary: &mut SpectrumSummary, value: FieldValue) {
        match (self, value) {
            (SummaryField::ScanEvent, FieldValue::Integer(v)) => summary.scan_event = v,
            (SummaryField::MsLevel, FieldValue::Integer(v)) => summary.ms_level = v,
            (SummaryField::RetentionTime, FieldValue::Float(v)) => summary.retention_time = v,
            (SummaryField::FilterString, FieldValue::Text(v)) => summary.filter_string = v,
            (SummaryField::MzLow, FieldValue::Float(v)) => summary.mz_low = v,
            (SummaryField::MzHigh, FieldValue::Float(v)) => summary.mz_high = v,
            (SummaryField::BasePeakMz, FieldValue::Float(v)) => summary.base_peak_mz = v,
            (SummaryField::BasePeakIntensity, FieldValue::Float(v)) => {
                summary.base_peak_intensity = v
            }
            (SummaryField::TotalIonCurrent, FieldValue::Float(v)) => summary.total_ion_current = v,
            (field, value) => {
                debug!("Discarding {value:?}, which does not fit {field:?}");
            }
        }
    }
}

/// One row of the extraction table. `terms` are tried in order and the first one
/// present on the section is used. The value is read as the field's [`Coercion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: SummaryField,
    pub section: ParamSection,
    pub terms: &'static [CURIE],
}

impl FieldRule {
    const fn new(field: SummaryField, section: ParamSection, terms: &'static [CURIE]) -> Self {
        Self {
            field,
            section,
            terms,
        }
    }

    fn find<'a>(&self, params: &'a [Param]) -> Option<&'a Param> {
        self.terms
            .iter()
            .find_map(|term| find_param_by_curie(params, term))
    }

    fn apply(&self, summary: &mut SpectrumSummary, description: &SpectrumDescription) {
        let params = match self.section {
            ParamSection::Scan => match description.first_scan() {
                Some(scan) => scan.params(),
                None => return,
            },
            ParamSection::Spectrum => description.params(),
        };
        let Some(param) = self.find(params) else {
            return;
        };
        match self.field.coercion().apply(param) {
            Ok(value) => self.field.assign(summary, value),
            Err(e) => {
                debug!(
                    "Failed to read {:?} from {} in {}: {e}",
                    self.field, param.name, description.id
                );
            }
        }
    }
}

pub const PRESET_SCAN_CONFIGURATION: CURIE = curie!(MS:1000616);
pub const MS_LEVEL: CURIE = curie!(MS:1000511);
pub const SCAN_START_TIME: CURIE = curie!(MS:1000016);
pub const FILTER_STRING: CURIE = curie!(MS:1000512);
pub const LOWEST_OBSERVED_MZ: CURIE = curie!(MS:1000528);
pub const HIGHEST_OBSERVED_MZ: CURIE = curie!(MS:1000527);
pub const BASE_PEAK_MZ: CURIE = curie!(MS:1000504);
pub const BASE_PEAK_INTENSITY: CURIE = curie!(MS:1000505);
pub const TOTAL_ION_CURRENT: CURIE = curie!(MS:1000285);

/// The scalar field extraction rules, applied in order
pub const SUMMARY_RULES: &[FieldRule] = &[
    FieldRule::new(
        SummaryField::ScanEvent,
        ParamSection::Scan,
        &[PRESET_SCAN_CONFIGURATION],
    ),
    FieldRule::new(
        SummaryField::MsLevel,
        ParamSection::Spectrum,
        &[MS_LEVEL],
    ),
    FieldRule::new(
        SummaryField::RetentionTime,
        ParamSection::Scan,
        &[SCAN_START_TIME],
    ),
    FieldRule::new(
        SummaryField::FilterString,
        ParamSection::Scan,
        &[FILTER_STRING],
    ),
    FieldRule::new(
        SummaryField::MzLow,
        ParamSection::Spectrum,
        &[LOWEST_OBSERVED_MZ],
    ),
    FieldRule::new(
        SummaryField::MzHigh,
        ParamSection::Spectrum,
        &[HIGHEST_OBSERVED_MZ],
    ),
    FieldRule::new(
        SummaryField::BasePeakMz,
        ParamSection::Spectrum,
        &[BASE_PEAK_MZ],
    ),
    FieldRule::new(
        SummaryField::BasePeakIntensity,
        ParamSection::Spectrum,
        &[BASE_PEAK_INTENSITY],
    ),
    FieldRule::new(
        SummaryField::TotalIonCurrent,
        ParamSection::Spectrum,
        &[TOTAL_ION_CURRENT],
    ),
];

/// The summary of one precursor entry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecursorSummary {
    /// Not populated yet, always zero
    pub index: usize,
    pub mz: f64,
    pub charge: i32,
    pub intensity: f64,
}

impl PrecursorSummary {
    /// Only the first selected ion is read. Additional candidate ions are ignored.
    pub fn from_precursor(precursor: &Precursor) -> Self {
        let mut this = Self::default();
        if let Some(ion) = precursor.first_ion() {
            this.mz = ion.mz().unwrap_or_default();
            this.charge = ion.charge().unwrap_or_default();
            this.intensity = ion.intensity().unwrap_or_default();
        }
        this
    }
}

/// A flat, self-contained summary of a spectrum's metadata and, optionally, its peaks
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumSummary {
    pub id: String,
    pub native_id: String,
    /// [`SpectrumSummary::UNSET_INDEX`] until populated from a spectrum
    pub index: usize,
    /// Read from `native_id` when it is a plain integer, otherwise 0
    pub scan_number: i32,
    /// The analyzer term of the scan's instrument configuration, `None` when unknown
    pub mass_analyzer_type: Option<CURIE>,
    pub scan_event: i32,
    pub ms_level: i32,
    /// In seconds
    pub retention_time: f64,
    pub filter_string: String,
    pub mz_low: f64,
    pub mz_high: f64,
    pub base_peak_mz: f64,
    pub base_peak_intensity: f64,
    pub total_ion_current: f64,
    pub vendor_monoisotopic_mz: f64,
    pub precursors: Vec<PrecursorSummary>,
    pub peaks: Vec<MZIntensityPair>,
}

impl Default for SpectrumSummary {
    fn default() -> Self {
        Self {
            id: String::new(),
            native_id: String::new(),
            index: Self::UNSET_INDEX,
            scan_number: 0,
            mass_analyzer_type: None,
            scan_event: 0,
            ms_level: 0,
            retention_time: 0.0,
            filter_string: String::new(),
            mz_low: 0.0,
            mz_high: 0.0,
            base_peak_mz: 0.0,
            base_peak_intensity: 0.0,
            total_ion_current: 0.0,
            vendor_monoisotopic_mz: 0.0,
            precursors: Vec::new(),
            peaks: Vec::new(),
        }
    }
}

/// Interpret a native ID as a scan number if it is a plain base-10 integer
pub fn native_id_to_scan_number(native_id: &str) -> i32 {
    native_id.parse::<i32>().unwrap_or_default()
}

fn resolve_mass_analyzer_type(scan: &ScanEvent, cv: &dyn CVResolver) -> Option<CURIE> {
    let config = scan.instrument_configuration.as_ref()?;
    let Some(analyzer) = config.analyzer(0) else {
        debug!("Instrument configuration {} has no analyzer", config.id);
        return None;
    };
    analyzer
        .param_child_of(&MASS_ANALYZER_TYPE, cv)
        .and_then(|p| p.curie())
}

fn vendor_monoisotopic_mz(scan: &ScanEvent) -> Option<f64> {
    let param = scan.get_user_param(VENDOR_MONOISOTOPIC_MZ_LABEL)?;
    if param.value.trim().is_empty() {
        return None;
    }
    param
        .to_f64()
        .inspect_err(|e| debug!("Failed to read vendor monoisotopic m/z: {e}"))
        .ok()
}

impl SpectrumSummary {
    /// The `index` of a summary that was never populated
    pub const UNSET_INDEX: usize = usize::MAX;

    pub fn new() -> Self {
        Self::default()
    }

    /// Summarize `spectrum` in full using the built-in PSI-MS terms
    pub fn from_spectrum<S: SpectrumLike + ?Sized>(spectrum: &S) -> Self {
        Self::from_spectrum_with(spectrum, psi_ms(), DetailLevel::Full)
    }

    pub fn from_spectrum_with<S: SpectrumLike + ?Sized>(
        spectrum: &S,
        cv: &dyn CVResolver,
        detail_level: DetailLevel,
    ) -> Self {
        let mut this = Self::default();
        this.update_with(spectrum, cv, detail_level);
        this
    }

    pub fn is_index_set(&self) -> bool {
        self.index != Self::UNSET_INDEX
    }

    /// Re-populate this summary from `spectrum` in full using the built-in PSI-MS terms
    pub fn update<S: SpectrumLike + ?Sized>(&mut self, spectrum: &S) {
        self.update_with(spectrum, psi_ms(), DetailLevel::Full)
    }

    /// Re-populate this summary from `spectrum`.
    ///
    /// Every field is reset first, so the result depends only on `spectrum`,
    /// and repeated calls with the same spectrum produce the same record.
    /// The peak data are only requested from `spectrum` when `detail_level` is
    /// [`DetailLevel::Full`] and the spectrum reports that it has data arrays.
    pub fn update_with<S: SpectrumLike + ?Sized>(
        &mut self,
        spectrum: &S,
        cv: &dyn CVResolver,
        detail_level: DetailLevel,
    ) {
        *self = Self::default();
        let description = spectrum.description();

        self.id = spectrum.id().to_string();
        self.native_id = spectrum.native_id().to_string();
        self.index = spectrum.index();
        self.scan_number = native_id_to_scan_number(&self.native_id);

        let scan = description.first_scan();
        self.mass_analyzer_type = scan.and_then(|s| resolve_mass_analyzer_type(s, cv));

        for rule in SUMMARY_RULES {
            rule.apply(self, description);
        }

        if let Some(mz) = scan.and_then(vendor_monoisotopic_mz) {
            self.vendor_monoisotopic_mz = mz;
        }

        self.precursors = spectrum
            .precursors()
            .iter()
            .map(PrecursorSummary::from_precursor)
            .collect();

        if detail_level == DetailLevel::Full && spectrum.has_binary_data_arrays() {
            match spectrum.mz_intensity_pairs() {
                Ok(peaks) => self.peaks = peaks,
                Err(e) => {
                    warn!("Failed to read peak data for {}: {e}", self.id);
                }
            }
        }
    }

    /// Drop the peak data and release its memory. Nothing else changes.
    pub fn clear_binary_data(&mut self) {
        self.peaks = Vec::new();
    }

    pub fn mass_analyzer_type_abbreviation(&self) -> &'static str {
        self.mass_analyzer_type_abbreviation_with(psi_ms())
    }

    /// A short label for the mass analyzer: `IonTrap` for any kind of ion trap,
    /// `FT` for FT-ICR, `Orbitrap`, or `Unknown`
    pub fn mass_analyzer_type_abbreviation_with(&self, cv: &dyn CVResolver) -> &'static str {
        match self.mass_analyzer_type {
            Some(term) if cv.is_a(&term, &ION_TRAP) => "IonTrap",
            Some(term) if term == FT_ICR => "FT",
            Some(term) if term == ORBITRAP => "Orbitrap",
            _ => "Unknown",
        }
    }

    /// Read the precursor m/z out of a Thermo-style filter string, e.g. `810.4132`
    /// from `FTMS + p NSI Full ms2 810.4132@hcd27.00`. The first token holding an
    /// `@` decides the result; 0 when there is none or it does not start with a number.
    pub fn mz_from_filter_string(&self) -> f64 {
        let Some((mz, _)) = self
            .filter_string
            .split_whitespace()
            .find_map(|token| token.split_once('@'))
        else {
            return 0.0;
        };
        mz.parse::<f64>().unwrap_or_else(|e| {
            debug!("Failed to read an m/z from {:?}: {e}", self.filter_string);
            0.0
        })
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Summarize each spectrum with the built-in PSI-MS terms, in input order
#[cfg(not(feature = "parallelism"))]
pub fn summarize_all<S: SpectrumLike>(spectra: &[S], detail_level: DetailLevel) -> Vec<SpectrumSummary> {
    spectra
        .iter()
        .map(|s| SpectrumSummary::from_spectrum_with(s, psi_ms(), detail_level))
        .collect()
}

/// Summarize each spectrum with the built-in PSI-MS terms, in input order,
/// spreading the work over the rayon thread pool
#[cfg(feature = "parallelism")]
pub fn summarize_all<S: SpectrumLike + Sync>(
    spectra: &[S],
    detail_level: DetailLevel,
) -> Vec<SpectrumSummary> {
    spectra
        .par_iter()
        .map(|s| SpectrumSummary::from_spectrum_with(s, psi_ms(), detail_level))
        .collect()
}
