//! Controlled vocabulary and user parameters.
//!
//! A [`Param`] is either a controlled vocabulary term (it carries a [`CURIE`]) or a
//! free-text user parameter (it has only a name and a value). Both kinds live in the
//! same [`ParamList`] and are looked up through the [`ParamDescribed`] trait.
use std::fmt::Display;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

use crate::meta::ontology::CVResolver;

/// The controlled vocabularies a [`CURIE`] may be drawn from
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlledVocabulary {
    MS,
    UO,
    Unknown,
}

const MS_CV: &str = "MS";
const UO_CV: &str = "UO";

impl ControlledVocabulary {
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::MS => MS_CV,
            Self::UO => UO_CV,
            Self::Unknown => "?",
        }
    }

    /// Build a [`CURIE`] in this controlled vocabulary
    pub const fn curie(&self, accession: u32) -> CURIE {
        CURIE::new(*self, accession)
    }

    pub fn param<S: Into<String>>(&self, accession: u32, name: S) -> Param {
        Param {
            name: name.into(),
            accession: Some(accession),
            controlled_vocabulary: Some(*self),
            ..Default::default()
        }
    }

    pub fn param_val<S: Into<String>, V: ToString>(
        &self,
        accession: u32,
        name: S,
        value: V,
    ) -> Param {
        let mut param = self.param(accession, name);
        param.value = value.to_string();
        param
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlledVocabularyResolutionError {
    #[error("Unrecognized controlled vocabulary {0}")]
    UnknownControlledVocabulary(String),
}

impl FromStr for ControlledVocabulary {
    type Err = ControlledVocabularyResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MS" | "PSI-MS" => Ok(Self::MS),
            "UO" => Ok(Self::UO),
            _ => Err(ControlledVocabularyResolutionError::UnknownControlledVocabulary(
                s.to_string(),
            )),
        }
    }
}

/// A compact, `Copy`-able reference to a controlled vocabulary term like `MS:1000511`
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CURIE {
    pub controlled_vocabulary: ControlledVocabulary,
    pub accession: u32,
}

impl CURIE {
    pub const fn new(controlled_vocabulary: ControlledVocabulary, accession: u32) -> Self {
        Self {
            controlled_vocabulary,
            accession,
        }
    }
}

impl Display for CURIE {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:07}",
            self.controlled_vocabulary.prefix(),
            self.accession
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CURIEParsingError {
    #[error("{0:?} is not a CURIE, no namespace separator found")]
    MissingNamespaceSeparator(String),
    #[error(transparent)]
    UnknownControlledVocabulary(#[from] ControlledVocabularyResolutionError),
    #[error("Failed to parse accession number: {0}")]
    AccessionParsingError(#[from] ParseIntError),
}

impl FromStr for CURIE {
    type Err = CURIEParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, accession) = s
            .split_once(':')
            .ok_or_else(|| CURIEParsingError::MissingNamespaceSeparator(s.to_string()))?;
        let controlled_vocabulary = prefix.parse::<ControlledVocabulary>()?;
        let accession = accession.parse::<u32>()?;
        Ok(CURIE::new(controlled_vocabulary, accession))
    }
}

/// Build a [`CURIE`] constant from its written form, e.g. `curie!(MS:1000511)`
#[macro_export]
macro_rules! curie {
    (MS:$acc:literal) => {
        $crate::params::CURIE::new($crate::params::ControlledVocabulary::MS, $acc)
    };
    (UO:$acc:literal) => {
        $crate::params::CURIE::new($crate::params::ControlledVocabulary::UO, $acc)
    };
}

/// Failures while interpreting a parameter's value as some other type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamValueParseError {
    #[error("Failed to parse {value:?} as a floating point number: {source}")]
    FloatParse {
        value: String,
        source: ParseFloatError,
    },
    #[error("Failed to parse {value:?} as an integer: {source}")]
    IntParse {
        value: String,
        source: ParseIntError,
    },
    #[error("The unit {0:?} is not a unit of time")]
    NotATimeUnit(Unit),
}

pub trait ParamLike {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
    fn accession(&self) -> Option<u32>;
    fn controlled_vocabulary(&self) -> Option<ControlledVocabulary>;
    fn unit(&self) -> Unit;

    fn is_controlled(&self) -> bool {
        self.accession().is_some()
    }

    fn curie(&self) -> Option<CURIE> {
        match (self.controlled_vocabulary(), self.accession()) {
            (Some(cv), Some(acc)) => Some(CURIE::new(cv, acc)),
            _ => None,
        }
    }

    fn to_f64(&self) -> Result<f64, ParamValueParseError> {
        let value = self.value().trim();
        value
            .parse::<f64>()
            .map_err(|source| ParamValueParseError::FloatParse {
                value: value.to_string(),
                source,
            })
    }

    fn to_i32(&self) -> Result<i32, ParamValueParseError> {
        let value = self.value().trim();
        value
            .parse::<i32>()
            .map_err(|source| ParamValueParseError::IntParse {
                value: value.to_string(),
                source,
            })
    }

    /// Interpret the value as a time and express it in seconds according to
    /// the parameter's [`Unit`]. A value without a unit is taken to be in seconds.
    fn to_seconds(&self) -> Result<f64, ParamValueParseError> {
        let value = self.to_f64()?;
        let unit = self.unit();
        match unit.seconds_per_unit() {
            Some(scale) => Ok(value * scale),
            None => Err(ParamValueParseError::NotATimeUnit(unit)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
    pub accession: Option<u32>,
    pub controlled_vocabulary: Option<ControlledVocabulary>,
    pub unit: Unit,
}

impl Param {
    pub fn new() -> Param {
        Param {
            ..Default::default()
        }
    }

    /// Create a user parameter, one which is not tied to a controlled vocabulary
    pub fn new_key_value<K: Into<String>, V: Into<String>>(name: K, value: V) -> Param {
        let mut inst = Self::new();
        inst.name = name.into();
        inst.value = value.into();
        inst
    }

    pub fn with_unit<S: AsRef<str>, A: AsRef<str>>(mut self, accession: S, name: A) -> Param {
        self.unit = Unit::from_accession(accession.as_ref());
        if matches!(self.unit, Unit::Unknown) {
            self.unit = Unit::from_name(name.as_ref());
        }
        self
    }

    pub fn with_unit_t(mut self, unit: &Unit) -> Param {
        self.unit = *unit;
        self
    }
}

impl ParamLike for Param {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn accession(&self) -> Option<u32> {
        self.accession
    }

    fn controlled_vocabulary(&self) -> Option<ControlledVocabulary> {
        self.controlled_vocabulary
    }

    fn unit(&self) -> Unit {
        self.unit
    }
}

pub type ParamList = Vec<Param>;

/// Find the first parameter in `params` whose term is exactly `curie`
pub fn find_param_by_curie<'a>(params: &'a [Param], curie: &CURIE) -> Option<&'a Param> {
    params.iter().find(|p| p.curie().as_ref() == Some(curie))
}

/// Find the first parameter in `params` whose term is `ancestor` or one of its
/// descendants according to `cv`
pub fn find_param_child_of<'a>(
    params: &'a [Param],
    ancestor: &CURIE,
    cv: &dyn CVResolver,
) -> Option<&'a Param> {
    params
        .iter()
        .find(|p| p.curie().is_some_and(|c| cv.is_a(&c, ancestor)))
}

pub trait ParamDescribed {
    fn params(&self) -> &[Param];
    fn params_mut(&mut self) -> &mut ParamList;

    fn add_param(&mut self, param: Param) {
        self.params_mut().push(param);
    }

    fn get_param_by_curie(&self, curie: &CURIE) -> Option<&Param> {
        find_param_by_curie(self.params(), curie)
    }

    fn get_param_by_accession(&self, accession: &str) -> Option<&Param> {
        let curie = accession.parse::<CURIE>().ok()?;
        self.get_param_by_curie(&curie)
    }

    /// Find a user parameter, one without an accession, by its exact name
    fn get_user_param(&self, name: &str) -> Option<&Param> {
        self.params()
            .iter()
            .find(|p| !p.is_controlled() && p.name == name)
    }

    /// Find the first term that is `ancestor` or a descendant of it, the way
    /// vendors tag a specific leaf term where a general one is expected
    fn get_param_child_of(&self, ancestor: &CURIE, cv: &dyn CVResolver) -> Option<&Param> {
        find_param_child_of(self.params(), ancestor, cv)
    }
}

#[macro_export]
macro_rules! impl_param_described {
    ($($t:ty), +) => {$(

        impl $crate::params::ParamDescribed for $t {
            fn params(&self) -> &[$crate::params::Param] {
                return &self.params
            }

            fn params_mut(&mut self) -> &mut $crate::params::ParamList {
                return &mut self.params
            }
        }
    )+};
}

/// Units that a term's value might have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Unit {
    // Mass
    MZ,
    Mass,
    PartsPerMillion,

    // Time
    Minute,
    Second,
    Millisecond,

    // Intensity
    DetectorCounts,
    PercentBasePeak,
    CountsPerSecond,

    #[default]
    Unknown,
}

impl Unit {
    pub fn from_name(name: &str) -> Unit {
        match name {
            "millisecond" => Self::Millisecond,
            "second" => Self::Second,
            "minute" => Self::Minute,

            "m/z" => Self::MZ,
            "dalton" => Self::Mass,
            "parts per million" => Self::PartsPerMillion,

            "number of detector counts" => Self::DetectorCounts,
            "percent of base peak" => Self::PercentBasePeak,
            "counts per second" => Self::CountsPerSecond,
            _ => Unit::Unknown,
        }
    }

    pub fn from_accession(acc: &str) -> Unit {
        match acc {
            "UO:0000028" => Self::Millisecond,
            "UO:0000010" => Self::Second,
            "UO:0000031" => Self::Minute,

            "MS:1000040" => Self::MZ,
            "UO:0000221" => Self::Mass,
            "UO:0000169" => Self::PartsPerMillion,

            "MS:1000131" => Self::DetectorCounts,
            "MS:1000132" => Self::PercentBasePeak,
            "MS:1000814" => Self::CountsPerSecond,
            _ => Unit::Unknown,
        }
    }

    /// How many seconds one of this unit spans. [`Unit::Unknown`] is read as seconds,
    /// which is how time values without a unit are written in practice.
    pub const fn seconds_per_unit(&self) -> Option<f64> {
        match self {
            Self::Second | Self::Unknown => Some(1.0),
            Self::Minute => Some(60.0),
            Self::Millisecond => Some(1e-3),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_curie_parse_display() {
        let curie: CURIE = "MS:1000511".parse().unwrap();
        assert_eq!(curie, curie!(MS:1000511));
        assert_eq!(curie.to_string(), "MS:1000511");
        assert_eq!(curie!(UO:0000010).to_string(), "UO:0000010");

        assert!(matches!(
            "MS1000511".parse::<CURIE>(),
            Err(CURIEParsingError::MissingNamespaceSeparator(_))
        ));
        assert!(matches!(
            "XX:1000511".parse::<CURIE>(),
            Err(CURIEParsingError::UnknownControlledVocabulary(_))
        ));
        assert!(matches!(
            "MS:abc".parse::<CURIE>(),
            Err(CURIEParsingError::AccessionParsingError(_))
        ));
    }

    #[test]
    fn test_time_coercion() {
        let minutes = ControlledVocabulary::MS
            .param_val(1000016, "scan start time", "1.5")
            .with_unit("UO:0000031", "minute");
        assert_eq!(minutes.to_seconds().unwrap(), 90.0);

        let millis = ControlledVocabulary::MS
            .param_val(1000016, "scan start time", "250")
            .with_unit_t(&Unit::Millisecond);
        assert_eq!(millis.to_seconds().unwrap(), 0.25);

        let bare = ControlledVocabulary::MS.param_val(1000016, "scan start time", "12.5");
        assert_eq!(bare.to_seconds().unwrap(), 12.5);

        let wrong = bare.clone().with_unit_t(&Unit::MZ);
        assert_eq!(
            wrong.to_seconds(),
            Err(ParamValueParseError::NotATimeUnit(Unit::MZ))
        );
    }

    #[test]
    fn test_numeric_coercion() {
        let param = ControlledVocabulary::MS.param_val(1000511, "ms level", " 2 ");
        assert_eq!(param.to_i32().unwrap(), 2);
        assert_eq!(param.to_f64().unwrap(), 2.0);

        let param = ControlledVocabulary::MS.param_val(1000511, "ms level", "two");
        assert!(matches!(
            param.to_i32(),
            Err(ParamValueParseError::IntParse { .. })
        ));
        assert!(param.to_f64().is_err());
    }

    #[derive(Default)]
    struct Holder {
        params: ParamList,
    }

    impl_param_described!(Holder);

    #[test]
    fn test_param_described_lookup() {
        let mut holder = Holder::default();
        holder.add_param(ControlledVocabulary::MS.param_val(1000512, "filter string", "FTMS"));
        holder.add_param(Param::new_key_value("filter string", "user"));

        assert_eq!(
            holder.get_param_by_curie(&curie!(MS:1000512)).unwrap().value,
            "FTMS"
        );
        assert_eq!(
            holder.get_param_by_accession("MS:1000512").unwrap().value,
            "FTMS"
        );
        assert_eq!(holder.get_user_param("filter string").unwrap().value, "user");
        assert!(holder.get_user_param("missing").is_none());
        assert!(holder.get_param_by_accession("not a curie").is_none());
    }
}
