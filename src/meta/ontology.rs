//! Subsumption ("is-a") queries over controlled vocabulary terms.
//!
//! The normalizer never needs a full ontology. It asks whether a concrete term a
//! vendor wrote is, or descends from, a canonical term. [`CVResolver`] is that
//! question; [`Ontology`] answers it from a term table, and [`psi_ms`] is the
//! process-wide table of the PSI-MS terms this crate reasons about.
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::curie;
use crate::params::CURIE;

/// mass analyzer type
pub const MASS_ANALYZER_TYPE: CURIE = curie!(MS:1000443);
/// ion trap
pub const ION_TRAP: CURIE = curie!(MS:1000264);
/// fourier transform ion cyclotron resonance mass spectrometer
pub const FT_ICR: CURIE = curie!(MS:1000079);
/// orbitrap
pub const ORBITRAP: CURIE = curie!(MS:1000484);

pub trait CVResolver {
    /// Whether `term` is `ancestor` or a registered descendant of it
    fn is_a(&self, term: &CURIE, ancestor: &CURIE) -> bool;

    /// The human readable name of `term`, if known
    fn name(&self, term: &CURIE) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub curie: CURIE,
    pub name: String,
    pub parents: Vec<CURIE>,
}

impl TermEntry {
    pub fn new<S: Into<String>>(curie: CURIE, name: S, parents: Vec<CURIE>) -> Self {
        Self {
            curie,
            name: name.into(),
            parents,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ontology {
    terms: HashMap<CURIE, TermEntry>,
}

// (term, name, parents)
const PSI_MS_TERMS: &[(CURIE, &str, &[CURIE])] = &[
    (MASS_ANALYZER_TYPE, "mass analyzer type", &[]),
    (curie!(MS:1000080), "magnetic sector", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000081), "quadrupole", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000084), "time-of-flight", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000254), "electrostatic energy analyzer", &[MASS_ANALYZER_TYPE]),
    (ION_TRAP, "ion trap", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000288), "cyclotron", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000284), "stored waveform inverse fourier transform", &[MASS_ANALYZER_TYPE]),
    (FT_ICR, "fourier transform ion cyclotron resonance mass spectrometer", &[MASS_ANALYZER_TYPE]),
    (ORBITRAP, "orbitrap", &[MASS_ANALYZER_TYPE]),
    (curie!(MS:1000082), "quadrupole ion trap", &[ION_TRAP]),
    (curie!(MS:1000291), "linear ion trap", &[ION_TRAP]),
    (curie!(MS:1000078), "axial ejection linear ion trap", &[curie!(MS:1000291)]),
    (curie!(MS:1000083), "radial ejection linear ion trap", &[curie!(MS:1000291)]),
    (curie!(MS:1003379), "asymmetric track lossless time-of-flight analyzer", &[curie!(MS:1000084)]),
];

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    /// The subset of PSI-MS covering the mass analyzer type hierarchy
    pub fn psi_ms() -> Self {
        let mut this = Self::new();
        for (curie, name, parents) in PSI_MS_TERMS {
            this.add_term(TermEntry::new(*curie, *name, parents.to_vec()));
        }
        this
    }

    /// Register a term, replacing any previous entry for the same [`CURIE`]
    pub fn add_term(&mut self, entry: TermEntry) {
        self.terms.insert(entry.curie, entry);
    }

    pub fn get(&self, term: &CURIE) -> Option<&TermEntry> {
        self.terms.get(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every registered ancestor of `term`, nearest first. Cycles in the table are tolerated.
    pub fn ancestors(&self, term: &CURIE) -> Vec<CURIE> {
        let mut seen = HashSet::new();
        let mut queue: Vec<CURIE> = Vec::new();
        let mut result = Vec::new();
        if let Some(entry) = self.terms.get(term) {
            queue.extend(entry.parents.iter().copied());
        }
        let mut i = 0;
        while i < queue.len() {
            let current = queue[i];
            i += 1;
            if current == *term || !seen.insert(current) {
                continue;
            }
            result.push(current);
            if let Some(entry) = self.terms.get(&current) {
                queue.extend(entry.parents.iter().copied());
            }
        }
        result
    }
}

impl CVResolver for Ontology {
    fn is_a(&self, term: &CURIE, ancestor: &CURIE) -> bool {
        term == ancestor || self.ancestors(term).contains(ancestor)
    }

    fn name(&self, term: &CURIE) -> Option<&str> {
        self.terms.get(term).map(|e| e.name.as_str())
    }
}

/// The shared, lazily built PSI-MS subset
pub fn psi_ms() -> &'static Ontology {
    static PSI_MS: OnceLock<Ontology> = OnceLock::new();
    PSI_MS.get_or_init(Ontology::psi_ms)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_subsumption() {
        let cv = psi_ms();
        let radial = curie!(MS:1000083);
        assert!(cv.is_a(&radial, &ION_TRAP));
        assert!(cv.is_a(&radial, &MASS_ANALYZER_TYPE));
        assert!(cv.is_a(&ION_TRAP, &ION_TRAP));
        assert!(!cv.is_a(&ORBITRAP, &ION_TRAP));
        assert!(!cv.is_a(&MASS_ANALYZER_TYPE, &ION_TRAP));
        // Unregistered terms only match themselves
        assert!(!cv.is_a(&curie!(MS:1000511), &MASS_ANALYZER_TYPE));
        assert_eq!(cv.name(&ORBITRAP), Some("orbitrap"));
    }

    #[test]
    fn test_ancestors_order_and_cycles() {
        let cv = psi_ms();
        assert_eq!(
            cv.ancestors(&curie!(MS:1000078)),
            vec![curie!(MS:1000291), ION_TRAP, MASS_ANALYZER_TYPE]
        );

        let mut cyclic = Ontology::new();
        let a = curie!(MS:1);
        let b = curie!(MS:2);
        cyclic.add_term(TermEntry::new(a, "a", vec![b]));
        cyclic.add_term(TermEntry::new(b, "b", vec![a]));
        assert_eq!(cyclic.ancestors(&a), vec![b]);
        assert!(cyclic.is_a(&a, &b));
        assert!(!cyclic.is_a(&a, &MASS_ANALYZER_TYPE));
    }

    #[test]
    fn test_extend_with_vendor_term() {
        let mut cv = Ontology::psi_ms();
        let n = cv.len();
        assert!(!cv.is_empty());
        assert!(Ontology::new().is_empty());
        let custom = curie!(MS:1003356);
        cv.add_term(TermEntry::new(custom, "vendor trap", vec![curie!(MS:1000291)]));
        assert_eq!(cv.len(), n + 1);
        assert_eq!(cv.get(&custom).unwrap().parents, vec![curie!(MS:1000291)]);
        assert!(cv.is_a(&custom, &ION_TRAP));
        assert!(!psi_ms().is_a(&custom, &ION_TRAP));
    }
}
