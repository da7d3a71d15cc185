use crate::impl_param_described;
use crate::meta::ontology::CVResolver;
use crate::params::{Param, ParamDescribed, ParamList, CURIE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentType {
    Analyzer,
    IonSource,
    Detector,
    #[default]
    Unknown,
}

/// One stage of an instrument configuration, described by controlled vocabulary terms
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Component {
    pub component_type: ComponentType,
    pub order: u8,
    pub params: ParamList,
}

impl Component {
    pub fn new(component_type: ComponentType, order: u8) -> Self {
        Self {
            component_type,
            order,
            params: ParamList::new(),
        }
    }

    /// The first term on this component that is `ancestor` or one of its descendants
    pub fn param_child_of(&self, ancestor: &CURIE, cv: &dyn CVResolver) -> Option<&Param> {
        self.get_param_child_of(ancestor, cv)
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct InstrumentConfiguration {
    pub components: Vec<Component>,
    pub params: ParamList,
    pub id: String,
}

impl InstrumentConfiguration {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn iter_components_of(
        &self,
        component_type: ComponentType,
    ) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.component_type == component_type)
    }

    /// The `i`-th analyzer component, in listed order
    pub fn analyzer(&self, i: usize) -> Option<&Component> {
        self.iter_components_of(ComponentType::Analyzer).nth(i)
    }

    pub fn ion_source(&self, i: usize) -> Option<&Component> {
        self.iter_components_of(ComponentType::IonSource).nth(i)
    }

    pub fn detector(&self, i: usize) -> Option<&Component> {
        self.iter_components_of(ComponentType::Detector).nth(i)
    }
}

impl_param_described!(InstrumentConfiguration, Component);

#[cfg(test)]
mod test {
    use super::*;
    use crate::meta::ontology::{psi_ms, MASS_ANALYZER_TYPE};
    use crate::params::ControlledVocabulary;

    #[test]
    fn test_analyzer_lookup() {
        let mut config = InstrumentConfiguration::new("IC1");
        let mut source = Component::new(ComponentType::IonSource, 1);
        source.add_param(ControlledVocabulary::MS.param(1000073, "electrospray ionization"));
        let mut first = Component::new(ComponentType::Analyzer, 2);
        first.add_param(ControlledVocabulary::MS.param(1000480, "mass analyzer attribute"));
        first.add_param(ControlledVocabulary::MS.param(1000083, "radial ejection linear ion trap"));
        let mut second = Component::new(ComponentType::Analyzer, 3);
        second.add_param(ControlledVocabulary::MS.param(1000484, "orbitrap"));
        config.push(source);
        config.push(first);
        config.push(second);

        assert_eq!(config.analyzer(0).unwrap().order, 2);
        assert_eq!(config.analyzer(1).unwrap().order, 3);
        assert!(config.analyzer(2).is_none());
        assert_eq!(config.ion_source(0).unwrap().order, 1);
        assert!(config.detector(0).is_none());

        let analyzer_type = config
            .analyzer(0)
            .and_then(|a| a.param_child_of(&MASS_ANALYZER_TYPE, psi_ms()))
            .unwrap();
        assert_eq!(analyzer_type.name, "radial ejection linear ion trap");
    }
}
