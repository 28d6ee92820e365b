//! Fragments of generated source text and their assembly into a class

use tracing::warn;

/// Kind of a generated fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Imports, namespace and class opening
    Header,
    Properties,
    PublicConstructor,
    PrivateConstructor,
    GetAll,
    AddNew,
    Update,
    Save,
    Delete,
    /// Closing delimiters
    Footer,
}

/// Declared fragment order of a data-access class
pub const DATA_LAYER_ORDER: &[FragmentKind] = &[
    FragmentKind::Header,
    FragmentKind::GetAll,
    FragmentKind::AddNew,
    FragmentKind::Update,
    FragmentKind::Delete,
    FragmentKind::Footer,
];

/// Declared fragment order of a business class
pub const BUSINESS_LAYER_ORDER: &[FragmentKind] = &[
    FragmentKind::Header,
    FragmentKind::Properties,
    FragmentKind::PublicConstructor,
    FragmentKind::PrivateConstructor,
    FragmentKind::GetAll,
    FragmentKind::AddNew,
    FragmentKind::Update,
    FragmentKind::Save,
    FragmentKind::Delete,
    FragmentKind::Footer,
];

/// A unit of generated source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
}

impl Fragment {
    pub fn new(kind: FragmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// A fragment that renders nothing
    pub fn empty(kind: FragmentKind) -> Self {
        Self::new(kind, String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Collects fragments and renders them in a declared order
#[derive(Debug, Clone)]
pub struct ClassAssembly {
    order: &'static [FragmentKind],
    fragments: Vec<Fragment>,
}

impl ClassAssembly {
    pub fn new(order: &'static [FragmentKind]) -> Self {
        Self {
            order,
            fragments: Vec::new(),
        }
    }

    /// Add a fragment; kinds outside the declared order are dropped
    pub fn push(&mut self, fragment: Fragment) -> &mut Self {
        if self.order.contains(&fragment.kind) {
            self.fragments.push(fragment);
        } else {
            warn!("Dropping {:?} fragment not declared for this class", fragment.kind);
        }
        self
    }

    /// Get the first fragment of a kind
    pub fn fragment(&self, kind: FragmentKind) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.kind == kind)
    }

    /// Kinds of the non-empty fragments, in render order
    pub fn rendered_kinds(&self) -> Vec<FragmentKind> {
        self.ordered().filter(|f| !f.is_empty()).map(|f| f.kind).collect()
    }

    /// Concatenate all fragments in the declared order
    pub fn render(&self) -> String {
        self.ordered().map(|f| f.text.as_str()).collect()
    }

    fn ordered(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.order
            .iter()
            .flat_map(move |kind| self.fragments.iter().filter(move |f| f.kind == *kind))
    }
}

/// An assembled class plus the metadata fetches that failed while building it
#[derive(Debug, Clone)]
pub struct SynthesizedClass {
    pub assembly: ClassAssembly,
    /// Names of the tables/routines whose metadata could not be read
    pub failed_fetches: Vec<String>,
}

impl SynthesizedClass {
    pub fn new(assembly: ClassAssembly, failed_fetches: Vec<String>) -> Self {
        Self {
            assembly,
            failed_fetches,
        }
    }

    pub fn render(&self) -> String {
        self.assembly.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_follows_declared_order() {
        let mut assembly = ClassAssembly::new(DATA_LAYER_ORDER);
        assembly
            .push(Fragment::new(FragmentKind::Footer, "}"))
            .push(Fragment::new(FragmentKind::Delete, "D"))
            .push(Fragment::new(FragmentKind::Header, "H{"))
            .push(Fragment::new(FragmentKind::GetAll, "G"));

        assert_eq!(assembly.render(), "H{GD}");
        assert_eq!(
            assembly.rendered_kinds(),
            vec![
                FragmentKind::Header,
                FragmentKind::GetAll,
                FragmentKind::Delete,
                FragmentKind::Footer
            ]
        );
    }

    #[test]
    fn test_undeclared_kind_is_dropped() {
        let mut assembly = ClassAssembly::new(DATA_LAYER_ORDER);
        assembly.push(Fragment::new(FragmentKind::Save, "save"));
        assert!(assembly.fragment(FragmentKind::Save).is_none());
        assert_eq!(assembly.render(), "");
    }

    #[test]
    fn test_empty_fragments_render_nothing() {
        let mut assembly = ClassAssembly::new(BUSINESS_LAYER_ORDER);
        assembly
            .push(Fragment::new(FragmentKind::Header, "{"))
            .push(Fragment::empty(FragmentKind::Properties))
            .push(Fragment::new(FragmentKind::Footer, "}"));

        assert_eq!(assembly.render(), "{}");
        assert_eq!(
            assembly.rendered_kinds(),
            vec![FragmentKind::Header, FragmentKind::Footer]
        );
    }
}
