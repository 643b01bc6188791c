//! Selector specificity.
//!
//! Specificity is the tuple
//!
//! ```text
//! (important, id_count, class_count, type_count, source_order)
//! ```
//!
//! Fields are ordered so that the derived `Ord` (lexicographic) decides the
//! cascade: `!important` beats normal, then more ids, more classes and
//! pseudo-classes, more type names, and finally the later rule.

use crate::style::model::{Selector, SelectorComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// 1 if `!important`, 0 otherwise.
    pub important: u8,
    /// Number of `#id` selectors.
    pub id_count: u16,
    /// Number of `.class` and `:pseudo` selectors.
    pub class_count: u16,
    /// Number of type selectors (`Button`).
    pub type_count: u16,
    /// Rule index in the stylesheet; later wins ties.
    pub source_order: u32,
}

impl Specificity {
    /// Compute the specificity of `selector` for a rule at `source_order`.
    pub fn from_selector(selector: &Selector, source_order: u32, important: bool) -> Self {
        let mut spec = Self {
            important: u8::from(important),
            source_order,
            ..Self::default()
        };

        for component in selector.components() {
            match component {
                SelectorComponent::Id(_) => spec.id_count += 1,
                SelectorComponent::Class(_) | SelectorComponent::PseudoClass(_) => spec.class_count += 1,
                SelectorComponent::Type(_) => spec.type_count += 1,
                SelectorComponent::Universal => {}
            }
        }

        spec
    }

    /// The same specificity with the `!important` flag set or cleared.
    pub fn with_important(self, important: bool) -> Self {
        Self { important: u8::from(important), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::parser::parse_selector;

    fn spec(selector: &str, order: u32) -> Specificity {
        let sel = parse_selector(selector).expect("valid selector");
        Specificity::from_selector(&sel, order, false)
    }

    #[test]
    fn counts_components() {
        let s = spec("Row > Button.primary:hover", 5);
        assert_eq!(s.type_count, 2);
        assert_eq!(s.class_count, 2);
        assert_eq!(s.id_count, 0);
        assert_eq!(s.source_order, 5);
    }

    #[test]
    fn universal_is_zero() {
        assert_eq!(spec("*", 0), Specificity::default());
    }

    #[test]
    fn id_beats_class_beats_type() {
        assert!(spec("#main", 0) > spec(".a.b.c", 9));
        assert!(spec(".a", 0) > spec("Button", 9));
    }

    #[test]
    fn source_order_breaks_ties() {
        assert!(spec(".selected", 1) > spec(".selected", 0));
    }

    #[test]
    fn important_beats_everything() {
        assert!(spec("*", 0).with_important(true) > spec("#a #b .c", 99));
    }
}
