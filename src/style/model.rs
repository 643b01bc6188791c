//! Stylesheet AST: selectors, raw declarations and rule sets.
//!
//! The parser produces this untyped form; [`crate::style::stylesheet`] turns the
//! raw declarations into typed [`crate::style::Declaration`]s.

/// A single simple selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Type selector: matches the view's type name (e.g. `Button`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// Pseudo-class: `:hover`, `:active`, `:focus`, `:disabled`.
    PseudoClass(String),
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// A sequence of simple selectors without combinators, e.g. `Button.primary:hover`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, component: SelectorComponent) -> Self {
        self.push(component);
        self
    }
}

/// One element in a selector chain.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// A full selector: compound selectors joined by combinators.
///
/// `Container > Button.primary:hover` is
/// `[Compound(Container), Combinator(Child), Compound(Button.primary:hover)]`.
/// The chain always starts and ends with a compound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// A selector made of a single compound.
    pub fn compound(compound: CompoundSelector) -> Self {
        Self { parts: vec![SelectorPart::Compound(compound)] }
    }

    /// `.name`
    pub fn class(name: impl Into<String>) -> Self {
        Self::compound(CompoundSelector::new().with(SelectorComponent::Class(name.into())))
    }

    /// `TypeName`
    pub fn type_name(name: impl Into<String>) -> Self {
        Self::compound(CompoundSelector::new().with(SelectorComponent::Type(name.into())))
    }

    /// `#id`
    pub fn id(name: impl Into<String>) -> Self {
        Self::compound(CompoundSelector::new().with(SelectorComponent::Id(name.into())))
    }

    /// Append a pseudo-class to the rightmost compound, e.g. `.btn` → `.btn:hover`.
    pub fn with_pseudo(mut self, name: impl Into<String>) -> Self {
        if let Some(SelectorPart::Compound(last)) = self.parts.last_mut() {
            last.push(SelectorComponent::PseudoClass(name.into()));
        }
        self
    }

    /// Extend the chain: `self <combinator> next`.
    pub fn then(mut self, combinator: Combinator, next: CompoundSelector) -> Self {
        self.parts.push(SelectorPart::Combinator(combinator));
        self.parts.push(SelectorPart::Compound(next));
        self
    }

    /// Iterate over every simple selector in the chain.
    pub fn components(&self) -> impl Iterator<Item = &SelectorComponent> {
        self.parts.iter().flat_map(|part| match part {
            SelectorPart::Compound(c) => c.components.iter(),
            SelectorPart::Combinator(_) => [].iter(),
        })
    }
}

/// A value token inside a raw declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationValue {
    /// An identifier like `red`, `auto`, `none`.
    Ident(String),
    /// A unitless number like `0`, `1`, `0.5`.
    Number(f32),
    /// A number with a unit suffix like `4dp` or `50%`.
    Dimension(f32, String),
    /// A hex color without the `#` prefix, e.g. `"ff00aa"`.
    Color(String),
    /// A quoted string.
    String(String),
}

/// An untyped `property: values [!important]` entry with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeclaration {
    pub property: String,
    pub values: Vec<DeclarationValue>,
    pub important: bool,
    /// 1-based line of the property name.
    pub line: usize,
    /// 1-based column of the property name.
    pub column: usize,
}

/// One rule as written: a selector list and its raw declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<RawDeclaration>,
}

/// A parsed but not yet compiled stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub rules: Vec<RuleSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_shorthands() {
        let sel = Selector::class("btn").with_pseudo("hover");
        let comps: Vec<_> = sel.components().cloned().collect();
        assert_eq!(
            comps,
            vec![
                SelectorComponent::Class("btn".into()),
                SelectorComponent::PseudoClass("hover".into()),
            ]
        );
    }

    #[test]
    fn then_builds_alternating_chain() {
        let sel = Selector::type_name("Row").then(
            Combinator::Child,
            CompoundSelector::new().with(SelectorComponent::Id("ok".into())),
        );
        assert_eq!(sel.parts.len(), 3);
        assert!(matches!(sel.parts[1], SelectorPart::Combinator(Combinator::Child)));
        assert_eq!(sel.components().count(), 2);
    }
}
