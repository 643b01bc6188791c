//! Compiled stylesheet and cascade resolution.
//!
//! [`Stylesheet::parse`] compiles source text into typed rules in one go; a
//! single bad declaration fails the whole load. [`Stylesheet::resolve`] runs
//! the cascade for one view and returns its [`AppliedStyle`].

use crate::style::applied::AppliedStyle;
use crate::style::declaration::{parse_declaration, Declaration};
use crate::style::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorPart};
use crate::style::parser::{parse_stylesheet, ParseError};
use crate::style::specificity::Specificity;
use crate::view::node::{PseudoState, ViewData, ViewId};
use crate::view::tree::ViewTree;

/// A selector list paired with typed declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    selectors: Vec<Selector>,
    /// `(declaration, important)` in source order.
    declarations: Vec<(Declaration, bool)>,
}

impl Rule {
    /// A rule with one selector.
    pub fn new(selector: Selector, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self {
            selectors: vec![selector],
            declarations: declarations.into_iter().map(|d| (d, false)).collect(),
        }
    }

    /// Add another selector to the list (`a, b { ... }`).
    pub fn or_selector(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Add a declaration marked `!important`.
    pub fn with_important(mut self, declaration: Declaration) -> Self {
        self.declarations.push((declaration, true));
        self
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().map(|(d, _)| d)
    }
}

/// An ordered, immutable list of rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// An empty stylesheet; every view resolves to its inline style only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stylesheet from rules in source order.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self { rules: rules.into_iter().collect() }
    }

    /// Parse and compile source text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let parsed = parse_stylesheet(source)?;
        let mut rules = Vec::with_capacity(parsed.rules.len());

        for rule in parsed.rules {
            let declarations = rule
                .declarations
                .iter()
                .map(|raw| {
                    parse_declaration(&raw.property, &raw.values)
                        .map(|decl| (decl, raw.important))
                        .map_err(|source| ParseError::InvalidDeclaration {
                            line: raw.line,
                            column: raw.column,
                            property: raw.property.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rules.push(Rule { selectors: rule.selectors, declarations });
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the cascade for `view`.
    ///
    /// Matching declarations are ordered by specificity (later rules win ties)
    /// and inserted slot by slot, so a winner only replaces declarations of its
    /// own slot. The view's inline declarations are applied last.
    pub fn resolve(&self, view: ViewId, tree: &ViewTree) -> AppliedStyle {
        let mut matched: Vec<(Specificity, usize, &Declaration)> = Vec::new();

        for (order, rule) in self.rules.iter().enumerate() {
            let best = rule
                .selectors
                .iter()
                .filter(|sel| matches_selector(sel, view, tree))
                .map(|sel| Specificity::from_selector(sel, order as u32, false))
                .max();

            let Some(specificity) = best else { continue };
            for (index, (declaration, important)) in rule.declarations.iter().enumerate() {
                matched.push((specificity.with_important(*important), index, declaration));
            }
        }

        matched.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut applied: AppliedStyle = matched.into_iter().map(|(_, _, d)| d.clone()).collect();
        if let Some(data) = tree.get(view) {
            for declaration in &data.inline_style {
                applied.insert(declaration.clone());
            }
        }
        applied
    }
}

/// Whether `selector` matches the view, walking parts right to left.
pub fn matches_selector(selector: &Selector, view: ViewId, tree: &ViewTree) -> bool {
    let parts = &selector.parts;
    let Some(SelectorPart::Compound(last)) = parts.last() else {
        return false;
    };
    match tree.get(view) {
        Some(data) if matches_compound(last, data) => {}
        _ => return false,
    }

    let mut current = view;
    let mut idx = parts.len() - 1;

    while idx >= 2 {
        let (SelectorPart::Combinator(combinator), SelectorPart::Compound(compound)) =
            (&parts[idx - 1], &parts[idx - 2])
        else {
            return false;
        };
        idx -= 2;

        let next = match combinator {
            Combinator::Child => tree
                .parent(current)
                .filter(|&p| tree.get(p).is_some_and(|data| matches_compound(compound, data))),
            Combinator::Descendant => tree
                .ancestors(current)
                .into_iter()
                .find(|&a| tree.get(a).is_some_and(|data| matches_compound(compound, data))),
        };

        match next {
            Some(found) => current = found,
            None => return false,
        }
    }

    idx == 0
}

/// Whether every component of `compound` matches the view.
fn matches_compound(compound: &CompoundSelector, view: &ViewData) -> bool {
    !compound.components.is_empty()
        && compound.components.iter().all(|component| match component {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(name) => view.type_name == *name,
            SelectorComponent::Class(name) => view.has_class(name),
            SelectorComponent::Id(name) => view.id.as_deref() == Some(name.as_str()),
            SelectorComponent::PseudoClass(name) => {
                PseudoState::from_pseudo_class(name).is_some_and(|flag| view.state.contains(flag))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::color::Color;
    use crate::style::declaration::Slot;
    use crate::style::metric::{Metric, MetricBox};
    use crate::view::builder::ViewBuilder;
    use pretty_assertions::assert_eq;

    /// ```text
    ///   Window #root
    ///     └─ List .list
    ///          ├─ Item .row .selected   (a)
    ///          └─ Item .row             (b)
    /// ```
    fn build_tree() -> (ViewTree, ViewId, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Window").with_id("root").build());
        let list = tree.insert_child(root, ViewBuilder::new("List").with_class("list").build());
        let a = tree.insert_child(
            list,
            ViewBuilder::new("Item").with_class("row").with_class("selected").build(),
        );
        let b = tree.insert_child(list, ViewBuilder::new("Item").with_class("row").build());
        (tree, list, a, b)
    }

    fn text_color(sheet: &Stylesheet, view: ViewId, tree: &ViewTree) -> Option<Declaration> {
        sheet.resolve(view, tree).get(Slot::TextColor).cloned()
    }

    #[test]
    fn last_matching_rule_wins_per_slot() {
        let (tree, _, a, _) = build_tree();
        let sheet = Stylesheet::parse(".selected { color: red }\n.selected { color: blue }").expect("valid");
        assert_eq!(text_color(&sheet, a, &tree), Some(Declaration::TextColor(Color::BLUE)));
    }

    #[test]
    fn slots_merge_independently() {
        let (tree, _, a, _) = build_tree();
        let sheet = Stylesheet::parse(
            ".row { color: red; background: white }\n.selected { color: blue }",
        )
        .expect("valid");
        let applied = sheet.resolve(a, &tree);
        assert_eq!(applied.get(Slot::TextColor), Some(&Declaration::TextColor(Color::BLUE)));
        assert_eq!(applied.get(Slot::Background), Some(&Declaration::BackgroundSolid(Color::WHITE)));
    }

    #[test]
    fn more_specific_rule_wins_regardless_of_order() {
        let (tree, _, a, _) = build_tree();
        let sheet = Stylesheet::parse("Item.selected { color: red }\n.selected { color: blue }").expect("valid");
        assert_eq!(text_color(&sheet, a, &tree), Some(Declaration::TextColor(Color::RED)));
    }

    #[test]
    fn important_overrides_specificity() {
        let (tree, _, a, _) = build_tree();
        let sheet =
            Stylesheet::parse(".row { color: red !important }\n#root Item.selected { color: blue }").expect("valid");
        assert_eq!(text_color(&sheet, a, &tree), Some(Declaration::TextColor(Color::RED)));
    }

    #[test]
    fn unmatched_selector_contributes_nothing() {
        let (tree, _, _, b) = build_tree();
        let sheet = Stylesheet::parse(".selected { color: red }").expect("valid");
        assert!(sheet.resolve(b, &tree).is_empty());
    }

    #[test]
    fn child_and_descendant_combinators() {
        let (tree, list, a, _) = build_tree();
        let child = Stylesheet::parse("List > Item { color: red }").expect("valid");
        let wrong_child = Stylesheet::parse("Window > Item { color: red }").expect("valid");
        let descendant = Stylesheet::parse("#root .row { color: red }").expect("valid");
        assert!(!child.resolve(a, &tree).is_empty());
        assert!(wrong_child.resolve(a, &tree).is_empty());
        assert!(!descendant.resolve(a, &tree).is_empty());
        assert!(descendant.resolve(list, &tree).is_empty());
    }

    #[test]
    fn pseudo_state_matching() {
        let (mut tree, _, _, b) = build_tree();
        let sheet = Stylesheet::parse(".row:hover { color: red }\n.row:bogus { color: blue }").expect("valid");
        assert!(sheet.resolve(b, &tree).is_empty());
        tree.set_state(b, PseudoState::HOVER, true);
        assert_eq!(text_color(&sheet, b, &tree), Some(Declaration::TextColor(Color::RED)));
    }

    #[test]
    fn inline_style_wins() {
        let mut tree = ViewTree::new();
        let v = tree.insert(
            ViewBuilder::new("Label")
                .with_class("x")
                .with_style(Declaration::TextColor(Color::GREEN))
                .build(),
        );
        let sheet = Stylesheet::parse(".x { color: red !important; margin: 2dp }").expect("valid");
        let applied = sheet.resolve(v, &tree);
        assert_eq!(applied.get(Slot::TextColor), Some(&Declaration::TextColor(Color::GREEN)));
        assert_eq!(applied.get(Slot::Margin), Some(&Declaration::Margin(MetricBox::all(Metric::dp(2.0)))));
    }

    #[test]
    fn none_declaration_still_occupies_slot() {
        let (tree, _, a, _) = build_tree();
        let sheet = Stylesheet::parse(".row { border: 1px red }\n.selected { border: none }").expect("valid");
        let applied = sheet.resolve(a, &tree);
        let border = applied.get(Slot::Border).expect("slot occupied");
        assert!(border.is_none());
    }

    #[test]
    fn bad_declaration_fails_whole_load_with_location() {
        let err = Stylesheet::parse(".a { color: red }\n.b {\n  margin: 4 }").unwrap_err();
        match err {
            ParseError::InvalidDeclaration { line, column, property, .. } => {
                assert_eq!((line, column), (3, 3));
                assert_eq!(property, "margin");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn programmatic_rules() {
        let (tree, _, a, b) = build_tree();
        let sheet = Stylesheet::from_rules([
            Rule::new(Selector::class("row"), [Declaration::TextColor(Color::RED)]),
            Rule::new(Selector::class("selected"), [Declaration::TextColor(Color::BLUE)]),
        ]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(text_color(&sheet, a, &tree), Some(Declaration::TextColor(Color::BLUE)));
        assert_eq!(text_color(&sheet, b, &tree), Some(Declaration::TextColor(Color::RED)));
    }
}
