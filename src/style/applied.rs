//! Applied style: the winning declaration for each slot of one view.

use std::collections::BTreeMap;

use crate::style::computed::ViewStyle;
use crate::style::declaration::{Declaration, Slot};

/// Slot → winning declaration, as produced by the cascade.
///
/// Iteration follows [`Slot`] order, which is also paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedStyle {
    slots: BTreeMap<Slot, Declaration>,
}

impl AppliedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `declaration` in its slot, replacing whatever was there.
    pub fn insert(&mut self, declaration: Declaration) -> Option<Declaration> {
        self.slots.insert(declaration.slot(), declaration)
    }

    pub fn get(&self, slot: Slot) -> Option<&Declaration> {
        self.slots.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fold into typed fields.
    pub fn compute(&self) -> ViewStyle {
        ViewStyle::from_declarations(self.slots.values())
    }

    /// Slots whose declaration differs between `self` and `other`.
    pub fn changed_slots(&self, other: &AppliedStyle) -> Vec<Slot> {
        let mut changed: Vec<Slot> = self
            .slots
            .iter()
            .filter(|(slot, decl)| other.slots.get(slot) != Some(decl))
            .map(|(slot, _)| *slot)
            .collect();
        changed.extend(other.slots.keys().filter(|slot| !self.slots.contains_key(slot)));
        changed.sort_unstable();
        changed
    }

    /// Whether any layout-affecting slot differs from `other`.
    pub fn layout_differs(&self, other: &AppliedStyle) -> bool {
        self.changed_slots(other).iter().any(|slot| slot.affects_layout())
    }
}

impl FromIterator<Declaration> for AppliedStyle {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut applied = AppliedStyle::new();
        for declaration in iter {
            applied.insert(declaration);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::color::Color;
    use crate::style::metric::{Metric, MetricBox};

    #[test]
    fn same_slot_replaces() {
        let mut applied = AppliedStyle::new();
        assert!(applied.insert(Declaration::TextColor(Color::RED)).is_none());
        let previous = applied.insert(Declaration::TextColor(Color::BLUE));
        assert_eq!(previous, Some(Declaration::TextColor(Color::RED)));
        assert_eq!(applied.len(), 1);
        assert_eq!(applied.get(Slot::TextColor), Some(&Declaration::TextColor(Color::BLUE)));
    }

    #[test]
    fn different_slots_are_additive() {
        let applied: AppliedStyle = [
            Declaration::TextColor(Color::RED),
            Declaration::BackgroundSolid(Color::WHITE),
            Declaration::Margin(MetricBox::all(Metric::dp(2.0))),
        ]
        .into_iter()
        .collect();
        assert_eq!(applied.len(), 3);
    }

    #[test]
    fn changed_slots_covers_added_removed_and_modified() {
        let a: AppliedStyle = [Declaration::TextColor(Color::RED), Declaration::Opacity(0.5)]
            .into_iter()
            .collect();
        let b: AppliedStyle = [
            Declaration::TextColor(Color::BLUE),
            Declaration::Margin(MetricBox::default()),
        ]
        .into_iter()
        .collect();
        assert_eq!(a.changed_slots(&b), vec![Slot::TextColor, Slot::Opacity, Slot::Margin]);
        assert!(a.layout_differs(&b));
    }

    #[test]
    fn visual_change_is_not_layout_change() {
        let a: AppliedStyle = [Declaration::BackgroundSolid(Color::RED)].into_iter().collect();
        let b: AppliedStyle = [Declaration::BackgroundSolid(Color::BLUE)].into_iter().collect();
        assert!(!a.layout_differs(&b));
        assert_eq!(a.changed_slots(&b), vec![Slot::Background]);
    }
}
