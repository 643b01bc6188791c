//! Tree queries by id, class, type, or predicate.

use crate::view::node::{ViewData, ViewId};
use crate::view::tree::ViewTree;

impl ViewTree {
    /// The first view whose id matches.
    pub fn query_by_id(&self, id: &str) -> Option<ViewId> {
        self.iter().find(|(_, data)| data.id.as_deref() == Some(id)).map(|(view, _)| view)
    }

    /// All views carrying `class`, in arena order.
    pub fn query_by_class(&self, class: &str) -> Vec<ViewId> {
        self.query_all(|data| data.has_class(class))
    }

    pub fn query_by_type(&self, type_name: &str) -> Vec<ViewId> {
        self.query_all(|data| data.type_name == type_name)
    }

    pub fn query_all(&self, predicate: impl Fn(&ViewData) -> bool) -> Vec<ViewId> {
        self.iter().filter(|(_, data)| predicate(data)).map(|(view, _)| view).collect()
    }
}
