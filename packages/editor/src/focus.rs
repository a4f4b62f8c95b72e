//! Focused-element tracking.

use std::cell::RefCell;
use std::rc::Rc;

use remix_dom::NodeId;

/// The element the user currently has selected
pub trait FocusedSelection {
    fn primary_element(&self) -> Option<NodeId>;

    fn unfocus(&mut self);
}

/// Plain focus holder
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusTracker {
    focused: Option<NodeId>,
    /// How many times the selection was cleared
    pub unfocus_count: usize,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&mut self, element: NodeId) {
        self.focused = Some(element);
    }
}

impl FocusedSelection for FocusTracker {
    fn primary_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn unfocus(&mut self) {
        self.focused = None;
        self.unfocus_count += 1;
    }
}

impl<T: FocusedSelection> FocusedSelection for Rc<RefCell<T>> {
    fn primary_element(&self) -> Option<NodeId> {
        self.borrow().primary_element()
    }

    fn unfocus(&mut self) {
        self.borrow_mut().unfocus();
    }
}
