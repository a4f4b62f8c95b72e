//! Overlay renderers used by transition effects.
//!
//! An overlay is anchored on the outgoing element, then tinted with the
//! incoming element's tag color and resized onto it while fading out.

use std::cell::RefCell;
use std::rc::Rc;

use remix_dom::NodeSnapshot;

/// Creates overlays positioned over an element
pub trait OverlayRenderer {
    fn overlay(&self, target: &NodeSnapshot) -> Box<dyn Overlay>;
}

/// A live overlay handle
pub trait Overlay {
    fn apply_tag_color(&mut self, target: &NodeSnapshot, intensity: f32);

    fn resize_to_and_fade_out(&mut self, target: &NodeSnapshot);
}

/// Renderer for headless runs: every step becomes a trace event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOverlayRenderer;

impl OverlayRenderer for TracingOverlayRenderer {
    fn overlay(&self, target: &NodeSnapshot) -> Box<dyn Overlay> {
        tracing::debug!(node = %target.node, tag = ?target.tag, path = ?target.path, "overlay created");
        Box::new(TracingOverlay {
            anchor: target.node,
        })
    }
}

struct TracingOverlay {
    anchor: remix_dom::NodeId,
}

impl Overlay for TracingOverlay {
    fn apply_tag_color(&mut self, target: &NodeSnapshot, intensity: f32) {
        tracing::debug!(anchor = %self.anchor, node = %target.node, tag = ?target.tag, intensity, "overlay tag color");
    }

    fn resize_to_and_fade_out(&mut self, target: &NodeSnapshot) {
        tracing::info!(from = %self.anchor, to = %target.node, depth = target.depth(), "transition effect");
    }
}

/// One overlay's life, as observed by [`RecordingOverlayRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransition {
    pub from: NodeSnapshot,
    pub tag_color: Option<(NodeSnapshot, f32)>,
    pub faded_into: Option<NodeSnapshot>,
}

/// Renderer that keeps every transition for later inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingOverlayRenderer {
    transitions: Rc<RefCell<Vec<RecordedTransition>>>,
}

impl RecordingOverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<RecordedTransition> {
        self.transitions.borrow().clone()
    }

    /// Transitions that ran to completion
    pub fn completed(&self) -> usize {
        self.transitions
            .borrow()
            .iter()
            .filter(|transition| transition.faded_into.is_some())
            .count()
    }
}

impl OverlayRenderer for RecordingOverlayRenderer {
    fn overlay(&self, target: &NodeSnapshot) -> Box<dyn Overlay> {
        let mut transitions = self.transitions.borrow_mut();
        transitions.push(RecordedTransition {
            from: target.clone(),
            tag_color: None,
            faded_into: None,
        });
        Box::new(RecordingOverlay {
            index: transitions.len() - 1,
            transitions: Rc::clone(&self.transitions),
        })
    }
}

struct RecordingOverlay {
    index: usize,
    transitions: Rc<RefCell<Vec<RecordedTransition>>>,
}

impl Overlay for RecordingOverlay {
    fn apply_tag_color(&mut self, target: &NodeSnapshot, intensity: f32) {
        if let Some(transition) = self.transitions.borrow_mut().get_mut(self.index) {
            transition.tag_color = Some((target.clone(), intensity));
        }
    }

    fn resize_to_and_fade_out(&mut self, target: &NodeSnapshot) {
        if let Some(transition) = self.transitions.borrow_mut().get_mut(self.index) {
            transition.faded_into = Some(target.clone());
        }
    }
}
