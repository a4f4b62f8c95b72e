//! # Transition Effects
//!
//! Visual highlight/fade played over an element while a user-initiated
//! command replaces it.
//!
//! The coordinator never sits in the mutation path. It listens to the
//! history's `command-created` event and, per command, to `before-replace`
//! and a one-shot `after-replace`. Overlays are only created while an
//! [`EffectWindow`] is open, so silent replacements (previews, commits)
//! never animate.
//!
//! ```text
//! open_window() ─┐
//!                ├─ before-replace(outgoing) → renderer.overlay(outgoing)
//!                ├─ after-replace(incoming)  → apply_tag_color(incoming, 0.25)
//!                │                             resize_to_and_fade_out(incoming)
//! drop(window) ──┘
//! ```

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::command::{CreatedCommand, ReplaceEvent};
use crate::events::{Subscription, WeakEmitter};
use crate::history::CommandHistory;
use crate::overlay::OverlayRenderer;

/// Tint strength used when coloring the overlay with the new tag's color
pub const TAG_COLOR_INTENSITY: f32 = 0.25;

/// Guard for one effect window; dropping it closes the window
///
/// Only the outermost window owns the flag. Windows opened while another is
/// open are inert, so nested calls never toggle the flag.
#[must_use = "the effect window closes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct EffectWindow {
    flag: Option<Rc<Cell<bool>>>,
}

impl EffectWindow {
    fn inert() -> Self {
        Self { flag: None }
    }

    /// Whether this guard opened the window (as opposed to nesting in one)
    pub fn is_outermost(&self) -> bool {
        self.flag.is_some()
    }
}

impl Drop for EffectWindow {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            flag.set(false);
        }
    }
}

/// Something that can enable transition effects for the duration of an action
pub trait TransitionEffects {
    fn open_window(&self) -> EffectWindow;

    fn is_enabled(&self) -> bool;
}

/// `enable_during` helpers for every [`TransitionEffects`]
pub trait TransitionEffectsExt: TransitionEffects {
    /// Run `action` with effects enabled
    fn enable_during<R>(&self, action: impl FnOnce() -> R) -> R {
        let _window = self.open_window();
        action()
    }

    /// Keep effects enabled until `future` completes
    fn enable_during_async<F: Future>(&self, future: F) -> impl Future<Output = F::Output> {
        let window = self.open_window();
        async move {
            let _window = window;
            future.await
        }
    }
}

impl<T: TransitionEffects + ?Sized> TransitionEffectsExt for T {}

/// Effects switched off: actions just run
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransitionEffects;

impl TransitionEffects for NullTransitionEffects {
    fn open_window(&self) -> EffectWindow {
        EffectWindow::inert()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Effects driven by command lifecycle events
pub struct TransitionEffectCoordinator {
    enabled: Rc<Cell<bool>>,
    command_created: WeakEmitter<CreatedCommand>,
    subscription: Subscription,
}

impl TransitionEffectCoordinator {
    pub fn new(history: &dyn CommandHistory, renderer: Rc<dyn OverlayRenderer>) -> Self {
        let enabled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&enabled);

        let subscription = history
            .command_created()
            .subscribe(move |created: &CreatedCommand| {
                let flag = Rc::clone(&flag);
                let renderer = Rc::clone(&renderer);
                let after_replace = created.events.after_replace.clone();

                created
                    .events
                    .before_replace
                    .subscribe(move |event: &ReplaceEvent| {
                        if !flag.get() {
                            return;
                        }
                        let Some(outgoing) = event.primary() else {
                            return;
                        };
                        let mut overlay = renderer.overlay(outgoing);
                        after_replace.once(move |event: &ReplaceEvent| {
                            if let Some(incoming) = event.primary() {
                                overlay.apply_tag_color(incoming, TAG_COLOR_INTENSITY);
                                overlay.resize_to_and_fade_out(incoming);
                            }
                        });
                    });
            });

        Self {
            enabled,
            command_created: history.command_created().downgrade(),
            subscription,
        }
    }
}

impl TransitionEffects for TransitionEffectCoordinator {
    fn open_window(&self) -> EffectWindow {
        if self.enabled.get() {
            return EffectWindow::inert();
        }
        self.enabled.set(true);
        EffectWindow {
            flag: Some(Rc::clone(&self.enabled)),
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl Drop for TransitionEffectCoordinator {
    fn drop(&mut self) {
        if let Some(emitter) = self.command_created.upgrade() {
            emitter.unsubscribe(self.subscription);
        }
    }
}

impl fmt::Debug for TransitionEffectCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEffectCoordinator")
            .field("enabled", &self.enabled.get())
            .finish()
    }
}
