use std::collections::{BTreeMap, VecDeque};

use itertools::Itertools as _;

use crate::error::ActivateError;
use crate::hooks::{DragHooks, DragOutcome};
use crate::input::InputEvent;
use crate::options::{DragMode, DragOptions, RegistryOptions};
use crate::session::DragSession;
use crate::surface::{ElementId, Surface};

/// Opaque handle of an activated element. Never reused by the registry that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DragHandle(pub(crate) u64);

/// One event binding of one session. Revoked as a unit with its siblings on cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Binding {
    /// Presses landing on the element.
    PointerDown(ElementId),

    /// Moves anywhere.
    PointerMove,

    /// Releases anywhere.
    PointerUp,

    TransitionEnd(ElementId),
}

impl Binding {
    fn matches(self, event: InputEvent) -> bool {
        match (self, event) {
            (Self::PointerDown(_), InputEvent::PointerDown(_))
            | (Self::PointerMove, InputEvent::PointerMove(_))
            | (Self::PointerUp, InputEvent::PointerUp(_)) => true,
            (Self::TransitionEnd(bound), InputEvent::TransitionEnd(element)) => bound == element,
            _ => false,
        }
    }
}

/// Table of live drag sessions, owned by the caller.
///
/// Independent registries share nothing, so tests (or separate canvases) can each have their own.
#[derive(Debug, Default)]
pub struct DragRegistry {
    options: RegistryOptions,
    next_handle: u64,
    next_token: u64,
    sessions: ahash::HashMap<DragHandle, DragSession>,
    bound_elements: ahash::HashMap<ElementId, DragHandle>,

    // Ordered so dispatch visits sessions in activation order.
    subscriptions: BTreeMap<SubscriptionToken, (DragHandle, Binding)>,
    session_tokens: ahash::HashMap<DragHandle, Vec<SubscriptionToken>>,

    debug_log: VecDeque<String>,
    debug_event: u64,
}

impl DragRegistry {
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Make `element` draggable.
    ///
    /// # Errors
    /// [`ActivateError::MissingTargets`] if snap-to-target mode has no targets,
    /// [`ActivateError::AlreadyBound`] if a live session already owns `element`,
    /// [`ActivateError::NoGeometry`] if the surface cannot measure `element`.
    /// No session is created on error.
    pub fn activate(
        &mut self,
        surface: &mut dyn Surface,
        element: ElementId,
        options: &DragOptions,
    ) -> Result<DragHandle, ActivateError> {
        if options.mode == DragMode::SnapToTarget && options.targets.is_empty() {
            return Err(ActivateError::MissingTargets);
        }
        if self.bound_elements.contains_key(&element) {
            return Err(ActivateError::AlreadyBound { element });
        }

        // Measure before anything is written to the surface.
        let measured = surface
            .measure(element)
            .ok_or(ActivateError::NoGeometry { element })?;

        let handle = DragHandle(self.next_handle.max(1));
        self.next_handle = handle.0.saturating_add(1);

        let session = DragSession::new(handle, element, options, measured, surface);

        let tokens = [
            Binding::PointerDown(element),
            Binding::PointerMove,
            Binding::PointerUp,
            Binding::TransitionEnd(element),
        ]
        .map(|binding| self.bind(handle, binding));

        self.session_tokens.insert(handle, tokens.to_vec());
        self.bound_elements.insert(element, handle);
        self.sessions.insert(handle, session);

        log::debug!("activated {handle:?} on {element:?} ({:?})", options.mode);
        self.debug_log_event(format!(
            "activate handle={} element={} mode={:?}",
            handle.0, element.0, options.mode
        ));
        Ok(handle)
    }

    /// [`Self::activate`] the first element matching `selector`.
    ///
    /// # Errors
    /// [`ActivateError::SourceNotFound`] if nothing matches, otherwise as [`Self::activate`].
    pub fn activate_selector(
        &mut self,
        surface: &mut dyn Surface,
        selector: &str,
        options: &DragOptions,
    ) -> Result<DragHandle, ActivateError> {
        let element = surface
            .resolve(selector)
            .ok_or_else(|| ActivateError::SourceNotFound {
                selector: selector.to_owned(),
            })?;
        self.activate(surface, element, options)
    }

    fn bind(&mut self, handle: DragHandle, binding: Binding) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscriptions.insert(token, (handle, binding));
        token
    }

    /// Stop dragging: unbind, force any settle transition to its end, remove indicators and
    /// markers. Unknown or already cancelled handles are ignored.
    pub fn cancel(&mut self, surface: &mut dyn Surface, handle: DragHandle) {
        let Some(mut session) = self.sessions.remove(&handle) else {
            log::trace!("cancel of unknown {handle:?} ignored");
            return;
        };
        for token in self.session_tokens.remove(&handle).unwrap_or_default() {
            self.subscriptions.remove(&token);
        }
        self.bound_elements.remove(&session.element());
        session.teardown(surface);

        log::debug!("cancelled {handle:?}");
        self.debug_log_event(format!("cancel handle={}", handle.0));
    }

    /// Deliver one host event to every session bound to it.
    pub fn dispatch(
        &mut self,
        surface: &mut dyn Surface,
        hooks: &mut dyn DragHooks,
        event: InputEvent,
    ) {
        // Snapshot: a session may cancel itself while we go.
        let matching: Vec<(DragHandle, Binding)> = self
            .subscriptions
            .values()
            .filter(|(_, binding)| binding.matches(event))
            .copied()
            .collect();

        for (handle, binding) in matching {
            let Some(session) = self.sessions.get_mut(&handle) else {
                continue;
            };
            match (binding, event) {
                (Binding::PointerDown(element), InputEvent::PointerDown(pos)) => {
                    if surface.hits(element, pos) && session.pointer_down(surface, hooks, pos) {
                        self.debug_log_event(format!("drag start handle={}", handle.0));
                    }
                }
                (Binding::PointerMove, InputEvent::PointerMove(pos)) => {
                    session.pointer_move(surface, hooks, pos);
                }
                (Binding::PointerUp, InputEvent::PointerUp(_)) => {
                    let Some(outcome) = session.pointer_up(surface, hooks) else {
                        continue;
                    };
                    self.debug_log_event(format!("drag end handle={} {outcome:?}", handle.0));
                    if matches!(outcome, DragOutcome::Snapped { .. }) {
                        self.cancel(surface, handle);
                    }
                }
                (Binding::TransitionEnd(_), InputEvent::TransitionEnd(_)) => {
                    session.transition_end();
                }
                _ => {}
            }
        }
    }

    pub fn get(&self, handle: DragHandle) -> Option<&DragSession> {
        self.sessions.get(&handle)
    }

    pub fn contains(&self, handle: DragHandle) -> bool {
        self.sessions.contains_key(&handle)
    }

    pub fn handle_for(&self, element: ElementId) -> Option<DragHandle> {
        self.bound_elements.get(&element).copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of live event bindings across all sessions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn debug_log_event(&mut self, message: String) {
        if !self.options.debug_event_log {
            return;
        }
        self.debug_event += 1;
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[event {}] {}", self.debug_event, message));
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// The recorded lifecycle events, one per line. Empty unless
    /// [`RegistryOptions::debug_event_log`] is set.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }
}
