//! The reconciliation engine.
//!
//! `ControlledTextInput` sits between a host widget and a controller. Every
//! user edit runs one cycle:
//!
//! 1. snapshot the baseline (last state that agreed with the controller)
//! 2. clear the commit flag
//! 3. hand the widget's new text to the controller
//! 4. if the controller did not call [`ControlledTextInput::set_text_value`]
//!    while it had control, restore the snapshot into the widget
//!
//! The controller answers on the same call stack, so acceptance is signalled
//! by the commit flag rather than by comparing text: a controller that accepts
//! an edit may well set a value equal to what the widget already shows.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use smol_str::SmolStr;

use crate::commands::{CommandBindings, InputCommand};
use crate::config::InputConfig;
use crate::host::{
    EditableHost, EventDisposition, HostCommand, HostEvent, HostListener, SubscriptionId,
};
use crate::tracker::SelectionTracker;
use crate::types::TextState;

/// Controller callback for text edits.
///
/// Receives the input itself so the controller can commit a value without
/// holding a strong reference back to it.
pub type ChangeCallback<H> = Rc<dyn Fn(&ControlledTextInput<H>, &str)>;

/// Controller callback for submit / escape.
pub type ActionCallback = Rc<dyn Fn()>;

/// Where the engine is in an edit cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CyclePhase {
    /// No edit in flight; selection tracking is active.
    #[default]
    Idle,
    /// A snapshot is held and the controller may be running.
    Reconciling,
}

/// Result of one text-changed cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The controller committed a value while handling the edit.
    Accepted,
    /// The controller ignored the edit; the widget was rolled back.
    Rejected,
    /// Another cycle was already in flight, so this notification was dropped.
    Ignored,
}

/// Controller callbacks registered on an input.
pub struct Callbacks<H: EditableHost> {
    on_change_text_value: Option<ChangeCallback<H>>,
    on_submit: Option<ActionCallback>,
    on_press_escape: Option<ActionCallback>,
}

impl<H: EditableHost> Default for Callbacks<H> {
    fn default() -> Self {
        Self {
            on_change_text_value: None,
            on_submit: None,
            on_press_escape: None,
        }
    }
}

impl<H: EditableHost> Clone for Callbacks<H> {
    fn clone(&self) -> Self {
        Self {
            on_change_text_value: self.on_change_text_value.clone(),
            on_submit: self.on_submit.clone(),
            on_press_escape: self.on_press_escape.clone(),
        }
    }
}

impl<H: EditableHost> Callbacks<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change_text_value<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ControlledTextInput<H>, &str) + 'static,
    {
        self.on_change_text_value = Some(Rc::new(callback));
        self
    }

    pub fn on_submit<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_submit = Some(Rc::new(callback));
        self
    }

    pub fn on_press_escape<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_press_escape = Some(Rc::new(callback));
        self
    }
}

/// Builder for [`ControlledTextInput`].
pub struct ControlledTextInputBuilder<H: EditableHost> {
    host: H,
    config: InputConfig,
    callbacks: Callbacks<H>,
    text_value: SmolStr,
}

impl<H: EditableHost + 'static> ControlledTextInputBuilder<H> {
    pub fn config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    pub fn callbacks(mut self, callbacks: Callbacks<H>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn on_change_text_value<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ControlledTextInput<H>, &str) + 'static,
    {
        self.callbacks = self.callbacks.on_change_text_value(callback);
        self
    }

    pub fn on_submit<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.callbacks = self.callbacks.on_submit(callback);
        self
    }

    pub fn on_press_escape<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.callbacks = self.callbacks.on_press_escape(callback);
        self
    }

    /// Initial authoritative value. Defaults to empty.
    pub fn text_value(mut self, value: impl Into<SmolStr>) -> Self {
        self.text_value = value.into();
        self
    }

    /// Subscribe to the host and push the initial value into it.
    pub fn attach(self) -> Rc<ControlledTextInput<H>> {
        let Self {
            host,
            config,
            callbacks,
            text_value,
        } = self;

        let input = Rc::new_cyclic(|weak: &Weak<ControlledTextInput<H>>| {
            let listener: Weak<dyn HostListener> = weak.clone();
            let subscription = host.subscribe(listener);
            ControlledTextInput {
                host,
                tracker: SelectionTracker::new(),
                value_committed: Cell::new(false),
                phase: Cell::new(CyclePhase::Idle),
                callbacks: RefCell::new(callbacks),
                bindings: config.bindings(),
                config,
                subscription,
            }
        });

        input.set_text_value(&text_value);
        input.value_committed.set(false);

        tracing::debug!(
            subscription = ?input.subscription,
            text_value = %text_value,
            "controlled input attached"
        );
        input
    }
}

/// Controlled text input: reconciles a host widget's live buffer with a
/// controller-owned value.
///
/// Single-threaded by construction. All state is behind `Cell`/`RefCell` and
/// no borrow is held across a host call or a controller callback, so both may
/// call back into the input.
pub struct ControlledTextInput<H: EditableHost> {
    host: H,
    tracker: SelectionTracker,
    /// Set by every `set_text_value`; cleared around each edit cycle.
    value_committed: Cell<bool>,
    phase: Cell<CyclePhase>,
    callbacks: RefCell<Callbacks<H>>,
    bindings: CommandBindings,
    config: InputConfig,
    subscription: SubscriptionId,
}

impl<H: EditableHost + 'static> ControlledTextInput<H> {
    pub fn builder(host: H) -> ControlledTextInputBuilder<H> {
        ControlledTextInputBuilder {
            host,
            config: InputConfig::default(),
            callbacks: Callbacks::default(),
            text_value: SmolStr::default(),
        }
    }
}

impl<H: EditableHost> ControlledTextInput<H> {
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase.get()
    }

    /// The last value committed through [`Self::set_text_value`].
    pub fn text_value(&self) -> SmolStr {
        self.tracker.text()
    }

    /// The rollback baseline.
    pub fn previous_state(&self) -> TextState {
        self.tracker.snapshot()
    }

    /// Replace all controller callbacks.
    pub fn set_callbacks(&self, callbacks: Callbacks<H>) {
        *self.callbacks.borrow_mut() = callbacks;
    }

    /// Assign the authoritative value.
    ///
    /// Side effect: if `text` differs from what the widget displays, the widget
    /// content is overwritten and its selection reset the host's way. If it is
    /// equal, the widget (and in particular its selection) is left untouched.
    ///
    /// Calling this from inside the change callback accepts the edit.
    pub fn set_text_value(&self, text: &str) {
        self.value_committed.set(true);
        self.tracker.commit_text(text);

        if self.host.text() == text {
            tracing::trace!(text_value = %text, "value matches widget, keeping selection");
            return;
        }

        self.host.set_text(text);
        self.tracker.commit(&self.host);
        tracing::trace!(
            text_value = %text,
            selection = %self.tracker.selection(),
            "value written to widget"
        );
    }

    /// Run one edit cycle for the widget's current text.
    ///
    /// Normally reached through `HostEvent::TextChanged`.
    pub fn text_did_change(&self) -> EditOutcome {
        if self.phase.get() == CyclePhase::Reconciling {
            tracing::warn!("text change while reconciling, ignoring");
            return EditOutcome::Ignored;
        }

        let snapshot = self.tracker.snapshot();
        let _cycle = CycleGuard::enter(&self.value_committed, &self.phase);

        let text = self.host.text();
        let callback = self.callbacks.borrow().on_change_text_value.clone();
        if let Some(callback) = callback {
            if self.config.rollback_on_panic {
                let result = panic::catch_unwind(AssertUnwindSafe(|| callback(self, text.as_str())));
                if let Err(payload) = result {
                    tracing::warn!(text = %text, "change callback panicked, rolling back");
                    self.roll_back(&snapshot);
                    panic::resume_unwind(payload);
                }
            } else {
                callback(self, text.as_str());
            }
        }

        let outcome = if self.value_committed.get() {
            // The commit left the selection alone if the value matched the
            // widget; catch the baseline up with where the caret ended up.
            self.tracker.refresh_selection(&self.host);
            EditOutcome::Accepted
        } else {
            self.roll_back(&snapshot);
            EditOutcome::Rejected
        };

        tracing::debug!(
            ?outcome,
            edited = %text,
            text_value = %self.tracker.text(),
            selection = %self.tracker.selection(),
            "edit reconciled"
        );
        outcome
    }

    /// Tell the controller the user submitted (Enter).
    pub fn submit(&self) -> EventDisposition {
        self.fire(InputCommand::Submit)
    }

    /// Tell the controller the user cancelled (Escape).
    pub fn press_escape(&self) -> EventDisposition {
        self.fire(InputCommand::Cancel)
    }

    /// Route a host key command through the configured bindings.
    pub fn handle_command(&self, command: HostCommand) -> EventDisposition {
        match self.bindings.resolve(command) {
            Some(input_command) => self.fire(input_command),
            None => EventDisposition::PassThrough,
        }
    }

    fn fire(&self, command: InputCommand) -> EventDisposition {
        let callback = {
            let callbacks = self.callbacks.borrow();
            match command {
                InputCommand::Submit => callbacks.on_submit.clone(),
                InputCommand::Cancel => callbacks.on_press_escape.clone(),
            }
        };

        match callback {
            Some(callback) => {
                tracing::debug!(?command, "forwarding command to controller");
                callback();
                EventDisposition::Handled
            }
            None if self.config.suppress_unbound_commands => EventDisposition::Handled,
            None => EventDisposition::PassThrough,
        }
    }

    fn roll_back(&self, snapshot: &TextState) {
        // Baseline first, so selection notifications raised by the writes
        // below compare against the restored text.
        self.tracker.restore(snapshot.clone());
        if self.host.text() != *snapshot.text() {
            self.host.set_text(snapshot.text());
        }
        self.host.set_selection(snapshot.selection());
    }
}

impl<H: EditableHost> HostListener for ControlledTextInput<H> {
    fn handle_event(&self, event: HostEvent) -> EventDisposition {
        match event {
            HostEvent::SelectionChanged { session } => {
                if self.phase.get() == CyclePhase::Idle {
                    self.tracker.selection_did_change(&self.host, session);
                }
                EventDisposition::PassThrough
            }
            _ if self.host.active_session() != Some(event.session()) => {
                tracing::trace!(?event, "event from another session, ignoring");
                EventDisposition::PassThrough
            }
            HostEvent::TextChanged { .. } => {
                self.text_did_change();
                EventDisposition::PassThrough
            }
            HostEvent::Command { command, .. } => self.handle_command(command),
        }
    }
}

impl<H: EditableHost> Drop for ControlledTextInput<H> {
    fn drop(&mut self) {
        self.host.unsubscribe(self.subscription);
    }
}

/// Marks an edit cycle; resets the commit flag and phase on exit, unwinding included.
struct CycleGuard<'a> {
    value_committed: &'a Cell<bool>,
    phase: &'a Cell<CyclePhase>,
}

impl<'a> CycleGuard<'a> {
    fn enter(value_committed: &'a Cell<bool>, phase: &'a Cell<CyclePhase>) -> Self {
        value_committed.set(false);
        phase.set(CyclePhase::Reconciling);
        Self {
            value_committed,
            phase,
        }
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.value_committed.set(false);
        self.phase.set(CyclePhase::Idle);
    }
}
