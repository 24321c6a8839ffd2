use std::collections::HashMap;

use super::binding::Observer;

/// Named extension points in the interaction cycle. Observers on `Before*`
/// signals can veto by returning `Ok(false)`; the others are notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Before an input is processed.
    BeforeInput,
    /// After an input has been processed without ending the interaction.
    AfterInput,
    /// Before a confirming key ends the interaction.
    BeforeLeaving,
    /// After a confirming key has been accepted.
    AfterLeaving,
    /// Before an item is pressed.
    BeforePressing,
    /// After an item has been pressed.
    Pressed,
    /// Before a displayed message is replaced.
    BeforeMessageChange,
}

impl Signal {
    /// Can observers of this signal veto?
    pub fn can_veto(&self) -> bool {
        matches!(
            self,
            Self::BeforeInput | Self::BeforeLeaving | Self::BeforePressing | Self::BeforeMessageChange
        )
    }
}

/// Signals every widget supports.
pub const COMMON_SIGNALS: &[Signal] = &[
    Signal::BeforeInput,
    Signal::AfterInput,
    Signal::BeforeLeaving,
    Signal::AfterLeaving,
];

/// Observer lists keyed by signal.
pub struct Signals<W> {
    /// Signals this widget kind emits.
    supported: &'static [Signal],
    /// Connected observers.
    observers: HashMap<Signal, Vec<Observer<W>>>,
}

impl<W> Signals<W> {
    /// An empty set of observers for a widget supporting `supported`.
    pub fn new(supported: &'static [Signal]) -> Self {
        Self {
            supported,
            observers: HashMap::new(),
        }
    }

    /// Does the widget emit this signal?
    pub fn supports(&self, signal: Signal) -> bool {
        self.supported.contains(&signal)
    }

    /// Add an observer. The caller checks support first.
    pub(crate) fn connect(&mut self, signal: Signal, obs: Observer<W>) {
        self.observers.entry(signal).or_default().push(obs);
    }

    /// Remove every observer of a signal.
    pub fn disconnect(&mut self, signal: Signal) {
        self.observers.remove(&signal);
    }

    /// A snapshot of the observers for a signal.
    pub(crate) fn observers(&self, signal: Signal) -> Vec<Observer<W>> {
        self.observers.get(&signal).cloned().unwrap_or_default()
    }
}
