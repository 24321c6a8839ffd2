use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{error::Result, event::Key, screen::Screen};

/// A shared observer callback. It receives the widget, the screen and the
/// input that triggered it.
pub type Observer<W> = Rc<RefCell<dyn FnMut(&mut W, &mut Screen, Key) -> Result<bool>>>;

/// Wrap a closure as an [`Observer`].
pub fn observer<W, F>(f: F) -> Observer<W>
where
    F: FnMut(&mut W, &mut Screen, Key) -> Result<bool> + 'static,
{
    Rc::new(RefCell::new(f))
}

/// What a bound key does.
pub enum Action<W> {
    /// Dispatch a different key through the widget's built-in handling.
    Remap(Key),
    /// Call an observer. An observer returning `Ok(true)` has handled the
    /// key; `Ok(false)` lets the key fall through to built-in handling.
    Observe(Observer<W>),
}

impl<W> Clone for Action<W> {
    fn clone(&self) -> Self {
        match self {
            Self::Remap(k) => Self::Remap(*k),
            Self::Observe(o) => Self::Observe(o.clone()),
        }
    }
}

impl<W> fmt::Debug for Action<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remap(k) => write!(f, "Remap({k})"),
            Self::Observe(_) => write!(f, "Observe(..)"),
        }
    }
}

/// Per-widget key bindings, consulted before built-in handling. Keys are
/// normalized on the way in and on lookup.
pub struct BindingTable<W> {
    /// Bound keys.
    bindings: HashMap<Key, Action<W>>,
}

impl<W> Default for BindingTable<W> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<W> BindingTable<W> {
    /// Bind a key, replacing any previous binding.
    pub fn bind(&mut self, key: Key, action: Action<W>) {
        self.bindings.insert(key.normalize(), action);
    }

    /// Remove a binding.
    pub fn unbind(&mut self, key: Key) -> Option<Action<W>> {
        self.bindings.remove(&key.normalize())
    }

    /// Look up the action for a key.
    pub fn get(&self, key: Key) -> Option<Action<W>> {
        self.bindings.get(&key.normalize()).cloned()
    }

    /// Is the key bound?
    pub fn is_bound(&self, key: Key) -> bool {
        self.bindings.contains_key(&key.normalize())
    }

    /// Drop every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
