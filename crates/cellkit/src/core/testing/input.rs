use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    error::{Error, Result},
    event::Key,
    surface::InputSource,
};

/// A shared handle on the queue behind a [`ScriptedInput`].
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Pending keys.
    keys: Arc<Mutex<VecDeque<Key>>>,
}

impl Script {
    /// Queue more keys.
    pub fn push<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) {
        self.keys
            .lock()
            .unwrap()
            .extend(keys.into_iter().map(Into::into));
    }

    /// Keys not yet read.
    pub fn remaining(&self) -> Vec<Key> {
        self.keys.lock().unwrap().iter().copied().collect()
    }
}

/// An input source that replays queued keys and fails once they run out,
/// the way a closed terminal does.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    /// Shared queue.
    script: Script,
}

impl ScriptedInput {
    /// An input source over the given keys, along with a handle for queueing
    /// more and inspecting what is left.
    pub fn create<K: Into<Key>>(keys: impl IntoIterator<Item = K>) -> (Script, Self) {
        let script = Script::default();
        script.push(keys);
        (script.clone(), Self { script })
    }
}

impl InputSource for ScriptedInput {
    fn read(&mut self) -> Result<Key> {
        self.script
            .keys
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Input("input exhausted".into()))
    }
}
