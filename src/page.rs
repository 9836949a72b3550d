//! The slice of the host page the controllers touch
//!
//! Controllers only ever ask whether an element exists and write text into
//! input fields. [`MemoryPage`] keeps that state in process for tests and
//! headless hosts; the `wasm` feature adds a DOM-backed implementation.

use crate::prelude::{HashMap, HashSet};

pub trait Page {
    /// Whether an element with this id is present
    fn has_element(&self, id: &str) -> bool;

    /// Writes `value` into the input with this id.
    /// Returns false when no such input exists.
    fn set_field_value(&mut self, id: &str, value: &str) -> bool;
}

/// In-memory page: a set of container ids plus text inputs
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    containers: HashSet<String>,
    inputs: HashMap<String, String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.containers.insert(id.into());
        self
    }

    /// Adds an empty text input
    pub fn with_input(mut self, id: impl Into<String>) -> Self {
        self.inputs.insert(id.into(), String::new());
        self
    }

    /// Current text of an input, `None` when the input does not exist
    pub fn value(&self, id: &str) -> Option<&str> {
        self.inputs.get(id).map(String::as_str)
    }
}

impl Page for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.containers.contains(id) || self.inputs.contains_key(id)
    }

    fn set_field_value(&mut self, id: &str, value: &str) -> bool {
        match self.inputs.get_mut(id) {
            Some(field) => {
                *field = value.to_string();
                true
            }
            None => false,
        }
    }
}
