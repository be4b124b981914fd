use std::collections::HashMap;

/// Variable names visible while lowering one function body, mapped to
/// their already-lowered values.
#[derive(Debug, Clone)]
pub struct Environment<V> {
    values: HashMap<String, V>,
}

impl<V> Environment<V> {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
        }
    }

    /// Binds `name` to `value`, returning the value it shadowed.
    pub fn bind(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.values.insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V> Default for Environment<V> {
    fn default() -> Self {
        Environment::new()
    }
}
