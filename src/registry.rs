// ==============================================================================
// Type Registry: One Converted Type per Qualified Name
// ==============================================================================
//
// Each builder owns one registry for the duration of a pass. A qualified name
// maps to at most one entry; the first registration wins and later lookups
// return the cached entry without walking the source node again. Because a
// message is registered before its fields are walked, a lookup during that
// walk finds the entry and the recursion stops, which is what lets cyclic
// type graphs terminate.
//
// Synthesized types (map entries, oneof unions) live in the same namespace
// under their synthetic names, so lookup and printing need no special cases.

use indexmap::IndexMap;

/// Qualified name → converted type, in registration order.
#[derive(Debug, Clone)]
pub struct TypeRegistry<T> {
    entries: IndexMap<String, T>,
}

impl<T> TypeRegistry<T> {
    pub fn new() -> Self {
        TypeRegistry {
            entries: IndexMap::new(),
        }
    }

    /// Register the converted type for `name`. Fails if the name already has
    /// an entry; the existing entry is left untouched.
    pub fn register(&mut self, name: impl Into<String>, entry: T) -> Result<&mut T, String> {
        let name = name.into();
        match self.entries.entry(name) {
            indexmap::map::Entry::Occupied(e) => {
                Err(format!("type `{}` is already registered", e.key()))
            }
            indexmap::map::Entry::Vacant(e) => Ok(e.insert(entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_values()
    }
}

impl<T> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
