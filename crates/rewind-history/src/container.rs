#![forbid(unsafe_code)]

//! The value a history manager edits.

/// Owner of the current value of type `T`.
///
/// Only the owning [`HistoryManager`](crate::HistoryManager) writes through
/// a container: directly when restoring a snapshot, or by handing `&mut T`
/// to an operation's `apply`/`revert`. Readers get shared access only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateContainer<T> {
    value: T,
}

impl<T> StateContainer<T> {
    /// Create a container holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the container, returning its value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_holds_value() {
        let c = StateContainer::new(7);
        assert_eq!(*c.value(), 7);
    }

    #[test]
    fn set_value_replaces() {
        let mut c = StateContainer::new(String::from("a"));
        c.set_value(String::from("b"));
        assert_eq!(c.value(), "b");
    }

    #[test]
    fn value_mut_writes_through() {
        let mut c = StateContainer::new(vec![1, 2]);
        c.value_mut().push(3);
        assert_eq!(c.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn default_uses_value_default() {
        let c = StateContainer::<i32>::default();
        assert_eq!(*c.value(), 0);
    }
}
