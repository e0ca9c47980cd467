/// Lifecycle of a widget instance, driven by the host element callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed and rendered, but never inserted into a document.
    Constructed,
    /// Inserted into a document; root event handlers are bound.
    Attached,
    /// Removed from the document; all listeners are detached.
    Detached,
}

impl Lifecycle {
    /// Transition for an insertion into the document.
    ///
    /// Returns `None` if the instance is already attached.
    pub fn connect(self) -> Option<Self> {
        match self {
            Self::Constructed | Self::Detached => Some(Self::Attached),
            Self::Attached => None,
        }
    }

    /// Transition for a removal from the document.
    ///
    /// Returns `None` unless the instance is attached.
    pub fn disconnect(self) -> Option<Self> {
        match self {
            Self::Attached => Some(Self::Detached),
            Self::Constructed | Self::Detached => None,
        }
    }

    pub fn is_attached(self) -> bool {
        self == Self::Attached
    }
}

#[cfg(test)]
mod tests {
    use super::Lifecycle::*;

    #[test]
    fn test_transitions() {
        assert_eq!(Constructed.connect(), Some(Attached));
        assert_eq!(Attached.connect(), None);
        assert_eq!(Attached.disconnect(), Some(Detached));
        assert_eq!(Detached.disconnect(), None);
        assert_eq!(Constructed.disconnect(), None);
        // Moving an element disconnects and reconnects it.
        assert_eq!(Detached.connect(), Some(Attached));
        assert!(Attached.is_attached());
        assert!(!Detached.is_attached());
    }
}
