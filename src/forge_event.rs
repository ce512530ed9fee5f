use crate::Slot;

/// Events emitted by a forge during operations.
///
/// These events are passed to the callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use anvil_forge::{ForgeEvent, Slot};
///
/// let event = ForgeEvent::Set { slot: Slot::Response };
/// assert_eq!(event.to_string(), "set { slot: response }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeEvent {
    /// A callable was stored under a slot.
    Set { slot: Slot },

    /// A slot was looked up.
    Get {
        slot: Slot,
        /// Whether a callable was registered
        found: bool,
    },

    /// A slot existence check was performed.
    Contains { slot: Slot, found: bool },

    /// An accessor found its slot unset and took its alternate path.
    ///
    /// `to` is `None` when the alternate path is a placeholder or a no-op
    /// rather than another slot.
    Fallback { from: Slot, to: Option<Slot> },
}

impl std::fmt::Display for ForgeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForgeEvent::Set { slot } => write!(f, "set {{ slot: {} }}", slot),
            ForgeEvent::Get { slot, found } => {
                write!(f, "get {{ slot: {}, found: {} }}", slot, found)
            }
            ForgeEvent::Contains { slot, found } => {
                write!(f, "contains {{ slot: {}, found: {} }}", slot, found)
            }
            ForgeEvent::Fallback { from, to: Some(to) } => {
                write!(f, "fallback {{ from: {}, to: {} }}", from, to)
            }
            ForgeEvent::Fallback { from, to: None } => {
                write!(f, "fallback {{ from: {}, to: default }}", from)
            }
        }
    }
}
