//! Sealed trait marker for Transport implementations.
//!
//! Only this crate may implement `Transport`, so every implementation goes
//! through the same timeout and error classification rules.

pub(crate) mod private {
    /// Sealed trait marker.
    pub trait Sealed {}
}
