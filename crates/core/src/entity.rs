//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Persisted records receive their identity from the store on first save, so
/// an entity that has never been persisted reports no identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier, or `None` before the first save.
    fn id(&self) -> Option<Self::Id>;

    /// Whether the store has assigned an identity yet.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
