//! Outcome of an insert bounded by the owner's plan.

/// Result of a plan-limited insert. The owner's row is locked for the
/// duration of the check, so concurrent inserts for one user serialize.
#[derive(Debug, Clone)]
pub enum QuotaInsert<T> {
    Created(T),
    /// No user row with the given id.
    OwnerNotFound,
    /// The plan ceiling was already reached; nothing was written.
    LimitReached { used: i64, limit: i64 },
}
