/// Classification for retry policy.
///
/// The synchronizer never retries on its own. Callers that schedule syncs
/// (the server scheduler, a UI refresh button) use this to decide whether an
/// early retry is worthwhile or whether they should wait for the next cycle.
///
/// | Class | Retry early? |
/// |-------|--------------|
/// | `Never` | No, the request is fundamentally invalid |
/// | `WithBackoff` | Yes, after a delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Bad response shape, rejected request, or other terminal failure.
    Never,

    /// Transient failure such as rate limiting (429), a timeout or a dropped connection.
    WithBackoff,
}
