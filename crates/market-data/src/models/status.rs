use serde::{Deserialize, Serialize};

/// Version tokens for the three reference lists.
///
/// The API bumps a value whenever the corresponding list changes, so a client
/// only needs to refetch when one of them differs from what it last stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsStatus {
    pub coins: i64,
    pub blockchains: i64,
    pub tokens: i64,
}
