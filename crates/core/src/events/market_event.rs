//! Market event types.

use serde::{Deserialize, Serialize};

/// Events emitted by the coin syncer after successful mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// The coin/blockchain/token tables were replaced. Carries no payload;
    /// listeners re-read what they need.
    FullCoinsUpdated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_event_serialization() {
        let json = serde_json::to_string(&MarketEvent::FullCoinsUpdated).unwrap();
        assert_eq!(json, r#"{"type":"full_coins_updated"}"#);

        let deserialized: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, MarketEvent::FullCoinsUpdated);
    }
}
