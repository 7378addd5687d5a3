use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order book
// ---------------------------------------------------------------------------

/// An open sell order, with the offering address resolved through its
/// originating message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ask {
    pub id: i64,
    #[serde(with = "crate::numeric::fixed16")]
    pub price: BigDecimal,
    /// Unix seconds.
    pub expires_at: i64,
    pub address: String,
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesDatapoint {
    /// Unix seconds at the UTC day boundary.
    pub date: i64,
    #[serde(with = "crate::numeric::fixed16")]
    pub amount: BigDecimal,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Point-in-time market statistics. Built fresh per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Highest price first, at most `TOP_ASKS_LIMIT` entries.
    pub asks: Vec<Ask>,
    /// Reserved; always empty.
    pub bids: Vec<Ask>,
    /// One point per day of the window, ascending.
    pub volume: Vec<TimeseriesDatapoint>,
}

// ---------------------------------------------------------------------------
// Miner statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCapacityForMinerStat {
    pub count: u64,
    #[serde(with = "crate::numeric::fixed16")]
    pub average_storage_price: BigDecimal,
    #[serde(rename = "averageCapacityGB")]
    pub average_capacity_gb: f64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn market_stats_wire_shape() {
        let stats = MarketStats {
            asks: vec![Ask {
                id: 7,
                price: dec("2.5"),
                expires_at: 1_700_000_000,
                address: "t1abc".to_string(),
            }],
            bids: vec![],
            volume: vec![TimeseriesDatapoint {
                date: 1_699_920_000,
                amount: dec("100"),
            }],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "asks": [{
                    "id": 7,
                    "price": "2.5000000000000000",
                    "expiresAt": 1_700_000_000,
                    "address": "t1abc"
                }],
                "bids": [],
                "volume": [{ "date": 1_699_920_000, "amount": "100.0000000000000000" }]
            })
        );
    }

    #[test]
    fn miner_stat_json_uses_codec_for_price_only() {
        let stat = CostCapacityForMinerStat {
            count: 3,
            average_storage_price: dec("0.000123"),
            average_capacity_gb: 512.5,
        };

        let json = serde_json::to_string(&stat).unwrap();
        assert_eq!(
            json,
            r#"{"count":3,"averageStoragePrice":"0.0001230000000000","averageCapacityGB":512.5}"#
        );

        let back: CostCapacityForMinerStat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stat);
    }

    #[test]
    fn malformed_wire_price_is_rejected() {
        let raw = r#"{"id":1,"price":"1,5","expiresAt":0,"address":"a"}"#;
        assert!(serde_json::from_str::<Ask>(raw).is_err());
    }
}
