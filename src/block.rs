use crate::source::BlockFetchError;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A block as returned by a node.
///
/// Only `number` and `timestamp` are interpreted. The rest of the node's object is kept in
/// `raw` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub number: u64,
    /// Unix seconds.
    pub timestamp: i64,
    pub raw: Value,
}

impl Block {
    /// Builds a block from a node's JSON object, reading the number and timestamp from the
    /// given field names.
    ///
    /// `requested` is the number the caller asked for; it's only used for error reporting.
    pub fn from_json(
        requested: u64,
        raw: Value,
        number_field: &str,
        timestamp_field: &str,
    ) -> Result<Self, BlockFetchError> {
        if !raw.is_object() {
            return Err(BlockFetchError::Malformed {
                number: requested,
                reason: format!("expected a JSON object, got `{raw}`"),
            });
        }

        let field = |name: &str| {
            raw.get(name)
                .and_then(parse_quantity)
                .ok_or_else(|| BlockFetchError::Malformed {
                    number: requested,
                    reason: format!("missing or invalid `{name}`"),
                })
        };
        let number = field(number_field)?;
        let timestamp = field(timestamp_field)?;
        let timestamp = i64::try_from(timestamp).map_err(|_| BlockFetchError::Malformed {
            number: requested,
            reason: format!("timestamp {timestamp} out of range"),
        })?;

        Ok(Self {
            number,
            timestamp,
            raw,
        })
    }

    /// A block carrying nothing but its number and timestamp.
    pub fn bare(number: u64, timestamp: i64) -> Self {
        Self {
            number,
            timestamp,
            raw: serde_json::json!({
                "number": number,
                "timestamp": timestamp,
            }),
        }
    }

    /// Block time in UTC, if the timestamp is representable.
    pub fn time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Parses a node quantity: a JSON integer, a `0x`-prefixed hex string or a decimal string.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some("") => None,
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity(&json!("0xc65d40")), Some(13_000_000));
        assert_eq!(parse_quantity(&json!("0x0")), Some(0));
        assert_eq!(parse_quantity(&json!("1650212199")), Some(1650212199));
        assert_eq!(parse_quantity(&json!(42)), Some(42));
        assert_eq!(parse_quantity(&json!("0x")), None);
        assert_eq!(parse_quantity(&json!("0xzz")), None);
        assert_eq!(parse_quantity(&json!(-1)), None);
        assert_eq!(parse_quantity(&json!(1.5)), None);
        assert_eq!(parse_quantity(&Value::Null), None);
    }

    #[test]
    fn ethereum_block() {
        let raw = json!({
            "number": "0xc65d40",
            "timestamp": "0x6112f593",
            "hash": "0x736048fc56ee5570d18fce0fbad513f8a3cc1de2b18bfecfc8b3663e0bee1570",
        });
        let block = Block::from_json(13_000_000, raw.clone(), "number", "timestamp").unwrap();
        assert_eq!(block.number, 13_000_000);
        assert_eq!(block.timestamp, 0x6112f593);
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn bitcoin_header() {
        let raw = json!({
            "hash": "00000000000000000001fa1b0b7ad7c33d38d1e3b05e4a3e6d4c2a4f1b2c3d4e",
            "height": 840000,
            "time": 1713571767,
        });
        let block = Block::from_json(840000, raw, "height", "time").unwrap();
        assert_eq!(block.number, 840000);
        assert_eq!(block.timestamp, 1713571767);
        assert_eq!(
            block.time().unwrap().to_rfc3339(),
            "2024-04-20T00:09:27+00:00"
        );
    }

    #[test]
    fn malformed() {
        let missing = Block::from_json(7, json!({ "number": "0x7" }), "number", "timestamp");
        assert!(matches!(
            missing,
            Err(BlockFetchError::Malformed { number: 7, .. })
        ));

        let not_object = Block::from_json(7, json!("0x7"), "number", "timestamp");
        assert!(matches!(
            not_object,
            Err(BlockFetchError::Malformed { number: 7, .. })
        ));

        let too_large = Block::from_json(
            7,
            json!({ "number": 7, "timestamp": "0xffffffffffffffff" }),
            "number",
            "timestamp",
        );
        assert!(matches!(
            too_large,
            Err(BlockFetchError::Malformed { number: 7, .. })
        ));
    }
}
