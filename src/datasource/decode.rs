//! Raw log -> typed event decoding.
//!
//! Vexchange v1 (Uniswap v1 ABI) indexes every parameter of its liquidity and
//! swap events, so those decode entirely from topics. Transfer keeps `_value`
//! in the data segment per ERC-20.

use super::RawEvent;
use crate::domain::{Address, Decimal, PoolEvent};
use thiserror::Error;

pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
pub const TOKEN_PURCHASE_TOPIC: &str =
    "0xcd60aa75dea3072fbc07ae6d7d856b5dc5f4eee88854f5b4abf7b680ef8bc50f";
pub const ETH_PURCHASE_TOPIC: &str =
    "0x7f4091b46c33e918a0f3aa42307641d17bb67029427a5369e54b353984238705";
pub const ADD_LIQUIDITY_TOPIC: &str =
    "0x06239653922ac7bea6aa2b19dc486b9361821d37712eb796adfd38d81de278ca";
pub const REMOVE_LIQUIDITY_TOPIC: &str =
    "0x0fbf06c058b90cb038a618f8c2acbf6145f8b3570fd1fa56abb8f0f3f05b36e8";

/// All topic0 discriminators the range query subscribes to.
pub const ALL_TOPICS: [&str; 5] = [
    ADD_LIQUIDITY_TOPIC,
    REMOVE_LIQUIDITY_TOPIC,
    TRANSFER_TOPIC,
    ETH_PURCHASE_TOPIC,
    TOKEN_PURCHASE_TOPIC,
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown event topic {0}")]
    UnknownTopic(String),
    #[error("event {kind} expects {expected} topics, got {got}")]
    TopicCount {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("malformed 32-byte word: {0}")]
    BadWord(String),
    #[error("amount exceeds representable range: {0}")]
    AmountOverflow(String),
    #[error("event data segment too short: {0}")]
    ShortData(String),
}

/// Decode one raw log entry into a typed pool event.
///
/// A failure here aborts the whole request; a partially reconstructed
/// position is worse than none.
pub fn decode_event(raw: &RawEvent) -> Result<PoolEvent, DecodeError> {
    let topic0 = raw
        .topics
        .first()
        .ok_or_else(|| DecodeError::TopicCount {
            kind: "unknown",
            expected: 1,
            got: 0,
        })?
        .as_str();

    match topic0 {
        ADD_LIQUIDITY_TOPIC => {
            let [provider, eth, token] = indexed_words(raw, "AddLiquidity")?;
            Ok(PoolEvent::AddLiquidity {
                provider: word_to_address(provider)?,
                eth_amount: word_to_amount(eth)?,
                token_amount: word_to_amount(token)?,
                tx_hash: raw.tx_hash.clone(),
            })
        }
        REMOVE_LIQUIDITY_TOPIC => {
            let [provider, eth, token] = indexed_words(raw, "RemoveLiquidity")?;
            Ok(PoolEvent::RemoveLiquidity {
                provider: word_to_address(provider)?,
                eth_amount: word_to_amount(eth)?,
                token_amount: word_to_amount(token)?,
                tx_hash: raw.tx_hash.clone(),
            })
        }
        TRANSFER_TOPIC => {
            if raw.topics.len() != 3 {
                return Err(DecodeError::TopicCount {
                    kind: "Transfer",
                    expected: 3,
                    got: raw.topics.len(),
                });
            }
            Ok(PoolEvent::Transfer {
                from: word_to_address(&raw.topics[1])?,
                to: word_to_address(&raw.topics[2])?,
                value: word_to_amount(data_word(&raw.data, 0)?)?,
                tx_hash: raw.tx_hash.clone(),
            })
        }
        ETH_PURCHASE_TOPIC => {
            let [buyer, tokens_sold, eth_bought] = indexed_words(raw, "EthPurchase")?;
            Ok(PoolEvent::EthPurchase {
                buyer: word_to_address(buyer)?,
                tokens_sold: word_to_amount(tokens_sold)?,
                eth_bought: word_to_amount(eth_bought)?,
                tx_hash: raw.tx_hash.clone(),
            })
        }
        TOKEN_PURCHASE_TOPIC => {
            let [buyer, eth_sold, tokens_bought] = indexed_words(raw, "TokenPurchase")?;
            Ok(PoolEvent::TokenPurchase {
                buyer: word_to_address(buyer)?,
                eth_sold: word_to_amount(eth_sold)?,
                tokens_bought: word_to_amount(tokens_bought)?,
                tx_hash: raw.tx_hash.clone(),
            })
        }
        other => Err(DecodeError::UnknownTopic(other.to_string())),
    }
}

/// The three indexed parameter words of a liquidity/swap event.
fn indexed_words<'a>(raw: &'a RawEvent, kind: &'static str) -> Result<[&'a str; 3], DecodeError> {
    if raw.topics.len() != 4 {
        return Err(DecodeError::TopicCount {
            kind,
            expected: 4,
            got: raw.topics.len(),
        });
    }
    Ok([&raw.topics[1], &raw.topics[2], &raw.topics[3]])
}

/// The `index`-th 32-byte word of the data segment.
fn data_word(data: &str, index: usize) -> Result<&str, DecodeError> {
    let hex_part = data
        .strip_prefix("0x")
        .ok_or_else(|| DecodeError::ShortData(data.to_string()))?;
    let start = index * 64;
    hex_part
        .get(start..start + 64)
        .ok_or_else(|| DecodeError::ShortData(data.to_string()))
}

fn word_bytes(word: &str) -> Result<[u8; 32], DecodeError> {
    let hex_part = word.strip_prefix("0x").unwrap_or(word);
    let bytes = hex::decode(hex_part).map_err(|_| DecodeError::BadWord(word.to_string()))?;
    <[u8; 32]>::try_from(bytes).map_err(|_| DecodeError::BadWord(word.to_string()))
}

/// Address from the low 20 bytes of a word; high bytes must be zero.
fn word_to_address(word: &str) -> Result<Address, DecodeError> {
    let bytes = word_bytes(word)?;
    if bytes[..12].iter().any(|b| *b != 0) {
        return Err(DecodeError::BadWord(word.to_string()));
    }
    Address::parse(&format!("0x{}", hex::encode(&bytes[12..])))
        .map_err(|_| DecodeError::BadWord(word.to_string()))
}

/// Unsigned amount from a word, into exact decimal.
fn word_to_amount(word: &str) -> Result<Decimal, DecodeError> {
    let bytes = word_bytes(word)?;
    // u128 covers the low 16 bytes; anything above is out of range for the
    // decimal mantissa anyway.
    if bytes[..16].iter().any(|b| *b != 0) {
        return Err(DecodeError::AmountOverflow(word.to_string()));
    }
    let low: [u8; 16] = bytes[16..]
        .try_into()
        .map_err(|_| DecodeError::BadWord(word.to_string()))?;
    let value = u128::from_be_bytes(low);
    Decimal::from_raw_amount(value).map_err(|_| DecodeError::AmountOverflow(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TxHash;

    fn amount_word(v: u128) -> String {
        format!("0x{:064x}", v)
    }

    fn address_word(addr: &str) -> String {
        format!("0x{:0>64}", addr.trim_start_matches("0x"))
    }

    fn raw(topics: Vec<String>, data: &str) -> RawEvent {
        RawEvent {
            topics,
            data: data.to_string(),
            tx_hash: TxHash::new("0xabc".to_string()),
            block_number: 1_800_000,
        }
    }

    const PROVIDER: &str = "0x89827f7bb951fd8a56f8ef13c5bfee38522f2e1f";

    #[test]
    fn test_decode_add_liquidity() {
        let event = decode_event(&raw(
            vec![
                ADD_LIQUIDITY_TOPIC.to_string(),
                address_word(PROVIDER),
                amount_word(100_000_000_000_000_000_000),
                amount_word(50_000_000_000_000_000_000),
            ],
            "0x",
        ))
        .unwrap();

        match event {
            PoolEvent::AddLiquidity {
                provider,
                eth_amount,
                token_amount,
                ..
            } => {
                assert_eq!(provider, Address::parse(PROVIDER).unwrap());
                assert_eq!(
                    eth_amount,
                    Decimal::from_raw_amount(100_000_000_000_000_000_000).unwrap()
                );
                assert_eq!(
                    token_amount,
                    Decimal::from_raw_amount(50_000_000_000_000_000_000).unwrap()
                );
            }
            other => panic!("expected AddLiquidity, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_transfer_value_from_data() {
        let event = decode_event(&raw(
            vec![
                TRANSFER_TOPIC.to_string(),
                address_word("0x0000000000000000000000000000000000000000"),
                address_word(PROVIDER),
            ],
            &amount_word(10_000_000_000_000_000_000),
        ))
        .unwrap();

        match event {
            PoolEvent::Transfer {
                from, to, value, ..
            } => {
                assert!(from.is_zero());
                assert_eq!(to, Address::parse(PROVIDER).unwrap());
                assert_eq!(
                    value,
                    Decimal::from_raw_amount(10_000_000_000_000_000_000).unwrap()
                );
            }
            other => panic!("expected Transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_eth_purchase() {
        let event = decode_event(&raw(
            vec![
                ETH_PURCHASE_TOPIC.to_string(),
                address_word(PROVIDER),
                amount_word(5_000_000_000_000_000_000),
                amount_word(2_000_000_000_000_000_000),
            ],
            "0x",
        ))
        .unwrap();
        assert_eq!(event.kind(), "EthPurchase");
    }

    #[test]
    fn test_unknown_topic_is_an_error() {
        let result = decode_event(&raw(
            vec![format!("0x{}", "ee".repeat(32))],
            "0x",
        ));
        assert!(matches!(result, Err(DecodeError::UnknownTopic(_))));
    }

    #[test]
    fn test_transfer_missing_data_is_an_error() {
        let result = decode_event(&raw(
            vec![
                TRANSFER_TOPIC.to_string(),
                address_word(PROVIDER),
                address_word("0x0000000000000000000000000000000000000000"),
            ],
            "0x",
        ));
        assert!(matches!(result, Err(DecodeError::ShortData(_))));
    }

    #[test]
    fn test_wrong_topic_count_is_an_error() {
        let result = decode_event(&raw(vec![ADD_LIQUIDITY_TOPIC.to_string()], "0x"));
        assert!(matches!(result, Err(DecodeError::TopicCount { .. })));
    }
}
