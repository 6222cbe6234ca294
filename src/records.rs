//! Owned-record bookkeeping
//!
//! The record list shown to the user contains only records whose owner
//! matches the connected address. Ownership is the only thing this crate
//! reads out of a record; everything else is opaque SDK data.

use crate::error::ProtectorError;
use crate::sdk::DataProtector;
use crate::types::ProtectedData;

/// Keep only records owned by `address`, matched case-insensitively
pub fn owned_by(records: Vec<ProtectedData>, address: &str) -> Vec<ProtectedData> {
    records
        .into_iter()
        .filter(|record| record.owner.eq_ignore_ascii_case(address))
        .collect()
}

/// Fetch the full record list from the SDK and filter it to `address`
pub async fn fetch_owned<S>(sdk: &S, address: &str) -> Result<Vec<ProtectedData>, ProtectorError>
where
    S: DataProtector + ?Sized,
{
    Ok(owned_by(sdk.protected_data().await?, address))
}

/// Shorten an address for display: 6-char head, 4-char tail
///
/// `0x07b9…3ef1` style labels for dataset selectors.
pub fn short_address(address: &str) -> String {
    match (
        address.get(..6),
        address.get(address.len().saturating_sub(4)..),
    ) {
        (Some(head), Some(tail)) if address.len() > 10 => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str) -> ProtectedData {
        ProtectedData {
            name: "data.json".to_string(),
            address: "0x1111111111111111111111111111111111111111".to_string(),
            owner: owner.to_string(),
            creation_timestamp: None,
            schema: None,
            multiaddr: None,
        }
    }

    #[test]
    fn test_filters_by_owner_case_insensitively() {
        let records = vec![
            record("0xAAaaAAaaAAaaAAaaAAaaAAaaAAaaAAaaAAaaAAaa"),
            record("0xBBbbBBbbBBbbBBbbBBbbBBbbBBbbBBbbBBbbBBbb"),
        ];
        let owned = owned_by(records, "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert_eq!(owned.len(), 1);
        assert!(owned[0].owner.starts_with("0xAA"));
    }

    #[test]
    fn test_no_records_for_other_owner() {
        let records = vec![record("0xAA")];
        assert!(owned_by(records, "0xCC").is_empty());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x3bc6A1DC39dD2ceC9eF87a811A80982D68107345"),
            "0x3bc6...7345"
        );
    }

    #[test]
    fn test_short_address_leaves_short_input_alone() {
        assert_eq!(short_address("0x1234"), "0x1234");
    }
}
