//! Calldata for the minimal ERC-20 surface the storefront touches.

use alloy_primitives::{Address, U256, hex};
use std::str::FromStr;

use crate::ChainError;

pub const TRANSFER_SELECTOR: &str = "a9059cbb";
pub const BALANCE_OF_SELECTOR: &str = "70a08231";
pub const DECIMALS_SELECTOR: &str = "313ce567";
pub const APPROVE_SELECTOR: &str = "095ea7b3";
pub const ALLOWANCE_SELECTOR: &str = "dd62ed3e";

pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim()).map_err(|_| ChainError::InvalidAddress(raw.to_owned()))
}

fn address_word(address: &Address) -> String {
    format!("{:0>64}", hex::encode(address.as_slice()))
}

fn uint_word(value: U256) -> String {
    hex::encode(value.to_be_bytes::<32>())
}

pub fn balance_of(owner: &Address) -> String {
    format!("0x{BALANCE_OF_SELECTOR}{}", address_word(owner))
}

pub fn decimals() -> String {
    format!("0x{DECIMALS_SELECTOR}")
}

pub fn transfer(to: &Address, amount: U256) -> String {
    format!("0x{TRANSFER_SELECTOR}{}{}", address_word(to), uint_word(amount))
}

pub fn approve(spender: &Address, amount: U256) -> String {
    format!("0x{APPROVE_SELECTOR}{}{}", address_word(spender), uint_word(amount))
}

pub fn allowance(owner: &Address, spender: &Address) -> String {
    format!("0x{ALLOWANCE_SELECTOR}{}{}", address_word(owner), address_word(spender))
}

/// Decodes a single `uint256` return word from `eth_call`.
pub fn decode_uint(raw: &str) -> Result<U256, ChainError> {
    let hex = raw.trim().trim_start_matches("0x");
    if hex.is_empty() {
        return Err(ChainError::InvalidResponse("empty eth_call result".to_owned()));
    }
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidResponse(format!("non-hex eth_call result '{raw}'")));
    }
    let word = hex.get(..64).unwrap_or(hex);
    U256::from_str_radix(word, 16)
        .map_err(|err| ChainError::InvalidResponse(format!("bad uint word '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDER: &str = "0x1A077De405DfD0e0F4fAf447b4a8129c3fE9A3D0";

    #[test]
    fn balance_of_pads_address() {
        let data = balance_of(&parse_address(HOLDER).unwrap());
        assert_eq!(
            data,
            "0x70a082310000000000000000000000001a077de405dfd0e0f4faf447b4a8129c3fe9a3d0"
        );
    }

    #[test]
    fn transfer_encodes_recipient_then_amount() {
        let data = transfer(&parse_address(HOLDER).unwrap(), U256::from(1_000u64));
        assert_eq!(data.len(), 2 + 8 + 64 + 64);
        assert!(data.starts_with("0xa9059cbb000000000000000000000000"));
        assert!(data.ends_with("00000000000000000000000000000000000000000000000000000000000003e8"));
    }

    #[test]
    fn allowance_and_approve_share_word_layout() {
        let owner = parse_address(HOLDER).unwrap();
        assert_eq!(allowance(&owner, &owner).len(), 2 + 8 + 128);
        assert!(approve(&owner, U256::ZERO).starts_with("0x095ea7b3"));
    }

    #[test]
    fn decodes_return_words() {
        assert_eq!(
            decode_uint("0x0000000000000000000000000000000000000000000000000000000000000012").unwrap(),
            U256::from(18u64)
        );
        assert!(matches!(decode_uint("0x"), Err(ChainError::InvalidResponse(_))));
    }

    #[test]
    fn non_hex_words_are_invalid_responses() {
        let garbled = format!("0x{}é{}", "0".repeat(63), "0".repeat(10));
        assert!(matches!(decode_uint(&garbled), Err(ChainError::InvalidResponse(_))));
        assert!(matches!(decode_uint("0xzz"), Err(ChainError::InvalidResponse(_))));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(matches!(parse_address("0x3A2...fE1"), Err(ChainError::InvalidAddress(_))));
    }
}
