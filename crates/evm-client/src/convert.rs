//! Conversions between ledger integers and JSON-RPC types

use ethers::types::{Address as EthAddress, H256, U256};
use num_bigint::{BigInt, Sign};
use vertex_core::{Address, LedgerError, TxHash, Wei};

pub fn wei_from_u256(value: U256) -> Wei {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigInt::from_bytes_be(Sign::Plus, &bytes)
}

/// Negative values and values wider than 256 bits are rejected.
pub fn u256_from_wei(value: &Wei) -> Result<U256, LedgerError> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(LedgerError::AmountOutOfRange {
            value: value.to_string(),
        });
    }
    Ok(U256::from_big_endian(&bytes))
}

pub fn eth_address(address: &Address) -> Result<EthAddress, LedgerError> {
    address
        .as_str()
        .parse::<EthAddress>()
        .map_err(|_| LedgerError::InvalidAddress {
            address: address.to_string(),
        })
}

pub fn tx_hash_from_h256(hash: H256) -> TxHash {
    TxHash::new(format!("{:?}", hash))
}

pub fn h256_from_tx_hash(hash: &TxHash) -> Result<H256, LedgerError> {
    hash.as_str()
        .parse::<H256>()
        .map_err(|e| LedgerError::InvalidResponse(format!("bad transaction hash {}: {}", hash, e)))
}
