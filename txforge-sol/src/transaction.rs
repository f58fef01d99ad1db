use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use txforge_common::address::base58;
use txforge_common::crypto::ed25519;
use txforge_common::traits::BaseTransaction;
use txforge_common::types::{BaseKey, TransactionType};
use txforge_common::utils::{decode_base64, encode_base64};
use txforge_common::TxError;

use crate::codec::{Instruction, WireTransaction};
use crate::instruction::{parse_instructions, transaction_type_of, InstructionParams};
use crate::keypair::KeyPair;

/// Summary returned by [`Transaction::to_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub fee_payer: Option<String>,
    pub nonce: String,
    pub fee_multiplier: usize,
    pub instructions_data: Vec<InstructionParams>,
}

/// A wire transaction plus the operation kind it was built or classified as.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    wire: Option<WireTransaction>,
    transaction_type: Option<TransactionType>,
    id: Option<String>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a base64 transaction and classifies it from its instructions.
    pub fn from_raw(raw: &str) -> Result<Self, TxError> {
        let bytes = decode_base64(raw).map_err(|_| TxError::parse("Invalid raw transaction"))?;
        let wire = WireTransaction::decode(&bytes)?;
        let transaction_type = transaction_type_of(&wire.message.decompile()?)?;
        debug!(kind = %transaction_type, signers = wire.signatures.len(), "decoded raw transaction");

        let mut tx = Self {
            wire: Some(wire),
            transaction_type: Some(transaction_type),
            id: None,
        };
        tx.refresh_id();
        Ok(tx)
    }

    pub(crate) fn set_wire(&mut self, wire: WireTransaction) {
        self.wire = Some(wire);
        self.refresh_id();
    }

    pub fn set_transaction_type(&mut self, transaction_type: TransactionType) {
        self.transaction_type = Some(transaction_type);
    }

    pub fn wire(&self) -> Option<&WireTransaction> {
        self.wire.as_ref()
    }

    fn wire_or_empty(&self) -> Result<&WireTransaction, TxError> {
        self.wire.as_ref().ok_or_else(|| TxError::parse("Empty transaction"))
    }

    /// Instructions with their account metadata restored.
    pub fn instructions(&self) -> Result<Vec<Instruction>, TxError> {
        Ok(self.wire_or_empty()?.message.decompile()?)
    }

    /// Recent blockhash, or the durable nonce value, as base58.
    pub fn nonce(&self) -> Option<String> {
        self.wire.as_ref().map(|wire| base58::encode(&wire.message.recent_blockhash))
    }

    pub fn fee_payer(&self) -> Option<String> {
        self.wire
            .as_ref()
            .and_then(|wire| wire.message.fee_payer())
            .map(|key| key.to_string())
    }

    /// Signs with every pair in `signers`, replacing any signature already held for the
    /// same key.
    pub fn sign(&mut self, signers: &[KeyPair]) -> Result<(), TxError> {
        let wire = self
            .wire
            .as_mut()
            .ok_or_else(|| TxError::signing("Nonce is required before signing"))?;
        if wire.message.fee_payer().is_none() {
            return Err(TxError::signing("feePayer is required before signing"));
        }

        let message = wire.message.encode()?;
        for signer in signers {
            let key = signer
                .signing_key()
                .ok_or_else(|| TxError::signing("Missing private key"))?;
            let index = wire
                .signer_index(&signer.pubkey())
                .ok_or_else(|| TxError::signing(format!("unknown signer: {}", signer.pubkey())))?;
            wire.set_signature(index, ed25519::sign_message(key, &message));
            debug!(signer = %signer.pubkey(), slot = index, "signature applied");
        }
        self.refresh_id();
        Ok(())
    }

    /// True when every filled signature slot verifies against its signer.
    pub fn verify_signatures(&self) -> bool {
        let Some(wire) = &self.wire else {
            return false;
        };
        let Ok(message) = wire.message.encode() else {
            return false;
        };
        wire.message
            .signer_keys()
            .iter()
            .zip(&wire.signatures)
            .filter(|(_, signature)| signature.iter().any(|b| *b != 0))
            .all(|(key, signature)| ed25519::verify_signature(key.as_bytes(), &message, signature))
    }

    fn refresh_id(&mut self) {
        self.id = self
            .wire
            .as_ref()
            .and_then(|wire| wire.signatures.first())
            .filter(|signature| signature.iter().any(|b| *b != 0))
            .map(|signature| base58::encode(signature));
    }

    pub fn transaction_size(&self) -> Result<usize, TxError> {
        Ok(self.wire_or_empty()?.encode()?.len())
    }
}

impl BaseTransaction for Transaction {
    type Data = TxData;

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    /// Signer membership is checked when signing.
    fn can_sign(&self, _key: &BaseKey) -> bool {
        true
    }

    fn to_broadcast_format(&self) -> Result<String, TxError> {
        let bytes = self.wire_or_empty()?.encode()?;
        info!("📦 Serialized transaction ({} bytes)", bytes.len());
        Ok(encode_base64(&bytes))
    }

    fn to_json(&self) -> Result<TxData, TxError> {
        let wire = self.wire_or_empty()?;
        let instructions = wire.message.decompile()?;
        let transaction_type = match self.transaction_type {
            Some(kind) => kind,
            None => transaction_type_of(&instructions)?,
        };

        Ok(TxData {
            id: self.id.clone(),
            fee_payer: self.fee_payer(),
            nonce: base58::encode(&wire.message.recent_blockhash),
            fee_multiplier: wire.present_signatures().count(),
            instructions_data: parse_instructions(transaction_type, &instructions)?,
        })
    }

    fn signature(&self) -> Vec<String> {
        self.wire
            .as_ref()
            .map(|wire| wire.present_signatures().map(|s| base58::encode(s)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Message;
    use crate::instruction::{build_instructions, TransferParams};
    use crate::pubkey::Pubkey;
    use txforge_common::traits::BaseKeyPair;

    fn signer(n: u8) -> KeyPair {
        KeyPair::from_seed(&[n; 32]).unwrap()
    }

    fn unsigned_transfer() -> Transaction {
        let from = signer(1);
        let params = InstructionParams::Transfer(TransferParams {
            from_address: from.address(),
            to_address: Pubkey::new([7; 32]).to_string(),
            amount: "300000".into(),
        });
        let instructions = build_instructions(&params).unwrap();
        let message = Message::compile(&instructions, from.pubkey(), [4; 32]).unwrap();
        let mut tx = Transaction::new();
        tx.set_wire(WireTransaction::new_unsigned(message));
        tx.set_transaction_type(TransactionType::Send);
        tx
    }

    #[test]
    fn test_empty_transaction() {
        let tx = Transaction::new();
        assert_eq!(tx.to_broadcast_format().unwrap_err(), TxError::parse("Empty transaction"));
        assert_eq!(tx.to_json().unwrap_err(), TxError::parse("Empty transaction"));
        assert!(tx.can_sign(&BaseKey::new("anything")));
        assert!(tx.signature().is_empty());

        let mut tx = Transaction::new();
        assert_eq!(
            tx.sign(&[signer(1)]).unwrap_err(),
            TxError::signing("Nonce is required before signing")
        );
    }

    #[test]
    fn test_sign_is_idempotent_and_sets_id() {
        let mut tx = unsigned_transfer();
        assert_eq!(tx.id(), None);
        assert_eq!(tx.to_json().unwrap().fee_multiplier, 0);

        tx.sign(&[signer(1)]).unwrap();
        let once = tx.to_broadcast_format().unwrap();
        tx.sign(&[signer(1)]).unwrap();
        assert_eq!(tx.to_broadcast_format().unwrap(), once);

        assert_eq!(tx.signature().len(), 1);
        assert_eq!(tx.id(), tx.signature().first().cloned());
        assert!(tx.verify_signatures());
        assert_eq!(tx.to_json().unwrap().fee_multiplier, 1);
    }

    #[test]
    fn test_unknown_signer_and_public_only_key() {
        let mut tx = unsigned_transfer();
        let stranger = signer(2);
        assert_eq!(
            tx.sign(&[stranger.clone()]).unwrap_err(),
            TxError::signing(format!("unknown signer: {}", stranger.address()))
        );

        let public_only = KeyPair::from_public_key(&signer(1).address()).unwrap();
        assert_eq!(tx.sign(&[public_only]).unwrap_err(), TxError::signing("Missing private key"));
    }

    #[test]
    fn test_raw_round_trip() {
        let mut tx = unsigned_transfer();
        tx.sign(&[signer(1)]).unwrap();
        let raw = tx.to_broadcast_format().unwrap();

        let parsed = Transaction::from_raw(&raw).unwrap();
        assert_eq!(parsed.to_broadcast_format().unwrap(), raw);
        assert_eq!(parsed.transaction_type(), Some(TransactionType::Send));
        assert_eq!(parsed.id(), tx.id());

        let json = parsed.to_json().unwrap();
        assert_eq!(json.fee_payer, Some(signer(1).address()));
        assert_eq!(json.nonce, base58::encode(&[4u8; 32]));
        assert_eq!(json.instructions_data, tx.to_json().unwrap().instructions_data);
    }

    #[test]
    fn test_from_raw_rejects_garbage() {
        assert_eq!(Transaction::from_raw("%%%").unwrap_err(), TxError::parse("Invalid raw transaction"));
        assert!(matches!(
            Transaction::from_raw("AAAA").unwrap_err(),
            TxError::ParseTransaction(_)
        ));
    }
}
