use super::{read_array, shortvec, CodecError, Message};
use crate::constants::SIGNATURE_LENGTH;
use crate::pubkey::Pubkey;

pub type Signature = [u8; SIGNATURE_LENGTH];

pub const EMPTY_SIGNATURE: Signature = [0; SIGNATURE_LENGTH];

/// Signatures plus message: `shortvec(signatures) ++ signatures ++ message`.
///
/// There is one signature slot per required signer; unsigned slots are all zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTransaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl WireTransaction {
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![EMPTY_SIGNATURE; slots],
            message,
        }
    }

    /// Slot index reserved for `signer`, if it is a required signer.
    pub fn signer_index(&self, signer: &Pubkey) -> Option<usize> {
        self.message.signer_keys().iter().position(|k| k == signer)
    }

    pub fn set_signature(&mut self, index: usize, signature: Signature) {
        if let Some(slot) = self.signatures.get_mut(index) {
            *slot = signature;
        }
    }

    /// Signatures that have been filled in.
    pub fn present_signatures(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter().filter(|s| **s != EMPTY_SIGNATURE)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let message = self.message.encode()?;
        let count = u16::try_from(self.signatures.len()).map_err(|_| CodecError::InvalidLength)?;
        let mut out = Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LENGTH + message.len());
        shortvec::encode_len(count, &mut out);
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = bytes;
        let count = shortvec::decode_len(&mut input)? as usize;
        let mut signatures = Vec::with_capacity(count.min(16));
        for _ in 0..count {
            signatures.push(read_array::<SIGNATURE_LENGTH>(&mut input)?);
        }
        let message = Message::decode(&mut input)?;
        if !input.is_empty() {
            return Err(CodecError::TrailingBytes(input.len()));
        }

        let expected = message.header.num_required_signatures as usize;
        if signatures.len() != expected {
            return Err(CodecError::SignatureCount {
                expected,
                found: signatures.len(),
            });
        }
        Ok(Self { signatures, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{AccountMeta, Instruction};

    fn message() -> Message {
        let instructions = vec![Instruction {
            program_id: Pubkey::new([0; 32]),
            accounts: vec![AccountMeta::new(Pubkey::new([1; 32]), true), AccountMeta::new(Pubkey::new([2; 32]), false)],
            data: vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
        }];
        Message::compile(&instructions, Pubkey::new([1; 32]), [3; 32]).unwrap()
    }

    #[test]
    fn test_unsigned_has_zeroed_slots() {
        let tx = WireTransaction::new_unsigned(message());
        assert_eq!(tx.signatures, vec![EMPTY_SIGNATURE]);
        assert_eq!(tx.present_signatures().count(), 0);

        let bytes = tx.encode().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..65], &[0u8; 64][..]);
        assert_eq!(WireTransaction::decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn test_signature_slots() {
        let mut tx = WireTransaction::new_unsigned(message());
        assert_eq!(tx.signer_index(&Pubkey::new([1; 32])), Some(0));
        assert_eq!(tx.signer_index(&Pubkey::new([2; 32])), None);
        tx.set_signature(0, [9; 64]);
        assert_eq!(tx.present_signatures().count(), 1);
    }

    #[test]
    fn test_decode_rejects_mismatched_signature_count() {
        let tx = WireTransaction {
            signatures: vec![],
            message: message(),
        };
        let bytes = tx.encode().unwrap();
        assert_eq!(
            WireTransaction::decode(&bytes),
            Err(CodecError::SignatureCount { expected: 1, found: 0 })
        );

        let mut bytes = WireTransaction::new_unsigned(message()).encode().unwrap();
        bytes.push(0);
        assert_eq!(WireTransaction::decode(&bytes), Err(CodecError::TrailingBytes(1)));
    }
}
