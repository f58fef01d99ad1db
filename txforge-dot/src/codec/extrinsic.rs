use parity_scale_codec::{Decode, Encode};

use super::{blake2_256, decode_compact, encode_compact, ensure_consumed, read_array, CodecError, Era};
use crate::address::AccountId;

/// Extrinsic format version 4 with the signed bit set.
pub const SIGNED_EXTRINSIC_VERSION: u8 = 0x84;
const MULTI_ADDRESS_ID: u8 = 0x00;
const ED25519_SIGNATURE: u8 = 0x00;
const MAX_UNHASHED_PAYLOAD: usize = 256;

/// Everything that gets signed. Its encoding (call length-prefixed) is also the
/// broadcast format for an unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    pub method: Vec<u8>,
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: [u8; 32],
    pub block_hash: [u8; 32],
}

impl SigningPayload {
    fn encode_extra_and_additional(&self, out: &mut Vec<u8>) {
        self.era.encode_to(out);
        encode_compact(self.nonce, out);
        encode_compact(self.tip, out);
        self.spec_version.encode_to(out);
        self.transaction_version.encode_to(out);
        out.extend_from_slice(&self.genesis_hash);
        out.extend_from_slice(&self.block_hash);
    }

    /// Wire form: `Compact(len(call)) ++ call ++ extra ++ additional`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.method.len() + 90);
        self.method.encode_to(&mut out);
        self.encode_extra_and_additional(&mut out);
        out
    }

    /// Bytes the signer commits to. Payloads over 256 bytes are replaced by their blake2-256 hash.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.method.len() + 90);
        out.extend_from_slice(&self.method);
        self.encode_extra_and_additional(&mut out);
        if out.len() > MAX_UNHASHED_PAYLOAD {
            blake2_256(&out).to_vec()
        } else {
            out
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = bytes;
        let method = Vec::<u8>::decode(&mut input)?;
        let era = Era::decode(&mut input)?;
        let nonce = decode_compact::<u64>(&mut input)?;
        let tip = decode_compact::<u128>(&mut input)?;
        let spec_version = u32::decode(&mut input)?;
        let transaction_version = u32::decode(&mut input)?;
        let genesis_hash = read_array::<32>(&mut input)?;
        let block_hash = read_array::<32>(&mut input)?;
        ensure_consumed(input)?;

        Ok(Self {
            method,
            era,
            nonce,
            tip,
            spec_version,
            transaction_version,
            genesis_hash,
            block_hash,
        })
    }
}

/// A v4 extrinsic carrying an ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtrinsic {
    pub signer: AccountId,
    pub signature: [u8; 64],
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub method: Vec<u8>,
}

impl SignedExtrinsic {
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.method.len() + 110);
        body.push(SIGNED_EXTRINSIC_VERSION);
        body.push(MULTI_ADDRESS_ID);
        body.extend_from_slice(&self.signer);
        body.push(ED25519_SIGNATURE);
        body.extend_from_slice(&self.signature);
        self.era.encode_to(&mut body);
        encode_compact(self.nonce, &mut body);
        encode_compact(self.tip, &mut body);
        body.extend_from_slice(&self.method);

        let mut out = Vec::with_capacity(body.len() + 4);
        body.encode_to(&mut out);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = bytes;
        let body = Vec::<u8>::decode(&mut input)?;
        ensure_consumed(input)?;
        Self::decode_body(&body)
    }

    fn decode_body(body: &[u8]) -> Result<Self, CodecError> {
        let mut input = body;
        let [version, address_kind] = read_array::<2>(&mut input)?;
        if version != SIGNED_EXTRINSIC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        if address_kind != MULTI_ADDRESS_ID {
            return Err(CodecError::Scale(format!("Unsupported address kind: {}", address_kind)));
        }
        let signer = read_array::<32>(&mut input)?;
        let [signature_kind] = read_array::<1>(&mut input)?;
        if signature_kind != ED25519_SIGNATURE {
            return Err(CodecError::UnsupportedSignature(signature_kind));
        }
        let signature = read_array::<64>(&mut input)?;
        let era = Era::decode(&mut input)?;
        let nonce = decode_compact::<u64>(&mut input)?;
        let tip = decode_compact::<u128>(&mut input)?;

        Ok(Self {
            signer,
            signature,
            era,
            nonce,
            tip,
            method: input.to_vec(),
        })
    }
}

/// A raw transaction in either of its two wire forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawExtrinsic {
    Payload(SigningPayload),
    Signed(SignedExtrinsic),
}

impl RawExtrinsic {
    pub fn method(&self) -> &[u8] {
        match self {
            RawExtrinsic::Payload(payload) => &payload.method,
            RawExtrinsic::Signed(signed) => &signed.method,
        }
    }

    pub fn era(&self) -> Era {
        match self {
            RawExtrinsic::Payload(payload) => payload.era,
            RawExtrinsic::Signed(signed) => signed.era,
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            RawExtrinsic::Payload(payload) => payload.nonce,
            RawExtrinsic::Signed(signed) => signed.nonce,
        }
    }

    pub fn tip(&self) -> u128 {
        match self {
            RawExtrinsic::Payload(payload) => payload.tip,
            RawExtrinsic::Signed(signed) => signed.tip,
        }
    }
}

/// Classifies and decodes raw bytes.
///
/// A signed extrinsic starts with a compact length equal to the remaining byte count
/// followed by the signed version byte. Anything else is read as a signing payload.
pub fn decode_raw(bytes: &[u8]) -> Result<RawExtrinsic, CodecError> {
    let mut input = bytes;
    if let Ok(len) = decode_compact::<u32>(&mut input) {
        if len as usize == input.len() && input.first() == Some(&SIGNED_EXTRINSIC_VERSION) {
            return SignedExtrinsic::decode_body(input).map(RawExtrinsic::Signed);
        }
    }
    SigningPayload::decode(bytes).map(RawExtrinsic::Payload)
}
