use serde::{Deserialize, Serialize};
use tracing::debug;
use txforge_common::crypto::ed25519;
use txforge_common::traits::{BaseKeyPair, BaseTransaction};
use txforge_common::types::{BaseKey, TransactionType};
use txforge_common::utils::{decode_hex, decode_hex_fixed, to_0x_hex};
use txforge_common::TxError;

use crate::address::{ss58_encode, AccountId};
use crate::codec::{
    blake2_256, decode_method, decode_raw, resolve_call, Method, MethodName, Payee, ProxyType, RawExtrinsic,
    SignedExtrinsic, SigningPayload,
};
use crate::keypair::KeyPair;
use crate::network::NetworkConfig;

/// Structured summary of a relay chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub genesis_hash: String,
    pub nonce: u64,
    pub spec_version: u32,
    pub spec_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era_period: Option<u64>,
    pub chain_name: String,
    pub tip: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_type: Option<ProxyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_proxy_type: Option<ProxyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
}

/// Transaction wrapper. Empty until a builder sets the signing payload; signing caches
/// the signed extrinsic, which then takes precedence for broadcast.
#[derive(Debug, Clone)]
pub struct Transaction {
    network: NetworkConfig,
    payload: Option<SigningPayload>,
    signed: Option<SignedExtrinsic>,
    transaction_type: Option<TransactionType>,
    sender: Option<AccountId>,
    block_number: Option<u64>,
}

impl Transaction {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            payload: None,
            signed: None,
            transaction_type: None,
            sender: None,
            block_number: None,
        }
    }

    /// Rebuilds a transaction from its broadcast hex, keeping the exact wire bytes.
    pub fn from_raw(raw: &str, network: NetworkConfig) -> Result<Self, TxError> {
        let bytes = decode_hex(raw).map_err(|e| TxError::invalid_tx(format!("Invalid raw transaction: {}", e)))?;
        let decoded = decode_raw(&bytes)?;
        let method = decode_method(decoded.method(), &network.pallets)?;

        let mut tx = Transaction::new(network);
        tx.set_transaction_type(transaction_type_of(method.name()));
        match decoded {
            RawExtrinsic::Payload(payload) => tx.payload = Some(payload),
            RawExtrinsic::Signed(signed) => {
                tx.sender = Some(signed.signer);
                tx.signed = Some(signed);
            }
        }
        Ok(tx)
    }

    pub fn set_payload(&mut self, payload: SigningPayload) {
        self.payload = Some(payload);
        self.signed = None;
    }

    pub fn set_transaction_type(&mut self, transaction_type: TransactionType) {
        self.transaction_type = Some(transaction_type);
    }

    pub fn set_sender(&mut self, sender: AccountId) {
        self.sender = Some(sender);
    }

    pub fn set_block_number(&mut self, block_number: u64) {
        self.block_number = Some(block_number);
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn payload(&self) -> Option<&SigningPayload> {
        self.payload.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signed.is_some()
    }

    /// Signs the payload with `key_pair` and caches the signed extrinsic.
    ///
    /// Re-signing replaces the cache; the same key always yields the same bytes.
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<(), TxError> {
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| TxError::signing("No transaction data to sign"))?;
        let signing_key = key_pair
            .signing_key()
            .ok_or_else(|| TxError::signing("Missing private key"))?;

        let signature = ed25519::sign_message(signing_key, &payload.signable_bytes());
        self.signed = Some(SignedExtrinsic {
            signer: *key_pair.public_key(),
            signature,
            era: payload.era,
            nonce: payload.nonce,
            tip: payload.tip,
            method: payload.method.clone(),
        });
        debug!(signer = %key_pair.address(), "signed relay chain transaction");
        Ok(())
    }

    /// Checks the cached signature against the unsigned payload.
    pub fn verify_signature(&self) -> bool {
        match (&self.payload, &self.signed) {
            (Some(payload), Some(signed)) => {
                ed25519::verify_signature(&signed.signer, &payload.signable_bytes(), &signed.signature)
            }
            _ => false,
        }
    }

    /// Hex of the call, used to wrap this transaction's call in a proxy.
    pub fn method_hex(&self) -> Result<String, TxError> {
        self.method_bytes()
            .map(to_0x_hex)
            .ok_or_else(|| TxError::invalid_tx("Empty transaction"))
    }

    /// Size of the broadcast bytes.
    pub fn transaction_size(&self) -> Result<usize, TxError> {
        Ok(self.to_broadcast_format()?.trim_start_matches("0x").len() / 2)
    }

    fn method_bytes(&self) -> Option<&[u8]> {
        self.payload
            .as_ref()
            .map(|p| p.method.as_slice())
            .or_else(|| self.signed.as_ref().map(|s| s.method.as_slice()))
    }

    fn encode_address(&self, account: &AccountId) -> Result<String, TxError> {
        Ok(ss58_encode(account, self.network.ss58_format)?)
    }

    fn apply_method(&self, data: &mut TxData, method: &Method) -> Result<(), TxError> {
        match method {
            Method::TransferKeepAlive { dest, value } => {
                data.to = Some(self.encode_address(dest)?);
                data.amount = Some(value.to_string());
            }
            Method::Bond {
                controller,
                value,
                payee,
            } => {
                data.controller = Some(self.encode_address(controller)?);
                data.amount = Some(value.to_string());
                data.payee = Some(match payee {
                    Payee::Staked => "Staked".to_string(),
                    Payee::Stash => "Stash".to_string(),
                    Payee::Controller => "Controller".to_string(),
                    Payee::Account(account) => self.encode_address(account)?,
                });
            }
            Method::Unbond { value } => {
                data.amount = Some(value.to_string());
            }
            Method::AddProxy {
                delegate,
                proxy_type,
                delay,
            } => {
                data.owner = Some(self.encode_address(delegate)?);
                data.proxy_type = Some(*proxy_type);
                data.delay = Some(*delay);
            }
            Method::Proxy {
                real,
                force_proxy_type,
                call,
            } => {
                data.real = Some(self.encode_address(real)?);
                data.force_proxy_type = *force_proxy_type;
                data.call = Some(to_0x_hex(call));
                let inner = resolve_call(method, &self.network.pallets)?;
                self.apply_method(data, &inner)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn transaction_type_of(name: MethodName) -> TransactionType {
    match name {
        MethodName::TransferKeepAlive | MethodName::Proxy => TransactionType::Send,
        MethodName::Bond => TransactionType::StakingActivate,
        MethodName::Unbond => TransactionType::StakingUnlock,
        MethodName::AddProxy => TransactionType::WalletInitialization,
    }
}

impl BaseTransaction for Transaction {
    type Data = TxData;

    /// Extrinsic hash of the signed transaction.
    fn id(&self) -> Option<String> {
        self.signed.as_ref().map(|s| to_0x_hex(&blake2_256(&s.encode())))
    }

    fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    fn can_sign(&self, key: &BaseKey) -> bool {
        match (KeyPair::from_private_key(&key.key), &self.sender) {
            (Ok(key_pair), Some(sender)) => key_pair.public_key() == sender,
            _ => false,
        }
    }

    fn to_broadcast_format(&self) -> Result<String, TxError> {
        if let Some(signed) = &self.signed {
            return Ok(to_0x_hex(&signed.encode()));
        }
        self.payload
            .as_ref()
            .map(|payload| to_0x_hex(&payload.encode()))
            .ok_or_else(|| TxError::invalid_tx("Empty transaction"))
    }

    fn to_json(&self) -> Result<TxData, TxError> {
        let method_bytes = self
            .method_bytes()
            .ok_or_else(|| TxError::invalid_tx("Empty transaction"))?;
        let method = decode_method(method_bytes, &self.network.pallets)?;

        let (era, nonce, tip) = match (&self.payload, &self.signed) {
            (Some(p), _) => (p.era, p.nonce, p.tip),
            (None, Some(s)) => (s.era, s.nonce, s.tip),
            (None, None) => return Err(TxError::invalid_tx("Empty transaction")),
        };
        let sender = match self.signed.as_ref().map(|s| s.signer).or(self.sender) {
            Some(account) => Some(self.encode_address(&account)?),
            None => None,
        };
        let genesis_hash = match &self.payload {
            Some(p) => to_0x_hex(&p.genesis_hash),
            None => self.network.genesis_hash.clone(),
        };

        let mut data = TxData {
            id: self.id(),
            sender,
            block_hash: self.payload.as_ref().map(|p| to_0x_hex(&p.block_hash)),
            block_number: self.block_number,
            genesis_hash,
            nonce,
            spec_version: self
                .payload
                .as_ref()
                .map(|p| p.spec_version)
                .unwrap_or(self.network.spec_version),
            spec_name: self.network.spec_name.clone(),
            transaction_version: self.payload.as_ref().map(|p| p.transaction_version),
            era_period: era.period(),
            chain_name: self.network.chain_name.clone(),
            tip,
            to: None,
            amount: None,
            controller: None,
            payee: None,
            owner: None,
            proxy_type: None,
            delay: None,
            real: None,
            force_proxy_type: None,
            call: None,
        };
        self.apply_method(&mut data, &method)?;
        Ok(data)
    }

    fn signature(&self) -> Vec<String> {
        self.signed
            .iter()
            .map(|s| to_0x_hex(&s.signature))
            .collect()
    }
}

/// Parses a 32-byte `0x` hash.
pub(crate) fn parse_hash(value: &str) -> Option<[u8; 32]> {
    value.starts_with("0x").then(|| decode_hex_fixed::<32>(value)).flatten()
}
