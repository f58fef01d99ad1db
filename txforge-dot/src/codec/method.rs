use std::str::FromStr;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use txforge_common::TxError;

use super::{decode_compact, encode_compact, ensure_consumed, read_array, CodecError};
use crate::address::AccountId;
use crate::network::PalletIndices;

const TRANSFER_KEEP_ALIVE: u8 = 0x03;
const BOND: u8 = 0x00;
const UNBOND: u8 = 0x02;
const PROXY: u8 = 0x00;
const ADD_PROXY: u8 = 0x01;

/// Closed set of calls the builders produce and the factory recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodName {
    TransferKeepAlive,
    Bond,
    Unbond,
    AddProxy,
    Proxy,
}

impl MethodName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodName::TransferKeepAlive => "transferKeepAlive",
            MethodName::Bond => "bond",
            MethodName::Unbond => "unbond",
            MethodName::AddProxy => "addProxy",
            MethodName::Proxy => "proxy",
        }
    }
}

impl std::fmt::Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability scope granted to a proxy account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum ProxyType {
    Any,
    NonTransfer,
    Governance,
    Staking,
    UnusedSudoBalances,
    IdentityJudgement,
    CancelProxy,
}

impl ProxyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyType::Any => "Any",
            ProxyType::NonTransfer => "NonTransfer",
            ProxyType::Governance => "Governance",
            ProxyType::Staking => "Staking",
            ProxyType::UnusedSudoBalances => "UnusedSudoBalances",
            ProxyType::IdentityJudgement => "IdentityJudgement",
            ProxyType::CancelProxy => "CancelProxy",
        }
    }
}

impl FromStr for ProxyType {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Any" => Ok(ProxyType::Any),
            "NonTransfer" => Ok(ProxyType::NonTransfer),
            "Governance" => Ok(ProxyType::Governance),
            "Staking" => Ok(ProxyType::Staking),
            "UnusedSudoBalances" => Ok(ProxyType::UnusedSudoBalances),
            "IdentityJudgement" => Ok(ProxyType::IdentityJudgement),
            "CancelProxy" => Ok(ProxyType::CancelProxy),
            other => Err(TxError::build(format!("Invalid proxy type: {}", other))),
        }
    }
}

/// Where staking rewards are paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Payee {
    Staked,
    Stash,
    Controller,
    Account(AccountId),
}

#[derive(Encode, Decode)]
enum MultiAddress {
    Id(AccountId),
}

/// A decoded call with its arguments.
///
/// `Proxy::call` holds the wrapped call still encoded; see [`decode_inner_call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    TransferKeepAlive {
        dest: AccountId,
        value: u128,
    },
    Bond {
        controller: AccountId,
        value: u128,
        payee: Payee,
    },
    Unbond {
        value: u128,
    },
    AddProxy {
        delegate: AccountId,
        proxy_type: ProxyType,
        delay: u32,
    },
    Proxy {
        real: AccountId,
        force_proxy_type: Option<ProxyType>,
        call: Vec<u8>,
    },
}

impl Method {
    pub fn name(&self) -> MethodName {
        match self {
            Method::TransferKeepAlive { .. } => MethodName::TransferKeepAlive,
            Method::Bond { .. } => MethodName::Bond,
            Method::Unbond { .. } => MethodName::Unbond,
            Method::AddProxy { .. } => MethodName::AddProxy,
            Method::Proxy { .. } => MethodName::Proxy,
        }
    }

    /// SCALE encodes the call: `[pallet, call] ++ args`.
    pub fn encode(&self, pallets: &PalletIndices) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Method::TransferKeepAlive { dest, value } => {
                out.extend_from_slice(&[pallets.balances, TRANSFER_KEEP_ALIVE]);
                MultiAddress::Id(*dest).encode_to(&mut out);
                encode_compact(*value, &mut out);
            }
            Method::Bond {
                controller,
                value,
                payee,
            } => {
                out.extend_from_slice(&[pallets.staking, BOND]);
                MultiAddress::Id(*controller).encode_to(&mut out);
                encode_compact(*value, &mut out);
                payee.encode_to(&mut out);
            }
            Method::Unbond { value } => {
                out.extend_from_slice(&[pallets.staking, UNBOND]);
                encode_compact(*value, &mut out);
            }
            Method::AddProxy {
                delegate,
                proxy_type,
                delay,
            } => {
                out.extend_from_slice(&[pallets.proxy, ADD_PROXY]);
                out.extend_from_slice(delegate);
                proxy_type.encode_to(&mut out);
                delay.encode_to(&mut out);
            }
            Method::Proxy {
                real,
                force_proxy_type,
                call,
            } => {
                out.extend_from_slice(&[pallets.proxy, PROXY]);
                out.extend_from_slice(real);
                force_proxy_type.encode_to(&mut out);
                out.extend_from_slice(call);
            }
        }
        out
    }
}

/// First decode stage: reads exactly one call from `bytes`.
///
/// A proxy call is returned with its wrapped call left as opaque bytes.
pub fn decode_method(bytes: &[u8], pallets: &PalletIndices) -> Result<Method, CodecError> {
    let mut input = bytes;
    let [pallet, call] = read_array::<2>(&mut input)?;

    let method = match (pallet, call) {
        (p, TRANSFER_KEEP_ALIVE) if p == pallets.balances => {
            let MultiAddress::Id(dest) = MultiAddress::decode(&mut input)?;
            let value = decode_compact::<u128>(&mut input)?;
            Method::TransferKeepAlive { dest, value }
        }
        (p, BOND) if p == pallets.staking => {
            let MultiAddress::Id(controller) = MultiAddress::decode(&mut input)?;
            let value = decode_compact::<u128>(&mut input)?;
            let payee = Payee::decode(&mut input)?;
            Method::Bond {
                controller,
                value,
                payee,
            }
        }
        (p, UNBOND) if p == pallets.staking => Method::Unbond {
            value: decode_compact::<u128>(&mut input)?,
        },
        (p, ADD_PROXY) if p == pallets.proxy => {
            let delegate = read_array::<32>(&mut input)?;
            let proxy_type = ProxyType::decode(&mut input)?;
            let delay = u32::decode(&mut input)?;
            Method::AddProxy {
                delegate,
                proxy_type,
                delay,
            }
        }
        (p, PROXY) if p == pallets.proxy => {
            let real = read_array::<32>(&mut input)?;
            let force_proxy_type = Option::<ProxyType>::decode(&mut input)?;
            let call = std::mem::take(&mut input).to_vec();
            Method::Proxy {
                real,
                force_proxy_type,
                call,
            }
        }
        (pallet, call) => return Err(CodecError::UnknownCall { pallet, call }),
    };

    ensure_consumed(input)?;
    Ok(method)
}

/// Second decode stage: decodes the call wrapped by a proxy.
///
/// Returns `None` for anything that is not a proxy call. The result may itself be a
/// proxy call; use [`resolve_call`] to unwrap every level.
pub fn decode_inner_call(method: &Method, pallets: &PalletIndices) -> Result<Option<Method>, CodecError> {
    match method {
        Method::Proxy { call, .. } => decode_method(call, pallets).map(Some),
        _ => Ok(None),
    }
}

/// Follows nested proxy calls down to the call that is actually dispatched.
pub fn resolve_call(method: &Method, pallets: &PalletIndices) -> Result<Method, CodecError> {
    let mut current = method.clone();
    while let Some(inner) = decode_inner_call(&current, pallets)? {
        current = inner;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use txforge_common::utils::decode_hex_fixed;

    const ACCOUNT2_PUB: &str = "9f7b0675db59d19b4bd9c8c72eaabba75a9863d02b30115b8b3c3ca5c20f0254";

    fn account2() -> AccountId {
        decode_hex_fixed::<32>(ACCOUNT2_PUB).unwrap()
    }

    fn pallets() -> PalletIndices {
        PalletIndices::POLKADOT
    }

    #[test]
    fn test_transfer_call_matches_known_bytes() {
        let method = Method::TransferKeepAlive {
            dest: account2(),
            value: 1_000_000_000_000,
        };
        let encoded = method.encode(&pallets());
        assert_eq!(hex::encode(&encoded), format!("050300{}070010a5d4e8", ACCOUNT2_PUB));
        assert_eq!(decode_method(&encoded, &pallets()).unwrap(), method);
    }

    #[test]
    fn test_bond_call_with_account_payee() {
        let method = Method::Bond {
            controller: account2(),
            value: 50_000_000_000_000,
            payee: Payee::Account(account2()),
        };
        let encoded = method.encode(&pallets());
        assert_eq!(
            hex::encode(&encoded),
            format!("070000{}0b00203d88792d03{}", ACCOUNT2_PUB, ACCOUNT2_PUB)
        );
    }

    #[test]
    fn test_unbond_call() {
        let encoded = Method::Unbond { value: 50_000_000_000_000 }.encode(&pallets());
        assert_eq!(hex::encode(&encoded), "07020b00203d88792d");
    }

    #[test]
    fn test_add_proxy_call() {
        let method = Method::AddProxy {
            delegate: account2(),
            proxy_type: ProxyType::Staking,
            delay: 15,
        };
        let encoded = method.encode(&pallets());
        assert_eq!(hex::encode(&encoded), format!("1d01{}030f000000", ACCOUNT2_PUB));
        assert_eq!(decode_method(&encoded, &pallets()).unwrap(), method);
    }

    #[test]
    fn test_proxy_decode_is_two_stage() {
        let inner = Method::TransferKeepAlive {
            dest: account2(),
            value: 42,
        };
        let outer = Method::Proxy {
            real: account2(),
            force_proxy_type: Some(ProxyType::Any),
            call: inner.encode(&pallets()),
        };
        let encoded = outer.encode(&pallets());

        let decoded = decode_method(&encoded, &pallets()).unwrap();
        assert_eq!(decoded, outer);
        assert_eq!(decode_inner_call(&decoded, &pallets()).unwrap(), Some(inner.clone()));
        assert_eq!(decode_inner_call(&inner, &pallets()).unwrap(), None);
    }

    #[test]
    fn test_nested_proxy_resolves_to_innermost_call() {
        let innermost = Method::Unbond { value: 7 };
        let middle = Method::Proxy {
            real: account2(),
            force_proxy_type: None,
            call: innermost.encode(&pallets()),
        };
        let outer = Method::Proxy {
            real: account2(),
            force_proxy_type: Some(ProxyType::Staking),
            call: middle.encode(&pallets()),
        };
        assert_eq!(resolve_call(&outer, &pallets()).unwrap(), innermost);
    }

    #[test]
    fn test_unknown_call_and_trailing_bytes() {
        assert_eq!(
            decode_method(&[0x63, 0x01], &pallets()),
            Err(CodecError::UnknownCall { pallet: 0x63, call: 0x01 })
        );
        let mut encoded = Method::Unbond { value: 1 }.encode(&pallets());
        encoded.push(0xff);
        assert_eq!(decode_method(&encoded, &pallets()), Err(CodecError::TrailingBytes(1)));
    }

    #[test]
    fn test_westend_indices_differ() {
        let encoded = Method::Unbond { value: 1 }.encode(&PalletIndices::WESTEND);
        assert_eq!(encoded[0], 0x06);
        assert!(decode_method(&encoded, &pallets()).is_err());
    }

    #[test]
    fn test_proxy_type_from_str() {
        assert_eq!("Staking".parse::<ProxyType>().unwrap(), ProxyType::Staking);
        assert_eq!(
            "Root".parse::<ProxyType>().unwrap_err().to_string(),
            "Invalid proxy type: Root"
        );
    }
}
