use super::{read_array, read_u8, shortvec, CodecError};
use crate::pubkey::Pubkey;

const MAX_ACCOUNTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A program call with fully expanded account metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction whose program and accounts are indices into the message's key list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// Legacy message: the bytes every signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

fn merge(metas: &mut Vec<AccountMeta>, meta: AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta),
    }
}

fn count(metas: &[AccountMeta], f: impl Fn(&AccountMeta) -> bool) -> u8 {
    metas.iter().filter(|m| f(m)).count() as u8
}

impl Message {
    /// Orders accounts fee payer first, then signer-writable, signer-readonly, writable and
    /// readonly, each group in first-seen order. Program ids are readonly non-signers.
    pub fn compile(instructions: &[Instruction], fee_payer: Pubkey, recent_blockhash: [u8; 32]) -> Result<Self, CodecError> {
        let mut metas = vec![AccountMeta::new(fee_payer, true)];
        for instruction in instructions {
            for meta in &instruction.accounts {
                merge(&mut metas, *meta);
            }
        }
        for instruction in instructions {
            merge(&mut metas, AccountMeta::new_readonly(instruction.program_id, false));
        }
        if metas.len() > MAX_ACCOUNTS {
            return Err(CodecError::TooManyAccounts(metas.len()));
        }
        metas[1..].sort_by_key(|m| (!m.is_signer, !m.is_writable));

        let header = MessageHeader {
            num_required_signatures: count(&metas, |m| m.is_signer),
            num_readonly_signed_accounts: count(&metas, |m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(&metas, |m| !m.is_signer && !m.is_writable),
        };
        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, CodecError> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or(CodecError::TooManyAccounts(account_keys.len()))
        };

        let instructions = instructions
            .iter()
            .map(|ix| -> Result<CompiledInstruction, CodecError> {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect::<Result<_, _>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    pub fn fee_payer(&self) -> Option<Pubkey> {
        if self.header.num_required_signatures == 0 {
            return None;
        }
        self.account_keys.first().copied()
    }

    /// Keys whose signatures the transaction must carry, in signature slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_required_signatures as usize
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let signers = self.header.num_required_signatures as usize;
        if index < signers {
            index < signers.saturating_sub(self.header.num_readonly_signed_accounts as usize)
        } else {
            index
                < self
                    .account_keys
                    .len()
                    .saturating_sub(self.header.num_readonly_unsigned_accounts as usize)
        }
    }

    /// Expands compiled instructions back into instructions with account metadata.
    pub fn decompile(&self) -> Result<Vec<Instruction>, CodecError> {
        let key = |index: u8| {
            self.account_keys
                .get(index as usize)
                .copied()
                .ok_or(CodecError::AccountIndex(index))
        };
        self.instructions
            .iter()
            .map(|ix| -> Result<Instruction, CodecError> {
                let accounts = ix
                    .accounts
                    .iter()
                    .map(|&i| -> Result<AccountMeta, CodecError> {
                        Ok(AccountMeta {
                            pubkey: key(i)?,
                            is_signer: self.is_signer(i as usize),
                            is_writable: self.is_writable(i as usize),
                        })
                    })
                    .collect::<Result<Vec<_>, CodecError>>()?;
                Ok(Instruction {
                    program_id: key(ix.program_id_index)?,
                    accounts,
                    data: ix.data.clone(),
                })
            })
            .collect()
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        let key_count = u16::try_from(self.account_keys.len()).map_err(|_| CodecError::InvalidLength)?;
        shortvec::encode_len(key_count, &mut out);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash);

        let ix_count = u16::try_from(self.instructions.len()).map_err(|_| CodecError::InvalidLength)?;
        shortvec::encode_len(ix_count, &mut out);
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            shortvec::encode_bytes(&ix.accounts, &mut out)?;
            shortvec::encode_bytes(&ix.data, &mut out)?;
        }
        Ok(out)
    }

    pub fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let header = MessageHeader {
            num_required_signatures: read_u8(input)?,
            num_readonly_signed_accounts: read_u8(input)?,
            num_readonly_unsigned_accounts: read_u8(input)?,
        };

        let key_count = shortvec::decode_len(input)? as usize;
        let mut account_keys = Vec::with_capacity(key_count.min(MAX_ACCOUNTS));
        for _ in 0..key_count {
            account_keys.push(Pubkey::new(read_array::<32>(input)?));
        }
        let recent_blockhash = read_array::<32>(input)?;

        let ix_count = shortvec::decode_len(input)? as usize;
        let mut instructions = Vec::with_capacity(ix_count.min(64));
        for _ in 0..ix_count {
            let program_id_index = read_u8(input)?;
            let accounts = shortvec::decode_bytes(input)?;
            let data = shortvec::decode_bytes(input)?;
            for &index in accounts.iter().chain(std::iter::once(&program_id_index)) {
                if index as usize >= account_keys.len() {
                    return Err(CodecError::AccountIndex(index));
                }
            }
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}
