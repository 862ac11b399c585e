//! Transaction fixtures for classifier, extractor and pipeline tests

use crate::rpc::types::{
    AccountKey, InnerInstructionGroup, LoadedAddresses, ParsedInstruction, ParsedTransaction,
    TokenBalance, TransactionMeta, UiTokenAmount,
};

pub const WALLET_A: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
pub const WALLET_B: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
pub const COUNTERPARTY: &str = "HN7cABqLq46Es1jh92dQQisAq662SmxELLLsHHe4YWrH";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub struct TxBuilder {
    tx: ParsedTransaction,
}

impl TxBuilder {
    pub fn new() -> Self {
        let meta = TransactionMeta {
            pre_token_balances: Some(Vec::new()),
            post_token_balances: Some(Vec::new()),
            ..TransactionMeta::default()
        };
        Self {
            tx: ParsedTransaction {
                meta: Some(meta),
                ..ParsedTransaction::default()
            },
        }
    }

    fn meta(&mut self) -> &mut TransactionMeta {
        self.tx.meta.get_or_insert_with(TransactionMeta::default)
    }

    pub fn block_time(mut self, seconds: i64) -> Self {
        self.tx.block_time = Some(seconds);
        self
    }

    pub fn account_keys(mut self, keys: &[&str]) -> Self {
        self.tx.transaction.message.account_keys = keys
            .iter()
            .map(|k| AccountKey::Parsed {
                pubkey: k.to_string(),
                signer: false,
                writable: true,
                source: Some("transaction".to_string()),
            })
            .collect();
        self
    }

    pub fn instruction(mut self, program_id: &str) -> Self {
        self.tx.transaction.message.instructions.push(ParsedInstruction {
            program_id: Some(program_id.to_string()),
            accounts: Vec::new(),
            program: None,
        });
        self
    }

    pub fn loaded_writable(mut self, address: &str) -> Self {
        self.meta()
            .loaded_addresses
            .get_or_insert_with(LoadedAddresses::default)
            .writable
            .push(address.to_string());
        self
    }

    pub fn loaded_readonly(mut self, address: &str) -> Self {
        self.meta()
            .loaded_addresses
            .get_or_insert_with(LoadedAddresses::default)
            .readonly
            .push(address.to_string());
        self
    }

    pub fn inner_instruction(mut self, accounts: &[&str]) -> Self {
        let groups = self.meta().inner_instructions.get_or_insert_with(Vec::new);
        groups.push(InnerInstructionGroup {
            index: groups.len() as u32,
            instructions: vec![ParsedInstruction {
                program_id: Some("PERPHjGBqRHArX4DySjwM6UJHiR3sWAatqfdBS2qQJu".to_string()),
                accounts: accounts.iter().map(|a| a.to_string()).collect(),
                program: None,
            }],
        });
        self
    }

    pub fn pre_token(mut self, index: u32, mint: &str, owner: &str, amount: f64, decimals: u8) -> Self {
        let balance = token_balance(index, mint, owner, amount, decimals);
        self.meta().pre_token_balances.get_or_insert_with(Vec::new).push(balance);
        self
    }

    pub fn post_token(mut self, index: u32, mint: &str, owner: &str, amount: f64, decimals: u8) -> Self {
        let balance = token_balance(index, mint, owner, amount, decimals);
        self.meta().post_token_balances.get_or_insert_with(Vec::new).push(balance);
        self
    }

    pub fn without_token_balances(mut self) -> Self {
        let meta = self.meta();
        meta.pre_token_balances = None;
        meta.post_token_balances = None;
        self
    }

    pub fn native_balances(mut self, pre: &[u64], post: &[u64]) -> Self {
        let meta = self.meta();
        meta.pre_balances = pre.to_vec();
        meta.post_balances = post.to_vec();
        self
    }

    pub fn fee(mut self, lamports: u64) -> Self {
        self.meta().fee = lamports;
        self
    }

    pub fn failed(mut self) -> Self {
        self.meta().err = Some(serde_json::json!({"InstructionError": [0, {"Custom": 1}]}));
        self
    }

    pub fn without_meta(mut self) -> Self {
        self.tx.meta = None;
        self
    }

    pub fn build(self) -> ParsedTransaction {
        self.tx
    }
}

fn token_balance(index: u32, mint: &str, owner: &str, amount: f64, decimals: u8) -> TokenBalance {
    TokenBalance {
        account_index: index,
        mint: mint.to_string(),
        owner: Some(owner.to_string()),
        program_id: None,
        ui_token_amount: UiTokenAmount {
            amount: String::new(),
            decimals,
            ui_amount: Some(amount),
            ui_amount_string: Some(amount.to_string()),
        },
    }
}

/// Wallet sends 0.5 SOL to the counterparty through the system program
pub fn plain_transfer(wallet: &str) -> ParsedTransaction {
    TxBuilder::new()
        .block_time(1_700_000_000)
        .account_keys(&[wallet, COUNTERPARTY, crate::transactions::program_ids::SYSTEM_PROGRAM_ID])
        .instruction(crate::transactions::program_ids::SYSTEM_PROGRAM_ID)
        .native_balances(&[2_000_000_000, 0, 1], &[1_499_995_000, 500_000_000, 1])
        .fee(5_000)
        .build()
}
