/// Balance-delta transfer extraction
///
/// Transfers are derived purely from before/after snapshots in the
/// transaction metadata, never from instruction decoding:
/// - token transfers from pre/post token balances owned by the wallet,
///   keyed by account index, in first-seen order
/// - one native SOL transfer from the wallet's lamport balance, with the fee
///   added back so paying the fee alone is not a transfer
///
/// Token transfers always precede the native transfer.
use crate::constants::{known_symbol, SOL_DECIMALS, SOL_MINT, SOL_SYMBOL, LAMPORTS_PER_SOL, TRANSFER_EPSILON};
use crate::rpc::types::{ParsedTransaction, TokenBalance, TransactionMeta};
use crate::transactions::types::{TokenTransfer, TransferDirection};

#[derive(Debug, Clone)]
struct BalanceChange {
    account_index: u32,
    mint: String,
    decimals: u8,
    pre: f64,
    post: f64,
}

/// All transfers for `wallet` in one transaction
pub fn extract_transfers(tx: &ParsedTransaction, wallet: &str) -> Vec<TokenTransfer> {
    let Some(meta) = tx.meta.as_ref() else {
        return Vec::new();
    };

    let mut transfers = token_transfers(meta, wallet);
    if let Some(native) = native_transfer(tx, meta, wallet) {
        transfers.push(native);
    }
    transfers
}

/// Token transfers; requires both pre and post token balance lists
pub fn token_transfers(meta: &TransactionMeta, wallet: &str) -> Vec<TokenTransfer> {
    let (Some(pre), Some(post)) = (&meta.pre_token_balances, &meta.post_token_balances) else {
        return Vec::new();
    };

    let owned = |balance: &&TokenBalance| balance.owner.as_deref() == Some(wallet);

    // Vec keeps insertion order; the handful of entries makes linear lookup fine
    let mut changes: Vec<BalanceChange> = Vec::new();

    for balance in pre.iter().filter(owned) {
        changes.push(BalanceChange {
            account_index: balance.account_index,
            mint: balance.mint.clone(),
            decimals: balance.ui_token_amount.decimals,
            pre: balance.ui_token_amount.ui_value(),
            post: 0.0,
        });
    }

    for balance in post.iter().filter(owned) {
        let value = balance.ui_token_amount.ui_value();
        match changes
            .iter_mut()
            .find(|c| c.account_index == balance.account_index)
        {
            Some(existing) => existing.post = value,
            None => changes.push(BalanceChange {
                account_index: balance.account_index,
                mint: balance.mint.clone(),
                decimals: balance.ui_token_amount.decimals,
                pre: 0.0,
                post: value,
            }),
        }
    }

    changes
        .into_iter()
        .filter_map(|change| {
            let diff = change.post - change.pre;
            if diff.abs() <= TRANSFER_EPSILON {
                return None;
            }
            Some(TokenTransfer {
                symbol: known_symbol(&change.mint).map(str::to_string),
                mint: change.mint,
                amount: diff.abs(),
                decimals: change.decimals,
                direction: direction_of(diff),
            })
        })
        .collect()
}

/// Native SOL movement excluding the fee; `None` when the wallet is not an
/// account of the transaction or nothing moved
pub fn native_transfer(
    tx: &ParsedTransaction,
    meta: &TransactionMeta,
    wallet: &str,
) -> Option<TokenTransfer> {
    let index = tx
        .transaction
        .message
        .account_keys
        .iter()
        .position(|key| key.pubkey() == wallet)?;

    let pre = *meta.pre_balances.get(index)? as i128;
    let post = *meta.post_balances.get(index)? as i128;

    // Lamport arithmetic keeps the fee add-back exact
    let diff_lamports = post - pre + meta.fee as i128;
    let diff = diff_lamports as f64 / LAMPORTS_PER_SOL as f64;
    if diff.abs() <= TRANSFER_EPSILON {
        return None;
    }

    Some(TokenTransfer {
        mint: SOL_MINT.to_string(),
        amount: diff.abs(),
        decimals: SOL_DECIMALS,
        symbol: Some(SOL_SYMBOL.to_string()),
        direction: direction_of(diff),
    })
}

fn direction_of(diff: f64) -> TransferDirection {
    if diff > 0.0 {
        TransferDirection::In
    } else {
        TransferDirection::Out
    }
}
