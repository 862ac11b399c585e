/// Transaction classification
///
/// Perps detection is an ordered list of independent signals, each a pure
/// predicate over the parsed transaction. Evaluation short-circuits on the
/// first match. The transaction type is derived afterwards: perps activity
/// wins over everything, then swap programs, then plain transfer.
use crate::constants::JUPITER_PERP_VAULT_AUTHORITY;
use crate::logger::{self, LogTag};
use crate::rpc::types::ParsedTransaction;
use crate::transactions::program_ids::{detect_router_from_program_id, is_swap_program_id};
use crate::transactions::types::ActivityType;

/// Predicate: does `authority` appear in this part of the transaction?
pub type AuthoritySignal = fn(&ParsedTransaction, &str) -> bool;

/// Signals in evaluation order
pub const AUTHORITY_SIGNALS: &[(&str, AuthoritySignal)] = &[
    ("account_keys", in_static_account_keys),
    ("lookup_tables", in_loaded_addresses),
    ("token_balance_owner", in_token_balance_owners),
    ("inner_instructions", in_inner_instructions),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub activity_type: ActivityType,
    pub is_jupiter_perp: bool,
    /// Name of the first signal that matched, if any
    pub matched_signal: Option<&'static str>,
}

// =============================================================================
// SIGNALS
// =============================================================================

/// Signal 1: static account keys of the message
pub fn in_static_account_keys(tx: &ParsedTransaction, authority: &str) -> bool {
    tx.transaction
        .message
        .account_keys
        .iter()
        .any(|key| key.pubkey() == authority)
}

/// Signal 2: addresses loaded through lookup tables (writable or read-only)
pub fn in_loaded_addresses(tx: &ParsedTransaction, authority: &str) -> bool {
    let Some(loaded) = tx.meta.as_ref().and_then(|m| m.loaded_addresses.as_ref()) else {
        return false;
    };
    loaded
        .writable
        .iter()
        .chain(loaded.readonly.iter())
        .any(|address| address == authority)
}

/// Signal 3: owner of any pre or post token balance
pub fn in_token_balance_owners(tx: &ParsedTransaction, authority: &str) -> bool {
    let Some(meta) = tx.meta.as_ref() else {
        return false;
    };
    meta.pre_token_balances
        .iter()
        .chain(meta.post_token_balances.iter())
        .flatten()
        .any(|balance| balance.owner.as_deref() == Some(authority))
}

/// Signal 4: account list of any inner instruction, across all groups
pub fn in_inner_instructions(tx: &ParsedTransaction, authority: &str) -> bool {
    let Some(groups) = tx.meta.as_ref().and_then(|m| m.inner_instructions.as_ref()) else {
        return false;
    };
    groups
        .iter()
        .flat_map(|group| group.instructions.iter())
        .any(|ix| ix.accounts.iter().any(|account| account == authority))
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// First signal that finds `authority` in the transaction
pub fn detect_authority(tx: &ParsedTransaction, authority: &str) -> Option<&'static str> {
    AUTHORITY_SIGNALS
        .iter()
        .find(|(_, signal)| signal(tx, authority))
        .map(|(name, _)| *name)
}

/// True when the transaction touches the Jupiter perpetuals vault authority
pub fn is_jupiter_perp_transaction(tx: &ParsedTransaction) -> bool {
    detect_authority(tx, JUPITER_PERP_VAULT_AUTHORITY).is_some()
}

/// Type from top-level instructions alone (perps handled by the caller)
pub fn determine_activity_type(tx: &ParsedTransaction, is_jupiter_perp: bool) -> ActivityType {
    if is_jupiter_perp {
        return ActivityType::JupiterPerp;
    }

    let swap_program = tx
        .transaction
        .message
        .instructions
        .iter()
        .filter_map(|ix| ix.program_id.as_deref())
        .find(|program_id| is_swap_program_id(program_id));

    match swap_program {
        Some(program_id) => {
            logger::verbose(
                LogTag::Classifier,
                &format!(
                    "Swap via {}",
                    detect_router_from_program_id(program_id).unwrap_or("unknown router")
                ),
            );
            ActivityType::Swap
        }
        None => ActivityType::Transfer,
    }
}

/// Classify a parsed transaction
pub fn classify(tx: &ParsedTransaction) -> Classification {
    let matched_signal = detect_authority(tx, JUPITER_PERP_VAULT_AUTHORITY);
    let is_jupiter_perp = matched_signal.is_some();

    if let Some(signal) = matched_signal {
        logger::debug(LogTag::Classifier, &format!("Perps authority found via {}", signal));
    }

    Classification {
        activity_type: determine_activity_type(tx, is_jupiter_perp),
        is_jupiter_perp,
        matched_signal,
    }
}
