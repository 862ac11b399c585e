/// Program IDs used to classify transactions
///
/// A top-level instruction addressed to any swap program marks the
/// transaction as a swap (unless the perps authority is present).

// =============================================================================
// SWAP PROGRAM IDS
// =============================================================================

/// Jupiter aggregator
pub const JUPITER_V6_PROGRAM_ID: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";
pub const JUPITER_V4_PROGRAM_ID: &str = "JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB";

/// Orca
pub const ORCA_V1_PROGRAM_ID: &str = "9W959DqEETiGZocYWCQPaJ6sBmUzgfxXfqGeTEdp3aQP";
pub const ORCA_WHIRLPOOL_PROGRAM_ID: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";

// =============================================================================
// SYSTEM PROGRAM IDS
// =============================================================================

pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

// =============================================================================
// DETECTION FUNCTIONS
// =============================================================================

/// All swap program IDs
pub fn get_swap_program_ids() -> &'static [&'static str] {
    &[
        JUPITER_V6_PROGRAM_ID,
        JUPITER_V4_PROGRAM_ID,
        ORCA_V1_PROGRAM_ID,
        ORCA_WHIRLPOOL_PROGRAM_ID,
    ]
}

/// Check if a program ID belongs to the swap allow-list
pub fn is_swap_program_id(program_id: &str) -> bool {
    matches!(
        program_id,
        JUPITER_V6_PROGRAM_ID | JUPITER_V4_PROGRAM_ID | ORCA_V1_PROGRAM_ID | ORCA_WHIRLPOOL_PROGRAM_ID
    )
}

/// Router name for a swap program
pub fn detect_router_from_program_id(program_id: &str) -> Option<&'static str> {
    match program_id {
        JUPITER_V6_PROGRAM_ID | JUPITER_V4_PROGRAM_ID => Some("jupiter"),
        ORCA_V1_PROGRAM_ID | ORCA_WHIRLPOOL_PROGRAM_ID => Some("orca"),
        _ => None,
    }
}
