/// Log tags identify the subsystem a message comes from
///
/// Each tag maps to a `--debug-<key>` command-line flag.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Storage,
    Rpc,
    Fetcher,
    Classifier,
    Ingest,
    Poller,
    Wallets,
    Positions,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` flags and the enabled-tags filter
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Storage => "storage".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Fetcher => "fetcher".to_string(),
            LogTag::Classifier => "classifier".to_string(),
            LogTag::Ingest => "ingest".to_string(),
            LogTag::Poller => "poller".to_string(),
            LogTag::Wallets => "wallets".to_string(),
            LogTag::Positions => "positions".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label used in the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Storage => "STORAGE".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Fetcher => "FETCHER".to_string(),
            LogTag::Classifier => "CLASSIFY".to_string(),
            LogTag::Ingest => "INGEST".to_string(),
            LogTag::Poller => "POLLER".to_string(),
            LogTag::Wallets => "WALLETS".to_string(),
            LogTag::Positions => "POSITIONS".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }

    /// All tags that have a dedicated debug flag
    pub fn all() -> Vec<LogTag> {
        vec![
            LogTag::System,
            LogTag::Config,
            LogTag::Storage,
            LogTag::Rpc,
            LogTag::Fetcher,
            LogTag::Classifier,
            LogTag::Ingest,
            LogTag::Poller,
            LogTag::Wallets,
            LogTag::Positions,
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
