//! System-wide constants for the zionex exchange core.

/// Decimals of the native asset.
pub const NATIVE_DECIMALS: u32 = 18;

/// Decimals of the reference token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Reference token name.
pub const TOKEN_NAME: &str = "Zion Token";

/// Reference token symbol.
pub const TOKEN_SYMBOL: &str = "ZION";

/// Reference token supply in whole tokens, minted to the deployer.
pub const TOKEN_TOTAL_SUPPLY_WHOLE: u64 = 1_000_000_000;

/// Upper bound on the protocol fee percent.
pub const MAX_FEE_PERCENT: u32 = 100;

/// Default protocol fee percent.
pub const DEFAULT_FEE_PERCENT: u32 = 10;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable naming the fee account.
pub const ENV_FEE_ACCOUNT: &str = "ZIONEX_FEE_ACCOUNT";

/// Environment variable holding the fee percent.
pub const ENV_FEE_PERCENT: &str = "ZIONEX_FEE_PERCENT";

/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "ZIONEX_LOG";

/// Environment variable switching JSON log output on (`1`/`true`).
pub const ENV_LOG_JSON: &str = "ZIONEX_LOG_JSON";

/// Domain separator for the audit-log hash chain.
pub const AUDIT_CHAIN_DOMAIN: &[u8] = b"zionex:audit:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "zionex";
