/// Lookups attempted before a hostname is declared unresolvable.
pub const DEFAULT_RESOLVE_ATTEMPTS: u32 = 5;

/// Seconds slept between two failed lookups.
pub const DEFAULT_RESOLVE_DELAY_SECS: u64 = 3;

/// Path suffix whose body is read as a nested health payload.
pub const HEALTHCHECK_PATH_SUFFIX: &str = "/healthcheck";

/// Inclusive range of accepted HTTP status codes.
pub const MIN_HEALTHY_STATUS: u16 = 200;
pub const MAX_HEALTHY_STATUS: u16 = 399;
