//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Timer defaults, overridable per workflow step.
pub const DEFAULT_WARNING_THRESHOLD: u8 = 80;
pub const DEFAULT_CRITICAL_THRESHOLD: u8 = 100;
pub const DEFAULT_TIMER_HOURS: i64 = 24;

/// Redis list the outbound mail queue lives on.
pub const MAIL_QUEUE_KEY: &str = "tms:mail:outbound";
