pub mod access;
pub mod rate_limit;
