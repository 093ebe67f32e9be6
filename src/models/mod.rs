pub mod fingerprint;
pub mod summary;
