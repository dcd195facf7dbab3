use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("malformed message")]
    FormatError,
    #[error("invalid domain name: {0}")]
    InvalidName(String),
}
