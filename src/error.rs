//! Error types for partyperms

use thiserror::Error;

use crate::set::PermissionSet;

/// Failure to read a decimal permission string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("permission string is empty")]
    Empty,

    #[error("permission string {input:?} is not a base-10 integer")]
    InvalidDigit { input: String },

    #[error("permission string {input:?} does not fit in 128 bits")]
    Overflow { input: String },
}

/// Failure to build a [`PermissionCatalog`](crate::PermissionCatalog)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("permission name {0:?} is already defined")]
    DuplicateName(String),

    #[error("bit {bit} is already assigned to {owner:?}")]
    BitTaken { bit: u32, owner: String },

    #[error("bit {bit} was retired from {owner:?} and stays reserved")]
    BitReserved { bit: u32, owner: String },

    #[error("bit {0} is outside the 128-bit permission range")]
    BitOutOfRange(u32),

    #[error("unknown permission name {0:?}")]
    UnknownName(String),

    #[error("bundle {0:?} is already defined")]
    DuplicateBundle(String),

    #[error("could not read catalog config: {0}")]
    Config(String),
}

/// The main error type for partyperms operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("bit index {0} is outside the 128-bit permission range")]
    BitOutOfRange(u32),

    /// Raised by action gating; carries exactly the bits that were absent.
    #[error("missing permissions {missing}")]
    MissingPermissions { missing: PermissionSet },
}

/// Result type alias for partyperms operations
pub type Result<T> = std::result::Result<T, Error>;
