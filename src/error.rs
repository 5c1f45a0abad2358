// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain error taxonomy. `Db` passes storage-layer failures (including
/// foreign-key constraint violations) through unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input violates a precondition: format, range,
    /// uniqueness, or a business rule such as insufficient balance.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The operation touches a resource not owned by the acting user.
    #[error("{0}")]
    Security(String),

    /// A system-configuration precondition is unmet, e.g. an unpriced
    /// cryptocurrency or a receiver with no wallet.
    #[error("{0}")]
    IllegalState(String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
