// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed period document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Period '{0}' not found")]
    NotFound(String),

    #[error("Period '{0}' already exists")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid category schema: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, Error>;
