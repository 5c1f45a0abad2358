// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub fiat_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cryptocurrency {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    /// Fiat per unit. None until someone sets it.
    pub current_price: Option<Decimal>,
}

/// One position: how much of a cryptocurrency a wallet holds. At most one
/// row per (wallet, cryptocurrency) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub wallet_id: i64,
    pub crypto_id: i64,
    pub quantity: Decimal,
}

/// Immutable record of a completed transfer; quantity is in crypto units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub crypto_id: i64,
    pub quantity: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// Append-only text log, one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub id: i64,
    pub user_id: i64,
    pub detail: String,
}
