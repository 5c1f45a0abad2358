// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod users;
pub mod wallets;
pub mod cryptos;
pub mod transfers;
pub mod history;
pub mod reports;
pub mod exporter;
pub mod doctor;
