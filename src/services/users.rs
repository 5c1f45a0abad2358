// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User lifecycle: creation with a linked history, lookups, and explicit
//! cascade deletion.

use crate::error::{Error, Result};
use crate::models::User;
use crate::store;
use crate::utils::valid_email;
use rusqlite::Connection;

/// Creates a user and its history log in one transaction. The history note
/// is mandatory; the email must be well-formed and not yet registered.
pub fn create_user(
    conn: &mut Connection,
    name: &str,
    email: &str,
    history_note: &str,
) -> Result<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation(
            "User name must not be empty or blank.".into(),
        ));
    }
    if name.chars().count() < 3 {
        return Err(Error::Validation(
            "User name must be at least 3 characters long.".into(),
        ));
    }
    let email = email.trim();
    if !valid_email(email) {
        return Err(Error::Validation(format!("Invalid email format: {}", email)));
    }
    if history_note.trim().is_empty() {
        return Err(Error::Validation(
            "An initial history note is required.".into(),
        ));
    }
    if store::find_user_by_email(conn, email)?.is_some() {
        return Err(Error::Validation(format!(
            "Email '{}' is already registered.",
            email
        )));
    }

    let tx = conn.transaction()?;
    let user = store::insert_user(&tx, name, email)?;
    store::insert_history(&tx, user.id, history_note)?;
    tx.commit()?;
    Ok(user)
}

/// Deletes the user and everything hanging off it: wallets with their
/// assets, the history, and transfers on either side.
pub fn delete_user(conn: &mut Connection, id: i64) -> Result<()> {
    if store::find_user(conn, id)?.is_none() {
        return Err(Error::NotFound(format!(
            "Cannot delete: no user with id {}",
            id
        )));
    }
    let tx = conn.transaction()?;
    store::delete_user_cascade(&tx, id)?;
    tx.commit()?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    store::find_user(conn, id)
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    store::find_user_by_email(conn, email)
}

pub fn list_all(conn: &Connection) -> Result<Vec<User>> {
    store::list_users(conn)
}
