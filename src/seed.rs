//! Optional administrative seed record.
//!
//! The seed is only built on explicit request and always carries an Argon2id
//! hash; plaintext passwords never leave this module.

use std::io::IsTerminal;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use mongodb::bson::{self, DateTime, Document};

use crate::error::ProvisionError;
use crate::models::{User, UserStatus};

pub const MIN_PASSWORD_LEN: usize = 12;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@swa.local";
const ADMIN_REFERRAL_CODE: &str = "ADMIN123";
const ADMIN_SLOTS: i32 = 5;

#[derive(Clone, Debug)]
pub struct AdminSeed {
    user: User,
}

impl AdminSeed {
    /// Build the admin record, hashing `password`. A random id is used when none is given.
    pub fn build(
        id: Option<String>,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ProvisionError> {
        validate_password(password)?;
        let user = User {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            username: username.to_string(),
            email: email.to_string(),
            password: hash_password(password)?,
            join_date: today()?,
            status: UserStatus::Premium,
            games_count: 0,
            is_admin: true,
            premium_expires: None,
            slots: ADMIN_SLOTS,
            devices: Vec::new(),
            referral_code: ADMIN_REFERRAL_CODE.to_string(),
            used_referral: None,
            total_referrals: 0,
        };
        Ok(Self { user })
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn to_document(&self) -> Result<Document, ProvisionError> {
        Ok(bson::to_document(&self.user)?)
    }
}

fn validate_password(password: &str) -> Result<(), ProvisionError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ProvisionError::Credential(format!(
            "admin password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, ProvisionError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ProvisionError::Credential(format!("hashing admin password: {e}")))?;
    Ok(hash.to_string())
}

/// Current UTC date as `YYYY-MM-DD`.
fn today() -> Result<String, ProvisionError> {
    let now = DateTime::now()
        .try_to_rfc3339_string()
        .map_err(|e| ProvisionError::Credential(format!("formatting join date: {e}")))?;
    match now.split_once('T') {
        Some((date, _)) => Ok(date.to_string()),
        None => Err(ProvisionError::Credential(format!(
            "unexpected timestamp format: {now}"
        ))),
    }
}

/// Use `explicit` when given, otherwise prompt twice on an interactive terminal.
pub fn resolve_password(explicit: Option<String>) -> Result<String, ProvisionError> {
    if let Some(password) = explicit.filter(|p| !p.is_empty()) {
        return Ok(password);
    }
    if !std::io::stdin().is_terminal() {
        return Err(ProvisionError::Credential(
            "admin seed requires --admin-password or SWA_ADMIN_PASSWORD when not running interactively"
                .to_string(),
        ));
    }
    let first = rpassword::prompt_password("Admin password: ")
        .map_err(|e| ProvisionError::Credential(format!("reading password: {e}")))?;
    let second = rpassword::prompt_password("Confirm admin password: ")
        .map_err(|e| ProvisionError::Credential(format!("confirming password: {e}")))?;
    if first != second {
        return Err(ProvisionError::Credential("passwords do not match".to_string()));
    }
    Ok(first)
}
