//! Declarative layout of the SWA database: seven collections and their indexes.

use std::time::Duration;

use mongodb::bson::Document;

use crate::storage::IndexDefinition;

pub const DEFAULT_DATABASE: &str = "swa_database";

pub const USERS: &str = "users";
pub const PROMO_CODES: &str = "promo_codes";
pub const GAMES: &str = "games";
pub const SESSIONS: &str = "sessions";
pub const STATS: &str = "stats";
pub const DEVICES: &str = "devices";
pub const SLOTS: &str = "slots";

/// Single-field ascending index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub unique: bool,
    pub expire_after_secs: Option<u64>,
}

impl IndexSpec {
    pub const fn plain(field: &'static str) -> Self {
        Self {
            field,
            unique: false,
            expire_after_secs: None,
        }
    }

    pub const fn unique(field: &'static str) -> Self {
        Self {
            field,
            unique: true,
            expire_after_secs: None,
        }
    }

    /// Documents expire `secs` seconds after the date stored in `field`.
    pub const fn ttl(field: &'static str, secs: u64) -> Self {
        Self {
            field,
            unique: false,
            expire_after_secs: Some(secs),
        }
    }

    /// Server default name for an ascending single-field index.
    pub fn name(&self) -> String {
        format!("{}_1", self.field)
    }

    pub fn definition(&self) -> IndexDefinition {
        let mut keys = Document::new();
        keys.insert(self.field, 1);
        IndexDefinition {
            name: self.name(),
            keys,
            unique: self.unique,
            expire_after: self.expire_after_secs.map(Duration::from_secs),
            ..IndexDefinition::default()
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: &'static [IndexSpec],
}

pub static SWA_SCHEMA: &[CollectionSpec] = &[
    CollectionSpec {
        name: USERS,
        indexes: &[
            IndexSpec::unique("username"),
            IndexSpec::unique("email"),
            IndexSpec::unique("id"),
        ],
    },
    CollectionSpec {
        name: PROMO_CODES,
        indexes: &[IndexSpec::unique("code"), IndexSpec::unique("id")],
    },
    // Game cache; access_type is a lookup filter only.
    CollectionSpec {
        name: GAMES,
        indexes: &[IndexSpec::unique("game_id"), IndexSpec::plain("access_type")],
    },
    CollectionSpec {
        name: SESSIONS,
        indexes: &[
            IndexSpec::unique("session_id"),
            IndexSpec::plain("user_id"),
            IndexSpec::ttl("expires_at", 0),
        ],
    },
    CollectionSpec {
        name: STATS,
        indexes: &[IndexSpec::plain("date"), IndexSpec::plain("type")],
    },
    CollectionSpec {
        name: DEVICES,
        indexes: &[IndexSpec::plain("user_id"), IndexSpec::unique("device_id")],
    },
    CollectionSpec {
        name: SLOTS,
        indexes: &[IndexSpec::plain("user_id"), IndexSpec::unique("slot_id")],
    },
];
