use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Premium,
    Free,
    Standard,
}

/// A document in the `users` collection.
///
/// `password` always holds a PHC hash string, never plaintext.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub join_date: String,
    pub status: UserStatus,
    pub games_count: i64,
    pub is_admin: bool,
    pub premium_expires: Option<String>,
    pub slots: i32,
    pub devices: Vec<String>,
    pub referral_code: String,
    pub used_referral: Option<String>,
    pub total_referrals: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};

    fn sample() -> User {
        User {
            id: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            join_date: "2026-10-19".into(),
            status: UserStatus::Free,
            games_count: 0,
            is_admin: false,
            premium_expires: None,
            slots: 1,
            devices: vec![],
            referral_code: "ALICE1".into(),
            used_referral: None,
            total_referrals: 0,
        }
    }

    #[test]
    fn nullable_fields_are_stored_as_null() {
        let doc = bson::to_document(&sample()).unwrap();
        assert_eq!(doc.get("premium_expires"), Some(&Bson::Null));
        assert_eq!(doc.get("used_referral"), Some(&Bson::Null));
    }

    #[test]
    fn status_is_stored_by_name() {
        let mut user = sample();
        user.status = UserStatus::Premium;
        let doc = bson::to_document(&user).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "Premium");
        assert_eq!(doc.get_array("devices").unwrap().len(), 0);
    }
}
