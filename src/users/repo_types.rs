use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,                      // assigned by storage
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,             // stored as given, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime, // assigned by storage
}

/// Fields supplied when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fields an update may change. Password and registration time are not here.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn json_hides_password() {
        let user = User {
            id: 4,
            name: "Name".into(),
            email: "a@a.com".into(),
            password: "secret".into(),
            registered_at: datetime!(2024-03-01 12:00:00 UTC),
        };
        let json = serde_json::to_value(&user).expect("serialize user");
        assert_eq!(json["id"], 4);
        assert_eq!(json["email"], "a@a.com");
        assert_eq!(json["registered_at"], "2024-03-01T12:00:00Z");
        assert!(json.get("password").is_none());
    }
}
