//! User records returned by the remote endpoint.

use serde::{Deserialize, Serialize};

/// One user profile.
///
/// Only the fields the list screen shows are decoded; anything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"[
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {"street": "Kulas Light", "city": "Gwenborough"},
            "phone": "1-770-736-8031 x56442"
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv"
        }
    ]"#;

    #[test]
    fn test_deserialize_users_ignores_extra_fields() {
        let users: Vec<User> = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].username, "Bret");
        assert_eq!(users[1].email, "Shanna@melissa.tv");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result: Result<Vec<User>, _> = serde_json::from_str(r#"[{"id": 3, "name": "x"}]"#);
        assert!(result.is_err());
    }
}
