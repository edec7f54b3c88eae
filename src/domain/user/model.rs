use chrono::{DateTime, Utc};

/// Marketplace account. The same user may act as host and as guest.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            password_hash: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_joins_parts() {
        assert_eq!(user("Jane", "Doe").full_name(), "Jane Doe");
        assert_eq!(user("Jane", "").full_name(), "Jane");
        assert_eq!(user("", "").full_name(), "");
    }
}
