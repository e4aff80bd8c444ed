use std::fmt;

/// Represents the user who sent a command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_name(mut self, first: impl Into<String>, last: Option<impl Into<String>>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = last.map(|l| l.into());
        self
    }

    /// Name used to greet the user. Falls back to the username, then the id,
    /// so the result is never empty.
    pub fn display_name(&self) -> String {
        let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        non_empty(&self.first_name)
            .or_else(|| non_empty(&self.username))
            .unwrap_or_else(|| self.id.clone())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_first_name() {
        let user = User::new("42").with_username("alice_w").with_name("Alice", None::<String>);
        assert_eq!(user.display_name(), "Alice");
    }

    #[test]
    fn falls_back_to_username_then_id() {
        let user = User::new("42").with_username("alice_w");
        assert_eq!(user.display_name(), "alice_w");

        let blank = User::new("42").with_name("  ", None::<String>);
        assert_eq!(blank.display_name(), "42");
    }
}
