use uuid::Uuid;

use super::User;

/// Per-message invocation context handed to a command handler
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub id: Uuid,
    pub chat_id: String,
    pub display_name: String,
}

impl InvocationContext {
    pub fn new(chat_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let chat_id = chat_id.into();
        let display_name = display_name.into();
        // A blank name would render an empty greeting
        let display_name = if display_name.trim().is_empty() {
            chat_id.clone()
        } else {
            display_name
        };

        Self {
            id: Uuid::new_v4(),
            chat_id,
            display_name,
        }
    }

    pub fn from_user(chat_id: impl Into<String>, user: &User) -> Self {
        Self::new(chat_id, user.display_name())
    }
}
