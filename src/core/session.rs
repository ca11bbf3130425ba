// Operator session capability

use serde::Serialize;

/// What the current operator is allowed to do
///
/// Produced only by a successful login and passed explicitly to every admin
/// operation. Carries no credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Admin { username: String },
    RootAdmin { username: String },
}

impl Session {
    pub fn for_user(username: &str, root_username: &str) -> Self {
        if username == root_username {
            Session::RootAdmin {
                username: username.to_string(),
            }
        } else {
            Session::Admin {
                username: username.to_string(),
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    pub fn is_root_admin(&self) -> bool {
        matches!(self, Session::RootAdmin { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Admin { username } | Session::RootAdmin { username } => Some(username),
        }
    }
}
