use serde::{Deserialize, Serialize};

/// Administrator account as returned by `GET /users`
///
/// Not `Serialize`, so passwords cannot end up in a console response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "user")]
    pub username: String,
    /// Stored in plaintext by the parking service
    #[serde(rename = "contraseña")]
    pub password: String,
}

/// Body of `POST /users` and `PUT /users/{id}`
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewUser {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "contraseña")]
    pub password: String,
}
