use crate::models::user::User;

/// Compare two secrets in constant time with respect to their content
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Linear scan for an exact username and password match
pub fn find_user<'a>(users: &'a [User], username: &str, password: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|u| u.username == username && secrets_match(password, &u.password))
}
