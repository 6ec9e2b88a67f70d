use serde::{Deserialize, Serialize};

/// A registered account, keyed by email. At most one account per email.
///
/// The password is stored and compared as plaintext. The comparison lives
/// entirely behind the portfolio store so a hashing scheme can be swapped
/// in without touching the engine or the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    pub password: String,
}
