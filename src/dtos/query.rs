//! Query DTOs - query string parameters

use serde::{Deserialize, Serialize};

/// Query parameters of GET /users/search
#[derive(Serialize, Deserialize, Debug)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Query parameters of GET /pings/{id}/ics-public
#[derive(Serialize, Deserialize, Debug)]
pub struct IcsQuery {
    #[serde(default)]
    pub sig: String,
}
