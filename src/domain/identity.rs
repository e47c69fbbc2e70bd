//! Identity references and the user search projection.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

pub const SEARCH_LIMIT: usize = 25;

/// Profile snapshot of a user. Replaced wholesale on every re-fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Relevance {
    Exact,
    Prefix,
    Substring,
}

fn relevance(identity: &Identity, needle: &str) -> Option<Relevance> {
    let name = identity.name.to_lowercase();
    let email = identity.email.to_lowercase();

    if name == needle || email == needle {
        Some(Relevance::Exact)
    } else if name.starts_with(needle) {
        Some(Relevance::Prefix)
    } else if name.contains(needle) || email.contains(needle) {
        Some(Relevance::Substring)
    } else {
        None
    }
}

/// Filters `candidates` down to case-insensitive name/email matches for
/// `query`, ordered by relevance, then name, then id, and capped at
/// [`SEARCH_LIMIT`]. The caller is never part of the result.
///
/// Returns `None` when the query is blank.
pub fn rank_search(candidates: Vec<Identity>, query: &str, me: UserId) -> Option<Vec<Identity>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut ranked: Vec<(Relevance, Identity)> = candidates
        .into_iter()
        .filter(|identity| identity.id != me)
        .filter_map(|identity| relevance(&identity, &needle).map(|r| (r, identity)))
        .collect();

    ranked.sort_by(|(ra, a), (rb, b)| {
        ra.cmp(rb)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });

    Some(
        ranked
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|(_, identity)| identity)
            .collect(),
    )
}

#[cfg(test)]
pub(crate) fn identity(id: UserId, name: &str) -> Identity {
    Identity {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        timezone: Some("Europe/Stockholm".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_excludes_caller_and_orders_by_relevance() {
        let people = vec![
            identity(1, "Astrid"),
            identity(2, "Bestie Two"),
            identity(3, "Old Bestie"),
            identity(4, "Bestie"),
            identity(5, "Bestie One"),
            identity(6, "Unrelated"),
        ];

        let found = rank_search(people, "  bestie ", 4).unwrap();
        let ids: Vec<UserId> = found.iter().map(|i| i.id).collect();

        // 4 is the caller; prefix matches sort by name before the substring match.
        assert_eq!(ids, vec![5, 2, 3]);
    }

    #[test]
    fn search_matches_email_and_exact_first() {
        let mut astrid = identity(1, "Astrid");
        astrid.email = "bob@example.com".into();
        let people = vec![identity(2, "Bobby"), astrid, identity(3, "Bob")];

        let found = rank_search(people, "BOB", 99).unwrap();
        let ids: Vec<UserId> = found.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(rank_search(vec![identity(1, "Astrid")], "   ", 9).is_none());
    }

    #[test]
    fn search_is_capped() {
        let people = (1..=40).map(|i| identity(i, &format!("Friend {i:02}"))).collect();
        assert_eq!(rank_search(people, "friend", 0).unwrap().len(), SEARCH_LIMIT);
    }
}
