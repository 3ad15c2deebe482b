//! Authority model - the total order of user roles.

use serde::{Deserialize, Serialize};

/// Role level of a user, lowest first.
///
/// Declaration order is the rank order: every rank comparison goes through
/// [`Authority::ordinal`], never through names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    #[default]
    Default,
    Moderator,
    Admin,
    Owner,
}

pub const AUTHORITY_DELIMITER: char = ',';

impl Authority {
    pub const ALL: [Authority; 4] = [
        Authority::Default,
        Authority::Moderator,
        Authority::Admin,
        Authority::Owner,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Default => "DEFAULT",
            Authority::Moderator => "MODERATOR",
            Authority::Admin => "ADMIN",
            Authority::Owner => "OWNER",
        }
    }

    /// Plural name used in denial messages.
    pub fn group_name(&self) -> &'static str {
        match self {
            Authority::Default => "users",
            Authority::Moderator => "moderators",
            Authority::Admin => "admins",
            Authority::Owner => "owners",
        }
    }

    /// Group that outranks this authority, used when a target is too senior.
    pub fn next_group_name(&self) -> &'static str {
        Self::ALL
            .get(self.ordinal() as usize + 1)
            .map(|next| next.group_name())
            .unwrap_or("nobody")
    }

    /// Every authority up to and including `self`.
    pub fn granted(self) -> impl Iterator<Item = Authority> {
        Self::ALL
            .into_iter()
            .take_while(move |a| a.ordinal() <= self.ordinal())
    }

    /// Delimiter-joined form carried in token claims.
    pub fn encode_granted(self) -> String {
        self.granted()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(&AUTHORITY_DELIMITER.to_string())
    }

    /// Highest authority named in a delimiter-joined claim.
    ///
    /// Unknown names are read as `Default`, and an empty claim yields `Default`.
    pub fn decode_highest(encoded: &str) -> Authority {
        encoded
            .split(AUTHORITY_DELIMITER)
            .map(|name| name.trim().parse::<Authority>().unwrap_or_default())
            .max_by_key(|a| a.ordinal())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Authority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEFAULT" => Ok(Authority::Default),
            "MODERATOR" => Ok(Authority::Moderator),
            "ADMIN" => Ok(Authority::Admin),
            "OWNER" => Ok(Authority::Owner),
            _ => Err(format!("Invalid authority: {}", s)),
        }
    }
}
