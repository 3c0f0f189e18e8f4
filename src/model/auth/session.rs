use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::model::{
    common::{AdminId, VoterId},
    voter::VoterDescription,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Rights {
    Voter = 0,
    Admin = 1,
}

impl Display for Rights {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Voter => "voter",
                Self::Admin => "admin",
            }
        )
    }
}

/// Who is currently logged in. At most one principal at a time, and the
/// variant doubles as the user type, so the two can never disagree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum Session {
    #[default]
    Anonymous,
    Voter(VoterId),
    Admin(AdminId),
}

impl Session {
    /// The rights held by this session, if anyone is logged in.
    pub fn rights(&self) -> Option<Rights> {
        match self {
            Self::Anonymous => None,
            Self::Voter(_) => Some(Rights::Voter),
            Self::Admin(_) => Some(Rights::Admin),
        }
    }

    /// Does this session permit the given rights?
    pub fn permits(&self, target: Rights) -> bool {
        self.rights() == Some(target)
    }

    pub fn voter(&self) -> Option<VoterId> {
        match self {
            Self::Voter(id) => Some(*id),
            _ => None,
        }
    }

    pub fn admin(&self) -> Option<AdminId> {
        match self {
            Self::Admin(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        *self == Self::Anonymous
    }
}

/// A renderable view of the logged-in user, for dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Principal {
    Anonymous,
    Voter(VoterDescription),
    #[serde(rename_all = "camelCase")]
    Admin { id: AdminId, username: String },
}

impl Principal {
    pub fn rights(&self) -> Option<Rights> {
        match self {
            Self::Anonymous => None,
            Self::Voter(_) => Some(Rights::Voter),
            Self::Admin { .. } => Some(Rights::Admin),
        }
    }
}
