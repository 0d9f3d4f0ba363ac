use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Reading status of an address. Absence from the store means `NotVisited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    NotVisited,
    Ongoing,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotVisited, Status::Ongoing, Status::Completed];

    /// Token used when the status is persisted.
    pub fn as_token(self) -> &'static str {
        match self {
            Status::NotVisited => "not-visited",
            Status::Ongoing => "ongoing",
            Status::Completed => "completed",
        }
    }

    /// Group the status is listed under; `NotVisited` is never listed.
    pub fn group(self) -> Option<Group> {
        match self {
            Status::NotVisited => None,
            Status::Ongoing => Some(Group::Ongoing),
            Status::Completed => Some(Group::Completed),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized status token {token:?}")]
pub struct ParseStatusError {
    pub token: String,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_token() == token)
            .ok_or_else(|| ParseStatusError {
                token: token.to_string(),
            })
    }
}

/// One of the two listed groups in the list manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Group {
    #[default]
    Completed,
    Ongoing,
}

impl Group {
    pub fn status(self) -> Status {
        match self {
            Group::Completed => Status::Completed,
            Group::Ongoing => Status::Ongoing,
        }
    }

    /// The group an item lands in when moved out of `self`.
    pub fn other(self) -> Group {
        match self {
            Group::Completed => Group::Ongoing,
            Group::Ongoing => Group::Completed,
        }
    }

    pub fn label(self) -> &'static str {
        self.status().as_token()
    }
}
