use crate::Status;

/// Background tone of a non-empty badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Warning,
    Info,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Warning => "#ffc107",
            Tone::Info => "#17a2b8",
        }
    }
}

/// Badge shown on a tab. An empty `text` clears the indicator and carries no tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: &'static str,
    pub tone: Option<Tone>,
}

impl Badge {
    pub fn cleared() -> Self {
        Self {
            text: "",
            tone: None,
        }
    }

    pub fn for_status(status: Status) -> Self {
        match status {
            Status::NotVisited => Self::cleared(),
            Status::Ongoing => Self {
                text: "●",
                tone: Some(Tone::Warning),
            },
            Status::Completed => Self {
                text: "✓",
                tone: Some(Tone::Info),
            },
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
    }
}
