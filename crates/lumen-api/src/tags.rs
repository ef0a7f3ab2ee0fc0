use std::fmt;

/// Invalidation tag attached to cached query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Conversations,
    System,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Conversations => "Conversations",
            Tag::System => "System",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
