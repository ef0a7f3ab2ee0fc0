pub const DEFAULT_PREFIX: &str = "lumen";

/// Storage key layout. Every key lives under a shared prefix so several
/// applications can share one backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    prefix: String,
}

impl Default for Keys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Keys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn theme(&self) -> String {
        format!("{}.theme", self.prefix)
    }

    pub fn theme_settings(&self) -> String {
        format!("{}.theme-settings", self.prefix)
    }

    pub fn draft(&self, conversation_id: &str) -> String {
        format!("{}.draft.{}", self.prefix, conversation_id)
    }

    pub fn draft_prefix(&self) -> String {
        format!("{}.draft.", self.prefix)
    }

    pub fn favorites(&self) -> String {
        format!("{}.favorites", self.prefix)
    }

    pub fn last_used(&self) -> String {
        format!("{}.last-used", self.prefix)
    }

    pub fn view_mode(&self) -> String {
        format!("{}.view-mode", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_keys_are_namespaced() {
        let keys = Keys::default();
        assert_eq!(keys.draft("c1"), "lumen.draft.c1");
        assert_ne!(keys.draft("c1"), keys.draft("c2"));
        assert!(keys.draft("c1").starts_with(&keys.draft_prefix()));
    }
}
