use std::time::SystemTime;

/// A `Warning` header entry: `code agent "text" ["date"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: u16,
    pub agent: String,
    pub text: String,
    pub date: Option<SystemTime>,
}

impl Warning {
    pub fn new(code: u16, agent: impl Into<String>, text: impl Into<String>) -> Self {
        Self { code, agent: agent.into(), text: text.into(), date: None }
    }
}
