use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Author {
    System,
    Assistant,
    User,
}

impl Author {
    /// Role name used in backend payloads.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Author::System => return "system",
            Author::Assistant => return "assistant",
            Author::User => return "user",
        }
    }
}

impl ToString for Author {
    fn to_string(&self) -> String {
        match self {
            Author::System => return String::from("システム"),
            Author::Assistant => return String::from("AI医師"),
            Author::User => return Config::get(ConfigKey::Username),
        }
    }
}
