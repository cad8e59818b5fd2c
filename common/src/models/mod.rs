pub mod comment;
pub mod project;
pub mod session;
pub mod task;
pub mod user;

pub use comment::*;
pub use project::*;
pub use session::*;
pub use task::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Backends disagree on whether ids are numbers or strings; keep them as strings.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
