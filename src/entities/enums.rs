//! Enumerations used by the entities

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    // The only kind exercised today; the column exists so richer kinds
    // (attachments, system notices) can land without a schema change.
    Text,
}
