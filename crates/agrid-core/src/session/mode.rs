//! Response source selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where replies for a session are produced.
///
/// `Remote` calls the hosted completion provider; `Local` uses the
/// rule-based classifier and template responder exclusively. A session
/// may move from `Remote` to `Local` but is never promoted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatMode {
    Remote,
    Local,
}

impl ChatMode {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}
