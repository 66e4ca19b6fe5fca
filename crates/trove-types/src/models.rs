use serde::{Deserialize, Serialize};

/// Lifecycle of a reported item. The only transition is into `Claimed`,
/// fixed at the claim endpoint; `Lost`/`Found` are set once at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
    Claimed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "lost",
            ItemStatus::Found => "found",
            ItemStatus::Claimed => "claimed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lost" => Some(ItemStatus::Lost),
            "found" => Some(ItemStatus::Found),
            "claimed" => Some(ItemStatus::Claimed),
            _ => None,
        }
    }
}
