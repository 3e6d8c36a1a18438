use crate::library::SavedAsset;

/// Progress of the save button. One enum, so "saved" and "failed" can
/// never both be showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    /// Success overlay is visible; `since` is the UI clock in seconds
    Succeeded { asset: SavedAsset, since: f64 },
    /// Overlay timed out, confirmation alert is open
    Confirmed { asset: SavedAsset },
    /// Error alert is open
    Failed { message: String },
}

impl SaveStatus {
    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Saving)
    }

    pub fn shows_success_overlay(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn shows_alert(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
    }

    pub fn success_message(&self) -> Option<String> {
        match self {
            Self::Succeeded { asset, .. } | Self::Confirmed { asset } => {
                Some(format!("Drawing saved to {}", asset.path.display()))
            }
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}
