use tracing::info;

use sj_core::FlagKey;

use super::flags::SessionFlags;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectProfileError {
    #[error("profile index {index} is out of range, user has {available} profile(s)")]
    OutOfRange { index: usize, available: usize },
}

/// Remember which profile the home screen opens on.
pub struct SelectProfile {
    flags: SessionFlags,
}

impl SelectProfile {
    pub fn new(flags: SessionFlags) -> Self {
        Self { flags }
    }

    /// Store `index` as the selected profile.
    ///
    /// The index is checked against the cached user snapshot when one exists;
    /// without a cache it is stored as-is and clamped at the next warm.
    pub async fn execute(&self, index: usize) -> Result<(), SelectProfileError> {
        if let Some(cached) = self.flags.cached_user().await {
            let available = cached.user.profiles.len();
            if index >= available {
                return Err(SelectProfileError::OutOfRange { index, available });
            }
        }
        self.flags
            .set(FlagKey::ProfileSelected, &index.to_string())
            .await;
        info!(index, "profile selected");
        Ok(())
    }
}
