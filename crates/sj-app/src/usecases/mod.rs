//! Business logic use cases
//!
//! Each use case is a struct built from `Arc<dyn Port>` dependencies with a
//! single async entry point. `bootstrap` holds the resolver and the
//! coordinator that mounts its decision; everything else is a session
//! mutation triggered by the user.

pub mod bootstrap;
pub mod flags;
pub mod master_password;
pub mod navigation;
pub mod select_profile;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod warm_cache;
pub mod welcome;

pub use bootstrap::{BootstrapCoordinator, BootstrapResolution, ResolveBootstrap};
pub use flags::SessionFlags;
pub use master_password::{MasterPasswordError, SetMasterPassword, UnlockWithMasterPassword};
pub use navigation::{BootstrapGeneration, GenerationTicket, RunGuard, ScreenNavigator};
pub use select_profile::{SelectProfile, SelectProfileError};
pub use session::SessionManager;
pub use sign_in::{SignInError, SignInWithOtp};
pub use sign_out::SignOut;
pub use warm_cache::{CachedUserDetails, WarmSessionCache};
pub use welcome::WelcomeFlow;

#[cfg(test)]
pub(crate) mod test_support;
