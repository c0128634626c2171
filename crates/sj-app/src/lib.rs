//! Sarajod application layer
//!
//! Use cases that drive the core ports: the session bootstrap resolver and
//! its coordinator, OTP sign-in, the master password gate and the small
//! bookkeeping flows around them.

pub mod usecases;

pub use usecases::{
    BootstrapCoordinator, BootstrapGeneration, BootstrapResolution, CachedUserDetails,
    GenerationTicket, RunGuard,
    MasterPasswordError, ResolveBootstrap, ScreenNavigator, SelectProfile, SelectProfileError,
    SessionFlags, SessionManager, SetMasterPassword, SignInError, SignInWithOtp, SignOut,
    UnlockWithMasterPassword, WarmSessionCache, WelcomeFlow,
};
