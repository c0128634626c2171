//! # Dependency Injection
//!
//! Builds the concrete adapters and hands them to the use cases as port
//! trait objects. This is the only module that depends on sj-app and
//! sj-infra at the same time. It assembles; it does not decide.

use std::sync::Arc;

use sj_app::{
    BootstrapCoordinator, BootstrapGeneration, ResolveBootstrap, ScreenNavigator, SelectProfile,
    SessionFlags, SessionManager, SetMasterPassword, SignInWithOtp, SignOut,
    UnlockWithMasterPassword, WarmSessionCache, WelcomeFlow,
};
use sj_core::config::AppConfig;
use sj_core::ports::{AccountApiPort, FlagsStorePort, ScreenRouterPort};
use sj_infra::{FileFlagsStore, HttpAccountApi};
use tracing::info;

/// Everything the CLI commands need, wired once per process.
pub struct AppServices {
    pub flags: SessionFlags,
    pub session: Arc<SessionManager>,
    pub navigator: Arc<ScreenNavigator>,
    pub coordinator: Arc<BootstrapCoordinator>,
    pub sign_in: SignInWithOtp,
    pub sign_out: SignOut,
    pub unlock: UnlockWithMasterPassword,
    pub set_master_password: SetMasterPassword,
    pub welcome: WelcomeFlow,
    pub select_profile: SelectProfile,
}

/// Wire the production adapters: the JSON flags file under the configured
/// data directory and the HTTP account client.
pub fn wire_services(
    config: &AppConfig,
    router: Arc<dyn ScreenRouterPort>,
) -> anyhow::Result<AppServices> {
    let store: Arc<dyn FlagsStorePort> = Arc::new(FileFlagsStore::new(config.flags_file()));
    let api: Arc<dyn AccountApiPort> = Arc::new(HttpAccountApi::from_config(config, store.clone())?);

    info!(
        api_base_url = %config.api_base_url,
        flags_file = %config.flags_file().display(),
        "services wired"
    );

    Ok(wire_with_ports(config, store, api, router))
}

/// Wire the use cases over already-built ports.
pub fn wire_with_ports(
    config: &AppConfig,
    store: Arc<dyn FlagsStorePort>,
    api: Arc<dyn AccountApiPort>,
    router: Arc<dyn ScreenRouterPort>,
) -> AppServices {
    let flags = SessionFlags::new(store);
    let session = Arc::new(SessionManager::new(flags.clone(), api.clone()));
    let navigator = Arc::new(ScreenNavigator::new(
        router,
        Arc::new(BootstrapGeneration::new()),
    ));

    let resolver = Arc::new(ResolveBootstrap::new(
        session.clone(),
        flags.clone(),
        api.clone(),
        config.bootstrap_step_timeout(),
    ));
    let warm_cache = Arc::new(WarmSessionCache::new(flags.clone(), api.clone()));
    let coordinator = Arc::new(BootstrapCoordinator::new(
        resolver,
        navigator.clone(),
        warm_cache,
    ));

    AppServices {
        sign_in: SignInWithOtp::new(
            api.clone(),
            session.clone(),
            flags.clone(),
            coordinator.clone(),
        ),
        sign_out: SignOut::new(session.clone(), navigator.clone()),
        unlock: UnlockWithMasterPassword::new(api.clone(), session.clone(), navigator.clone()),
        set_master_password: SetMasterPassword::new(api, session.clone(), navigator.clone()),
        welcome: WelcomeFlow::new(flags.clone()),
        select_profile: SelectProfile::new(flags.clone()),
        flags,
        session,
        navigator,
        coordinator,
    }
}
