use std::sync::Arc;
use crate::domain::ports::{BookingRepository, EventRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, booking_engine::BookingEngine};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_engine: Arc<BookingEngine>,
}

impl AppState {
    /// Wires the services on top of whichever repository backend was chosen.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(&config));
        let booking_engine = Arc::new(BookingEngine::new(
            event_repo.clone(),
            user_repo.clone(),
            booking_repo.clone(),
            config.booking_max_attempts,
        ));

        Self { config, user_repo, event_repo, booking_repo, auth_service, booking_engine }
    }
}
