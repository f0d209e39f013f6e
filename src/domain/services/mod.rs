pub mod auth_service;
pub mod booking_engine;
pub mod inventory;
pub mod pricing;
