pub mod cors;
pub mod dtos;
pub mod extractors;
pub mod handlers;
pub mod router;
