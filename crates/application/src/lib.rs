//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_ports;
mod authorization_service;

pub use authorization_ports::AuthorizationRepository;
pub use authorization_service::AuthorizationService;
