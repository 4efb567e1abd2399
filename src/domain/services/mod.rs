pub mod account_lifecycle;
pub mod password_service;
