pub mod account_settings_usecase;
pub mod account_store;
pub mod login_usecase;
pub mod register_account_usecase;
