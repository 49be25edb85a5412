//! HTTP inbound adapter exposing REST endpoints.

pub mod bank_accounts;
pub mod error;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Prefix under which every API route is mounted.
pub const API_PREFIX: &str = "/api/v1";

/// JSON extractor settings shared by every route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(error::json_error_handler)
}

/// Register the user, login, and bank account routes.
///
/// Mount inside a scope at [`API_PREFIX`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::login)
        .service(bank_accounts::create_bank_account)
        .service(bank_accounts::list_bank_accounts)
        .service(bank_accounts::get_bank_account)
        .service(bank_accounts::update_bank_account)
        .service(bank_accounts::delete_bank_account)
        .service(bank_accounts::apply_transaction)
        .service(bank_accounts::list_transactions)
        .service(bank_accounts::get_transaction);
}
