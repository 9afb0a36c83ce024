//! HTTP inbound adapter exposing the REST endpoints.

pub mod congregations;
pub mod error;
pub mod features;
pub mod health;
pub mod state;
pub mod territories;
pub mod users;

pub use error::ApiResult;
pub use state::HttpState;

use actix_web::web;

/// Register all `/api/v1` routes on the given service config.
pub fn configure_api(config: &mut web::ServiceConfig) {
    config.service(
        web::scope("/api/v1")
            .service(territories::list_territories)
            .service(territories::create_territory)
            .service(territories::assign_territory)
            .service(territories::return_territory)
            .service(territories::complete_territory)
            .service(territories::get_territory)
            .service(territories::update_territory)
            .service(territories::delete_territory)
            .service(congregations::list_congregations)
            .service(congregations::create_congregation)
            .service(congregations::get_congregation)
            .service(congregations::update_congregation)
            .service(congregations::delete_congregation)
            .service(users::list_users),
    );
}
