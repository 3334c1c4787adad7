// src/api/handlers/mod.rs
pub mod documents;
pub mod face;
pub mod session;

use actix_web::{web, Scope};

/// All verification routes hang off one session scope so the resource
/// patterns (`/{id}` vs `/{id}/documents`) are matched together.
pub fn scope() -> Scope {
    web::scope("/api/session")
        .service(web::resource("").route(web::post().to(session::start_session)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(session::get_session))
                .route(web::delete().to(session::restart_session)),
        )
        .service(web::resource("/{id}/documents").route(web::post().to(documents::submit_documents)))
        .service(web::resource("/{id}/face").route(web::post().to(face::submit_face)))
}
