use crate::{
    api::{
        admin_auth, attendance, careers, contacts, documents, education, employee_admin,
        employee_auth, handbook, leave, products, profile, resources, tasks, team,
    },
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{http::Method, web, HttpRequest, HttpResponse};
use serde_json::json;

// Preflight requests are answered inline so browser clients never see a 405.
async fn options_ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn site_method_fallback() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": false, "error": "Method not allowed" }))
}

async fn employee_login_method_fallback() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": false, "error": "Method not allowed." }))
}

async fn portal_method_fallback(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": false,
        "error": format!("Method {} not allowed.", req.method())
    }))
}

async fn tasks_method_fallback(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": false,
        "error": format!("Method {} not allowed for employees on this resource.", req.method())
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
            // Public site
            .service(
                web::resource("/contacts")
                    .route(web::get().to(contacts::list_contacts))
                    .route(web::post().to(contacts::submit_contact))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            .service(
                web::resource("/team")
                    .route(web::get().to(team::list_team))
                    .route(web::post().to(team::add_team_member))
                    .route(web::delete().to(team::delete_team_member))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            .service(
                web::resource("/careers")
                    .route(web::get().to(careers::list_careers))
                    .route(web::post().to(careers::add_career))
                    .route(web::put().to(careers::update_career))
                    .route(web::delete().to(careers::delete_career))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            .service(
                web::resource("/products")
                    .route(web::get().to(products::list_products))
                    .route(web::post().to(products::add_product))
                    .route(web::delete().to(products::delete_product))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            .service(
                web::resource("/resources")
                    .route(web::get().to(resources::list_resources))
                    .route(web::post().to(resources::add_resource))
                    .route(web::put().to(resources::update_resource))
                    .route(web::delete().to(resources::delete_resource))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            // Admin portal
            .service(
                web::resource("/auth/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(admin_auth::admin_login))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(site_method_fallback)),
            )
            .service(
                web::resource("/employees")
                    .route(web::get().to(employee_admin::list_employees))
                    .route(web::post().to(employee_admin::create_employee))
                    .route(web::put().to(employee_admin::update_employee))
                    .route(web::delete().to(employee_admin::delete_employee))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(portal_method_fallback)),
            )
            // Employee portal
            .service(
                web::scope("/employee")
                    .service(
                        web::resource("/login")
                            .wrap(build_limiter(config.rate_login_per_min))
                            .route(web::post().to(employee_auth::employee_login))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(employee_login_method_fallback)),
                    )
                    .service(
                        web::resource("/profile")
                            .route(web::get().to(profile::get_profile))
                            .route(web::put().to(profile::update_profile))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(portal_method_fallback)),
                    )
                    .service(
                        web::resource("/education")
                            .route(web::get().to(education::list_education))
                            .route(web::post().to(education::add_education))
                            .route(web::put().to(education::update_education))
                            .route(web::delete().to(education::delete_education))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(portal_method_fallback)),
                    )
                    .service(
                        web::resource("/documents")
                            .route(web::get().to(documents::list_documents))
                            .route(web::post().to(documents::upload_document))
                            .route(web::delete().to(documents::delete_document))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(portal_method_fallback)),
                    )
                    .service(
                        web::resource("/leave")
                            .route(web::get().to(leave::list_leave))
                            .route(web::post().to(leave::submit_leave))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(portal_method_fallback)),
                    )
                    .service(
                        web::resource("/tasks")
                            .route(web::get().to(tasks::list_tasks))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(tasks_method_fallback)),
                    )
                    .service(
                        web::resource("/attendance")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::post().to(attendance::punch_attendance))
                            .route(web::method(Method::OPTIONS).to(options_ok))
                            .default_service(web::route().to(portal_method_fallback)),
                    ),
            )
            .service(
                web::resource("/handbook")
                    .route(web::get().to(handbook::get_handbook))
                    .route(web::post().to(handbook::upload_handbook))
                    .route(web::delete().to(handbook::delete_handbook))
                    .route(web::method(Method::OPTIONS).to(options_ok))
                    .default_service(web::route().to(portal_method_fallback)),
            ),
    );
}

// /api
//  ├─ /contacts /team /careers /products /resources   (site content)
//  ├─ /auth/login                                     (admin portal)
//  ├─ /employees                                      (admin employee CRUD)
//  ├─ /employee/{login,profile,education,documents,
//  │             leave,tasks,attendance}              (employee portal)
//  └─ /handbook                                       (shared document)
