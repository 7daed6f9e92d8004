pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_assembler::OrderAssembler;
use infrastructure::basket_repo::DieselBasketStore;
use infrastructure::catalog_repo::DieselCatalogStore;
use infrastructure::order_repo::DieselOrderStore;

pub use db::{create_pool, DbPool};

/// The assembler wired to its production (Diesel-backed) stores.
pub type AppAssembler = OrderAssembler<DieselBasketStore, DieselOrderStore>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let catalog = web::Data::new(DieselCatalogStore::new(pool.clone()));
        let baskets = web::Data::new(DieselBasketStore::new(pool.clone()));
        let assembler = web::Data::new(AppAssembler::new(
            DieselBasketStore::new(pool.clone()),
            DieselOrderStore::new(pool.clone()),
        ));

        App::new()
            .app_data(catalog)
            .app_data(baskets)
            .app_data(assembler)
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/products")
                            .route("", web::get().to(handlers::products::get_products))
                            .route("/{id}", web::get().to(handlers::products::get_product)),
                    )
                    .service(
                        web::scope("/basket")
                            .route("", web::get().to(handlers::basket::get_basket))
                            .route("", web::post().to(handlers::basket::add_item))
                            .route("", web::delete().to(handlers::basket::remove_item)),
                    )
                    .service(
                        web::scope("/orders")
                            .route("", web::post().to(handlers::orders::create_order))
                            .route("", web::get().to(handlers::orders::get_orders))
                            .route("/{id}", web::get().to(handlers::orders::get_order_details)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
