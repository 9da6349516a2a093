use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pifloor::{
    api,
    auth::hash_password,
    config::{AdminBootstrap, Config},
    db::Database,
    state::AppState,
};

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{context}: {err}"))
}

// Make sure the configured admin account exists so a fresh database can be managed
async fn ensure_bootstrap_admin(
    db: &Database,
    admin: &AdminBootstrap,
    bcrypt_cost: u32,
) -> std::io::Result<()> {
    let email = admin.email.to_lowercase();
    let existing = db
        .find_user_conflict(&admin.username, &email)
        .await
        .map_err(|e| io_error("Failed looking up bootstrap admin", e))?;
    if existing.is_some() {
        info!("[DB] Bootstrap admin '{}' already present", admin.username);
        return Ok(());
    }

    let password_hash = hash_password(&admin.password, bcrypt_cost)
        .map_err(|e| io_error("Failed hashing bootstrap admin password", e))?;
    let user = db
        .insert_user(&admin.username, &email, &password_hash, &admin.username, true)
        .await
        .map_err(|e| io_error("Failed creating bootstrap admin", e))?;
    info!("[DB] Bootstrap admin created with id {}", user.id);
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().map_err(|e| io_error("Invalid configuration", e))?;

    // Initialize the database
    let db = Database::new(&config.database_path)
        .map_err(|e| io_error("Failed opening database", e))?;
    db.create_schema()
        .await
        .map_err(|e| io_error("Failed creating schema", e))?;
    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&db, admin, config.bcrypt_cost).await?;
    }

    let addr = (config.host.clone(), config.port);
    let frontend_url = config.frontend_url.clone();
    let static_dir = config.static_dir.clone();
    let state = web::Data::new(AppState::new(db, config));
    info!("listening on http://{}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::HeaderName::from_static("x-requested-with"),
            ])
            .supports_credentials()
            .max_age(3600);

        let app = App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(api::configure);

        // Serve the built frontend after the API routes
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind(addr)?
    .run()
    .await
}
