use actix_web::{App, HttpServer, web};

use crate::config::STORAGE_DIR;
use crate::storage::FilesStorage;

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod lifecycle;
mod models;
mod pagination;
mod repositories;
mod requests;
mod schema;
mod storage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    dotenv::dotenv().ok();

    let pool = database::create_pool();
    let storage = FilesStorage::new(STORAGE_DIR);
    storage.ensure_root_exists()?;

    let bind_addr = config::bind_addr();
    log::info!("listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .service(
                web::scope("/files")
                    .route(
                        "/download/{path:.*}",
                        web::get().to(handlers::files::download_file),
                    )
                    .route(
                        "/versions/download/{filename}",
                        web::get().to(handlers::versions::download_version),
                    ),
            )
            .service(
                web::scope("/admin")
                    .route("/upload", web::post().to(handlers::files::upload_file))
                    .route("/folders", web::get().to(handlers::folders::list_folders))
                    .route("/folders", web::post().to(handlers::folders::create_folder))
                    .route(
                        "/folders",
                        web::delete().to(handlers::folders::delete_folder),
                    )
                    .route("/dashboard", web::get().to(handlers::dashboard::dashboard))
                    .route("/files", web::get().to(handlers::files::list_files))
                    .route(
                        "/files/archived",
                        web::get().to(handlers::files::list_archived),
                    )
                    .route("/files/trash", web::get().to(handlers::files::list_trash))
                    .route("/files/{id}", web::get().to(handlers::files::get_file))
                    .route(
                        "/files/{id}",
                        web::put().to(handlers::files::update_primary_file),
                    )
                    .route(
                        "/files/{id}/archive",
                        web::post().to(handlers::lifecycle::archive_file),
                    )
                    .route(
                        "/files/{id}/admin-archive",
                        web::post().to(handlers::lifecycle::admin_archive_file),
                    )
                    .route(
                        "/files/{id}/trash",
                        web::post().to(handlers::lifecycle::trash_file),
                    )
                    .route(
                        "/files/{id}/restore",
                        web::post().to(handlers::lifecycle::restore_file),
                    )
                    .route(
                        "/files/{id}/versions",
                        web::post().to(handlers::versions::create_version),
                    )
                    .route(
                        "/unarchive/{id}",
                        web::post().to(handlers::lifecycle::unarchive),
                    )
                    .route(
                        "/versions/{id}",
                        web::get().to(handlers::versions::get_version),
                    )
                    .route(
                        "/versions/{id}",
                        web::put().to(handlers::versions::update_version),
                    )
                    .route(
                        "/versions/{id}/archive",
                        web::post().to(handlers::lifecycle::archive_version),
                    )
                    .route(
                        "/versions/{id}/unarchive",
                        web::post().to(handlers::lifecycle::unarchive_version),
                    )
                    .route(
                        "/versions/{id}/restore",
                        web::post().to(handlers::lifecycle::restore_version),
                    )
                    .route(
                        "/versions/{id}/trash",
                        web::post().to(handlers::lifecycle::trash_version),
                    ),
            )
            .service(web::scope("/staff").route(
                "/requests",
                web::get().to(handlers::file_requests::list_requests),
            ))
    })
    .bind(bind_addr)?
    .run()
    .await
}
