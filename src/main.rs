use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use tokio::sync::Mutex;

use expense_splitter::api::{self, ShareSettings};
use expense_splitter::{logger, Clipboard, CommandClipboard, Config, FileStore, Session};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::parse();
    logger::init_logger(config.verbose);
    tracing::debug!("Config: {:?}", config);

    tracing::info!("Using the following data directory: {}", config.data_dir);
    let mut session = Session::new(FileStore::new(&config.data_dir));
    session.initialize(config.token.as_deref());

    let session = web::Data::new(Mutex::new(session));
    let settings = web::Data::new(ShareSettings {
        public_url: config.public_url.clone(),
    });
    let clipboard: Arc<dyn Clipboard> =
        Arc::new(CommandClipboard::new(config.clipboard_command.as_deref()));
    let clipboard = web::Data::from(clipboard);

    tracing::info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(session.clone())
            .app_data(settings.clone())
            .app_data(clipboard.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
