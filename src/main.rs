use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use til_backend::{
    config::Config,
    database::{SeaOrmAttemptStore, create_pool, run_migrations},
    external::build_sms_sender,
    handlers,
    middlewares::create_cors,
    services::{VerificationPolicy, VerificationService},
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let sms_sender = build_sms_sender(&config.sms).map_err(std::io::Error::other)?;

    let verification_service = VerificationService::new(
        sms_sender,
        Arc::new(SeaOrmAttemptStore::new(pool.clone())),
        VerificationPolicy {
            consume_on_success: config.verification.consume_on_success,
            app_name: config.sms.app_name.clone(),
        },
    );

    tasks::spawn_all(verification_service.clone(), config.verification.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(verification_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::verification_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
