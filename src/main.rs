mod config;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use crate::config::Config;
use crate::middleware::RequestLogging;
use crate::routes::app_routes;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use chrono::Local;
use log::info;
use std::error::Error;
use std::io;
use std::io::Write;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 初始化日志
    let mut log_builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    log_builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S %:z"),
                record.level(),
                record.args()
            )
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e)) // 转换为 io::Result
        })
        .init();

    // 加载并验证配置
    let config = Config::from_env()?;
    config.validate()?;
    let bind_address = config.bind_address();
    let workers = config.server.workers;
    let cookie_name = config.session.cookie_name.clone();

    let app_state = web::Data::new(AppState::new(config));

    // 后台定期清理过期Session
    let sweeper_sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = sweeper_sessions.purge_expired().await;
            if purged > 0 {
                log::debug!("Purged {} expired sessions", purged);
            }
        }
    });

    info!("DocEngine listening on {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(RequestLogging::new(cookie_name.clone()))
            .service(app_routes())
    })
    .bind(&bind_address)?;

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server.run().await?;
    Ok(())
}
