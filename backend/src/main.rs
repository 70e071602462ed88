//! Backend entry-point: schema evolution, adapter wiring, worker spawn,
//! and the REST listener.

mod server;

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::fanout::NotificationFanout;
use backend::domain::ports::{Mailer, PushGateway};
use backend::domain::schema_evolution::SchemaEvolver;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::mail::{LoggingMailer, MailConfig, SmtpMailer};
use backend::outbound::persistence::{
    DbPool, DieselBatchRepository, DieselCourseRepository, DieselDemoBookingRepository,
    DieselEvolutionStore, DieselInvoiceRepository, DieselNotificationRepository,
    DieselPushTokenRepository, DieselRecipientDirectory, DieselRecordRepositories,
    DieselUserRepository, PoolConfig,
};
use backend::outbound::push::FcmPushGateway;
use backend::outbound::queue::{notification_channel, spawn_fanout_worker};

use server::{ServerConfig, create_server};

/// Select the mail transport based on environment configuration.
fn build_mailer() -> Arc<dyn Mailer> {
    match MailConfig::from_env() {
        Some(config) => match SmtpMailer::new(&config) {
            Ok(mailer) => {
                info!(host = %config.host, from = %config.from_email, "smtp mail transport configured");
                Arc::new(mailer)
            }
            Err(err) => {
                warn!(error = %err, "smtp transport construction failed; email disabled");
                Arc::new(LoggingMailer)
            }
        },
        None => {
            info!("smtp environment not set; email degrades to logged no-ops");
            Arc::new(LoggingMailer)
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    // One dedicated connection for the whole evolution run; the shared pool
    // is only built afterwards, against the evolved schema.
    let mut store = DieselEvolutionStore::connect(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    let report = SchemaEvolver::new()
        .run(&mut store)
        .await
        .map_err(std::io::Error::other)?;
    drop(store);
    info!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "schema evolution finished"
    );
    for failure in &report.failed {
        warn!(step = failure.name, message = %failure.message, "evolution step failed");
    }

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let mailer = build_mailer();
    let push: Option<Arc<dyn PushGateway>> = match FcmPushGateway::from_env() {
        Some(gateway) => {
            info!("fcm push gateway configured");
            Some(Arc::new(gateway))
        }
        None => {
            info!("push credentials not set; push disabled for this process");
            None
        }
    };

    let fanout = Arc::new(NotificationFanout::new(
        Arc::new(DieselRecipientDirectory::new(pool.clone())),
        Arc::new(DieselNotificationRepository::new(pool.clone())),
        Arc::new(DieselPushTokenRepository::new(pool.clone())),
        mailer,
        push,
    ));
    let (queue, receiver) = notification_channel();
    let worker = spawn_fanout_worker(receiver, fanout);

    let records = Arc::new(DieselRecordRepositories::new(pool.clone()));
    let http_state = HttpState {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        courses: Arc::new(DieselCourseRepository::new(pool.clone())),
        batches: Arc::new(DieselBatchRepository::new(pool.clone())),
        invoices: Arc::new(DieselInvoiceRepository::new(pool.clone())),
        demo_bookings: Arc::new(DieselDemoBookingRepository::new(pool.clone())),
        notices: records.clone(),
        events: records.clone(),
        exam_grades: records.clone(),
        materials: records,
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        push_tokens: Arc::new(DieselPushTokenRepository::new(pool)),
        notifier: Arc::new(queue),
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config.bind_addr)?;
    let result = server.await;

    // The last queue sender dropped with the server, so the worker drains
    // whatever is still in flight and exits on its own.
    if let Err(err) = worker.await {
        warn!(error = %err, "fan-out worker did not shut down cleanly");
    }
    result
}
