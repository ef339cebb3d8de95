use crate::config::AppConfig;
use crate::db::{DocumentStore, PgDocumentStore};
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::storage::{MediaStore, Storage};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DocumentStore>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Acquires the store and media clients. Pair with [`AppState::shutdown`].
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgDocumentStore::connect(&config.database_url).await?;
        if let Err(e) = db.migrate().await {
            warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }

        let media = Arc::new(Storage::new(&config.media).await?) as Arc<dyn MediaStore>;

        let mailer = Self::mailer(&config)?;

        Ok(Self::from_parts(Arc::new(db), media, mailer, config))
    }

    /// SMTP when configured. Production refuses to start without it; dev
    /// falls back to a mailer that drops everything.
    fn mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn Mailer>> {
        match &config.smtp {
            Some(smtp) => {
                info!(host = %smtp.host, port = smtp.port, "smtp mailer enabled");
                Ok(Arc::new(SmtpMailer::new(smtp)?))
            }
            None if config.production => {
                anyhow::bail!("SMTP_HOST must be set when APP_ENV=production")
            }
            None => {
                warn!("SMTP_HOST not set; outgoing mail is disabled");
                Ok(Arc::new(LogMailer))
            }
        }
    }

    pub fn from_parts(
        db: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStore>,
        mailer: Arc<dyn Mailer>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            media,
            mailer,
            config,
        }
    }

    pub async fn shutdown(&self) {
        self.db.close().await;
        info!("document store closed");
    }
}
