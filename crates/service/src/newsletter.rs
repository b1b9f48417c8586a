//! Newsletter subscriptions and the email fan-out that runs after an
//! animal is published.

use std::sync::atomic::{AtomicBool, Ordering};

use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};
use uuid::Uuid;

use models::newsletter;

use crate::errors::ServiceError;

/// Process-wide "is outbound email configured" flag, set once at startup
/// after the SMTP connection has been verified.
static EMAIL_READY: AtomicBool = AtomicBool::new(false);

pub fn set_email_ready(ready: bool) {
    EMAIL_READY.store(ready, Ordering::Relaxed);
}

pub fn email_ready() -> bool {
    EMAIL_READY.load(Ordering::Relaxed)
}

pub async fn subscriptions(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<newsletter::Model>, ServiceError> {
    Ok(newsletter::active_by_user(db, user_id).await?)
}

/// Replace the user's active set with exactly the given species.
/// Deactivate-then-upsert makes the operation idempotent: submitting the
/// same list twice leaves the same active rows behind.
pub async fn update_subscriptions(
    db: &DatabaseConnection,
    user_id: Uuid,
    species: &[String],
) -> Result<(), ServiceError> {
    newsletter::deactivate_all(db, user_id).await?;
    for s in species {
        if s.trim().is_empty() {
            continue;
        }
        newsletter::upsert_active(db, user_id, s).await?;
    }
    Ok(())
}

/// SMTP mailer for newsletter dispatch.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn from_config(cfg: &configs::EmailConfig) -> Result<Self, ServiceError> {
        if !cfg.is_configured() {
            return Err(ServiceError::Validation(
                "email configuration missing (smtp_relay/address/password)".into(),
            ));
        }
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_relay)
            .map_err(|e| ServiceError::Validation(format!("smtp relay not valid: {e}")))?
            .credentials(Credentials::new(cfg.address.clone(), cfg.password.clone()))
            .build();
        let from = format!("{} <{}>", cfg.sender_name, cfg.address);
        Ok(Self { transport, from })
    }

    /// Probe the relay once; the result feeds the process-wide flag.
    pub async fn verify(&self) -> bool {
        match self.transport.test_connection().await {
            Ok(true) => true,
            Ok(false) => {
                warn!("smtp relay refused the connection test");
                false
            }
            Err(e) => {
                warn!(error = %e, "smtp connection test failed");
                false
            }
        }
    }

    pub async fn send_html(&self, to: &str, subject: &str, body: String) -> Result<(), ServiceError> {
        let email = Message::builder()
            .from(self.from.parse().map_err(|e| ServiceError::Validation(format!("bad sender address: {e}")))?)
            .to(to.parse().map_err(|e| ServiceError::Validation(format!("bad recipient address: {e}")))?)
            .subject(subject)
            .singlepart(SinglePart::html(body))
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        self.transport
            .send(email)
            .await
            .map_err(|e| ServiceError::Io(e.to_string()))?;
        Ok(())
    }
}

fn announcement_body(animal: &models::animal::Model) -> String {
    format!(
        "<h2>A new {species} has been added to Pet Adoption!</h2>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Breed:</strong> {breed}</p>\
         <p><strong>Age:</strong> {age}</p>\
         <p><a href=\"http://localhost:8080/Home/Home.html\">View on Pet Adoption</a></p>\
         <hr>\
         <p>You received this email because you subscribed to {species} notifications. \
         To update your preferences, visit your \
         <a href=\"http://localhost:8080/Newsletter/Newsletter.html\">Newsletter settings</a>.</p>",
        species = animal.species,
        name = animal.name,
        breed = animal.breed,
        age = animal.age,
    )
}

/// Email every active subscriber of the new animal's species. All failures
/// are logged and swallowed; announcing must never fail the publish flow.
pub async fn announce_animal(db: &DatabaseConnection, mailer: &Mailer, animal_id: Uuid) {
    if !email_ready() {
        warn!("cannot send newsletter emails: email configuration is invalid");
        return;
    }

    let animal = match models::animal::find_by_id(db, animal_id).await {
        Ok(Some(a)) => a,
        Ok(None) => return,
        Err(e) => {
            error!(%animal_id, error = %e, "could not load animal for newsletter");
            return;
        }
    };

    let subscribers = match newsletter::active_subscribers_by_species(db, &animal.species).await {
        Ok(s) => s,
        Err(e) => {
            error!(species = %animal.species, error = %e, "could not load subscribers");
            return;
        }
    };
    if subscribers.is_empty() {
        return;
    }

    let subject = format!("New {} Added: {}", animal.species, animal.name);
    let body = announcement_body(&animal);
    let mut sent = 0usize;
    for subscriber in &subscribers {
        match mailer.send_html(&subscriber.email, &subject, body.clone()).await {
            Ok(()) => sent += 1,
            Err(e) => error!(to = %subscriber.email, error = %e, "newsletter email failed"),
        }
    }
    info!(species = %animal.species, sent, total = subscribers.len(), "newsletter emails dispatched");
}
