use chrono::{DateTime, Days, NaiveTime, Utc};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

use crate::{config::SmtpConfig, db::DbPool};

/// One reminder: a passenger, their destination city and when they depart.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReminderRow {
    pub email: String,
    pub city: String,
    pub departure: DateTime<Utc>,
}

/// Spawn the daily departure-reminder loop. Runs at midnight UTC; each run
/// mails every passenger whose flight departs the following day. Sends are
/// fire-and-forget: a failure is logged and the row skipped.
pub fn spawn_reminder_task(pool: DbPool, smtp: SmtpConfig) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("departure reminder task started");
        loop {
            tokio::time::sleep(until_next_midnight(Utc::now())).await;
            match send_departure_reminders(&pool, &smtp).await {
                Ok(sent) => tracing::info!(sent, "departure reminders sent"),
                Err(err) => tracing::error!(error = %err, "reminder run failed"),
            }
        }
    })
}

pub fn until_next_midnight(now: DateTime<Utc>) -> Duration {
    let next = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or(now);
    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}

/// Query tomorrow's departures and mail each ticket holder.
pub async fn send_departure_reminders(pool: &DbPool, smtp: &SmtpConfig) -> anyhow::Result<usize> {
    let from = Utc::now() + chrono::Duration::days(1);
    let to = from + chrono::Duration::days(1);

    let rows: Vec<ReminderRow> = sqlx::query_as(
        r#"
        SELECT u.email, r.city, f.departure
        FROM tickets t
        JOIN flights f ON f.id = t.flight_id
        JOIN routes r ON r.id = f.destination_id
        JOIN users u ON u.id = t.booked_by
        WHERE f.departure >= $1 AND f.departure <= $2
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(0);
    }

    // SMTP transport is blocking; run the whole batch off the runtime.
    let smtp = smtp.clone();
    let sent = tokio::task::spawn_blocking(move || {
        let mut sent = 0;
        for row in &rows {
            match send_reminder(&smtp, row) {
                Ok(()) => sent += 1,
                Err(err) => {
                    tracing::warn!(error = %err, to = %row.email, "reminder send failed");
                }
            }
        }
        sent
    })
    .await?;

    Ok(sent)
}

pub fn reminder_body(city: &str, departure: DateTime<Utc>) -> String {
    let date = departure.format("%d %b, %Y");
    let time = departure.format("%I.%M %p");
    format!("Hi! Your flight to {city} on {date} at {time} is almost here!")
}

fn send_reminder(smtp: &SmtpConfig, row: &ReminderRow) -> anyhow::Result<()> {
    let message = Message::builder()
        .from(smtp.from.parse()?)
        .to(row.email.parse()?)
        .subject("Your flight is almost here")
        .header(ContentType::TEXT_PLAIN)
        .body(reminder_body(&row.city, row.departure))?;

    let transport = SmtpTransport::relay(&smtp.server)?
        .port(smtp.port)
        .credentials(Credentials::new(
            smtp.username.clone(),
            smtp.password.clone(),
        ))
        .build();

    transport.send(&message)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reminder_body_names_city_date_and_time() {
        let departure = Utc.with_ymd_and_hms(2026, 9, 14, 15, 30, 0).unwrap();
        let body = reminder_body("Nairobi", departure);
        assert_eq!(
            body,
            "Hi! Your flight to Nairobi on 14 Sep, 2026 at 03.30 PM is almost here!"
        );
    }

    #[test]
    fn next_run_is_at_most_a_day_away() {
        let now = Utc.with_ymd_and_hms(2026, 9, 14, 15, 30, 0).unwrap();
        let wait = until_next_midnight(now);
        assert_eq!(wait, Duration::from_secs(8 * 3600 + 30 * 60));

        let almost_midnight = Utc.with_ymd_and_hms(2026, 9, 14, 23, 59, 59).unwrap();
        assert_eq!(until_next_midnight(almost_midnight), Duration::from_secs(1));
    }
}
