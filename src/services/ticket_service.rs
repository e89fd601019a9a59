use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    cache::ticket_list_key,
    dto::tickets::{BookTicketRequest, TicketList},
    entity::tickets::{ActiveModel, Column, Entity as Tickets, Model as TicketModel},
    entity::Flights,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Ticket,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Book a seat for the actor. The flight row is locked while existing
/// tickets are counted against capacity, so concurrent bookings cannot
/// oversell a flight.
pub async fn book_ticket(
    state: &AppState,
    user: &AuthUser,
    payload: BookTicketRequest,
    payment_method: &str,
) -> AppResult<ApiResponse<Ticket>> {
    let txn = state.orm.begin().await?;

    let flight = Flights::find_by_id(payload.flight_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let flight = match flight {
        Some(f) => f,
        None => return Err(AppError::NotFound),
    };

    let booked = Tickets::find()
        .filter(Column::FlightId.eq(flight.id))
        .count(&txn)
        .await?;
    if booked >= flight.capacity as u64 {
        return Err(AppError::Conflict("Flight is fully booked.".into()));
    }

    let paid = state.payment.charge(payment_method, flight.price_cents)?;

    let ticket = ActiveModel {
        id: Set(Uuid::new_v4()),
        flight_id: Set(flight.id),
        booked_by: Set(user.user_id),
        paid: Set(paid),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(ticket_id = %ticket.id, flight_id = %flight.id, paid, "ticket booked");

    Ok(ApiResponse::success(
        "Ticket successfully booked.",
        ticket_from_entity(ticket),
        Some(Meta::empty()),
    ))
}

/// List a user's tickets, consulting the memo cache when the caller opted
/// in. Cached entries may lag the ledger by up to the cache TTL.
pub async fn list_for_user(
    state: &AppState,
    user_id: Uuid,
    use_cache: bool,
) -> AppResult<ApiResponse<TicketList>> {
    let key = ticket_list_key(user_id);

    if use_cache {
        if let Some(tickets) = state.cache.get_json::<Vec<Ticket>>(&key).await {
            let total = tickets.len() as i64;
            return Ok(ApiResponse::success(
                "Tickets",
                TicketList { tickets },
                Some(Meta::new(1, total, total)),
            ));
        }
    }

    let tickets: Vec<Ticket> = Tickets::find()
        .filter(Column::BookedBy.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ticket_from_entity)
        .collect();

    if !tickets.is_empty() {
        state.cache.put_json(&key, &tickets).await;
    }

    let total = tickets.len() as i64;
    Ok(ApiResponse::success(
        "Tickets",
        TicketList { tickets },
        Some(Meta::new(1, total, total)),
    ))
}

/// Cancel a booking. Only the ticket's owner or an admin may cancel; the
/// row is deleted, so a cancelled ticket is not observable afterwards.
pub async fn cancel_ticket(
    state: &AppState,
    user: &AuthUser,
    ticket_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let ticket = Tickets::find_by_id(ticket_id).one(&state.orm).await?;
    let ticket = match ticket {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    if ticket.booked_by != user.user_id && !user.is_admin {
        return Err(AppError::Forbidden);
    }

    Tickets::delete_by_id(ticket_id).exec(&state.orm).await?;

    tracing::info!(ticket_id = %ticket_id, "ticket cancelled");

    Ok(ApiResponse::success(
        "Ticket successfully cancelled.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn ticket_from_entity(model: TicketModel) -> Ticket {
    Ticket {
        id: model.id,
        flight_id: model.flight_id,
        booked_by: model.booked_by,
        paid: model.paid,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
