use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::flights::{CreateFlightRequest, DepartureWindowQuery, FlightList, RoutePairQuery},
    entity::flights::{ActiveModel, Column, Entity as Flights, Model as FlightModel},
    entity::routes::Entity as Routes,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Flight,
    response::{ApiResponse, Meta},
    state::AppState,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_WINDOW_DAYS: u64 = 7;

pub fn validate_flight(payload: &CreateFlightRequest) -> Result<(), AppError> {
    if payload.origin == payload.destination {
        return Err(AppError::Validation(
            "Origin and destination must differ".into(),
        ));
    }
    if payload.arrival <= payload.departure {
        return Err(AppError::Validation(
            "Arrival must be after departure".into(),
        ));
    }
    if payload.price_cents <= 0 {
        return Err(AppError::Validation("Price must be positive".into()));
    }
    if payload.capacity <= 0 {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }
    Ok(())
}

pub async fn create_flight(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFlightRequest,
) -> AppResult<ApiResponse<Flight>> {
    ensure_admin(user)?;
    validate_flight(&payload)?;

    for route_id in [payload.origin, payload.destination] {
        if Routes::find_by_id(route_id).one(&state.orm).await?.is_none() {
            return Err(AppError::NotFound);
        }
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        origin_id: Set(payload.origin),
        destination_id: Set(payload.destination),
        departure: Set(payload.departure.into()),
        arrival: Set(payload.arrival.into()),
        price_cents: Set(payload.price_cents),
        capacity: Set(payload.capacity),
        created_at: NotSet,
    };
    let flight = active.insert(&state.orm).await?;

    tracing::info!(flight_id = %flight.id, "flight created");

    Ok(ApiResponse::success(
        "Flight created.",
        flight_from_entity(flight),
        Some(Meta::empty()),
    ))
}

/// Resolve the departure window. Bounds are `YYYY-MM-DD` days, both
/// inclusive; when absent the window is `today` through `today + 7 days`.
pub fn resolve_window(
    query: &DepartureWindowQuery,
    today: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let from = match query.from.as_deref() {
        Some(raw) => parse_day(raw)?,
        None => today,
    };
    let to = match query.to.as_deref() {
        Some(raw) => parse_day(raw)?,
        None => from
            .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
            .ok_or_else(|| AppError::Validation("Date out of range".into()))?,
    };

    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Validation("Date out of range".into()))?
        .and_time(NaiveTime::MIN)
        .and_utc();
    Ok((start, end))
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "Could not parse date '{raw}': expected format YYYY-MM-DD"
        ))
    })
}

pub async fn list_flights(
    state: &AppState,
    query: DepartureWindowQuery,
) -> AppResult<ApiResponse<FlightList>> {
    let (start, end) = resolve_window(&query, Utc::now().date_naive())?;

    let condition = Condition::all()
        .add(Column::Departure.gte(start))
        .add(Column::Departure.lt(end));

    find_flights(state, condition).await
}

pub async fn list_by_route(
    state: &AppState,
    query: RoutePairQuery,
) -> AppResult<ApiResponse<FlightList>> {
    let condition = Condition::all()
        .add(Column::OriginId.eq(query.origin))
        .add(Column::DestinationId.eq(query.destination));
    find_flights(state, condition).await
}

pub async fn list_by_origin(state: &AppState, origin: Uuid) -> AppResult<ApiResponse<FlightList>> {
    find_flights(state, Condition::all().add(Column::OriginId.eq(origin))).await
}

pub async fn list_by_destination(
    state: &AppState,
    destination: Uuid,
) -> AppResult<ApiResponse<FlightList>> {
    find_flights(
        state,
        Condition::all().add(Column::DestinationId.eq(destination)),
    )
    .await
}

async fn find_flights(state: &AppState, condition: Condition) -> AppResult<ApiResponse<FlightList>> {
    let flights: Vec<Flight> = Flights::find()
        .filter(condition)
        .order_by_asc(Column::Departure)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(flight_from_entity)
        .collect();

    let total = flights.len() as i64;
    let meta = Meta::new(1, total, total);
    Ok(ApiResponse::success(
        "Flights",
        FlightList { flights },
        Some(meta),
    ))
}

fn flight_from_entity(model: FlightModel) -> Flight {
    Flight {
        id: model.id,
        origin_id: model.origin_id,
        destination_id: model.destination_id,
        departure: model.departure.with_timezone(&Utc),
        arrival: model.arrival.with_timezone(&Utc),
        price_cents: model.price_cents,
        capacity: model.capacity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_request() -> CreateFlightRequest {
        let departure = Utc::now() + Duration::days(2);
        CreateFlightRequest {
            origin: Uuid::new_v4(),
            destination: Uuid::new_v4(),
            departure,
            arrival: departure + Duration::hours(3),
            price_cents: 25_000,
            capacity: 180,
        }
    }

    #[test]
    fn valid_flight_passes() {
        assert!(validate_flight(&base_request()).is_ok());
    }

    #[test]
    fn same_origin_and_destination_is_rejected() {
        let mut req = base_request();
        req.destination = req.origin;
        assert!(matches!(
            validate_flight(&req),
            Err(AppError::Validation(msg)) if msg.contains("differ")
        ));
    }

    #[test]
    fn arrival_before_departure_is_rejected() {
        let mut req = base_request();
        req.arrival = req.departure - Duration::hours(1);
        assert!(validate_flight(&req).is_err());

        req.arrival = req.departure;
        assert!(validate_flight(&req).is_err());
    }

    #[test]
    fn non_positive_price_or_capacity_is_rejected() {
        let mut req = base_request();
        req.price_cents = 0;
        assert!(validate_flight(&req).is_err());

        let mut req = base_request();
        req.capacity = -1;
        assert!(validate_flight(&req).is_err());
    }

    #[test]
    fn window_defaults_to_seven_days_from_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = resolve_window(&DepartureWindowQuery::default(), today).unwrap();
        assert_eq!(start.date_naive(), today);
        // End bound is exclusive midnight after the last included day.
        assert_eq!(
            end.date_naive(),
            NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
        );
    }

    #[test]
    fn explicit_window_bounds_are_inclusive() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let query = DepartureWindowQuery {
            from: Some("2026-04-01".into()),
            to: Some("2026-04-02".into()),
        };
        let (start, end) = resolve_window(&query, today).unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2026, 4, 3).unwrap());
    }

    #[test]
    fn unparsable_date_names_the_expected_format() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let query = DepartureWindowQuery {
            from: Some("04/01/2026".into()),
            to: None,
        };
        let err = resolve_window(&query, today).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("YYYY-MM-DD")));
    }
}
