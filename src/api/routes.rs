//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ListFilter, Month, RequestContext, Subscription};
use crate::error::AppError;
use crate::handlers::{
    AggregateCostHandler, AggregateCostQuery, CreateSubscriptionCommand, SubscriptionHandler,
    UpdateSubscriptionCommand,
};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

/// Body of create and replace requests.
///
/// Ids and months arrive as strings so malformed values are reported through
/// the regular JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SubscriptionRequest {
    fn into_create_command(self) -> Result<CreateSubscriptionCommand, AppError> {
        let user_id = parse_uuid("user_id", &self.user_id)?;
        let start_date = parse_month("start_date", &self.start_date)?;
        let end_date = parse_optional_month("end_date", self.end_date)?;

        let command =
            CreateSubscriptionCommand::new(self.service_name, self.price, user_id, start_date);
        Ok(match end_date {
            Some(end_date) => command.with_end_date(end_date),
            None => command,
        })
    }

    fn into_update_command(self, id: Uuid) -> Result<UpdateSubscriptionCommand, AppError> {
        let user_id = parse_uuid("user_id", &self.user_id)?;
        let start_date = parse_month("start_date", &self.start_date)?;
        let end_date = parse_optional_month("end_date", self.end_date)?;

        let command =
            UpdateSubscriptionCommand::new(id, self.service_name, self.price, user_id, start_date);
        Ok(match end_date {
            Some(end_date) => command.with_end_date(end_date),
            None => command,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: Month,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Month>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: subscription.price,
            user_id: subscription.user_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AggregateQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub total: i64,
}

// =========================================================================
// Parameter parsing
// =========================================================================

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidRequest(format!("invalid {}", field)))
}

fn parse_month(field: &str, raw: &str) -> Result<Month, AppError> {
    raw.trim().parse::<Month>().map_err(|_| {
        AppError::InvalidRequest(format!("invalid {} format, expected MM-YYYY", field))
    })
}

fn parse_optional_month(field: &str, raw: Option<String>) -> Result<Option<Month>, AppError> {
    non_empty(raw)
        .map(|value| parse_month(field, &value))
        .transpose()
}

/// Query parameters sent empty are treated as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(create_subscription))
        .route("/subscriptions", get(list_subscriptions))
        // Static segment, matched ahead of `:id`
        .route("/subscriptions/aggregate", get(aggregate_cost))
        .route("/subscriptions/:id", get(get_subscription))
        .route("/subscriptions/:id", put(update_subscription))
        .route("/subscriptions/:id", delete(delete_subscription))
}

// =========================================================================
// POST /subscriptions
// =========================================================================

async fn create_subscription(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let command = json_body(payload)?.into_create_command()?;

    let handler = SubscriptionHandler::new(state.repository);
    let created = handler.create(command, &context).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

// =========================================================================
// GET /subscriptions
// =========================================================================

async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let mut filter = ListFilter::new();
    if let Some(user_id) = non_empty(query.user_id) {
        filter = filter.with_user(parse_uuid("user_id", &user_id)?);
    }
    if let Some(service_name) = non_empty(query.service_name) {
        filter = filter.with_service_name(service_name);
    }

    let handler = SubscriptionHandler::new(state.repository);
    let subscriptions = handler.list(&filter).await?;

    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

// =========================================================================
// GET /subscriptions/aggregate
// =========================================================================

async fn aggregate_cost(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<AggregateResponse>, AppError> {
    let from = non_empty(query.from)
        .ok_or_else(|| AppError::InvalidRequest("from is required".to_string()))?;
    let to = non_empty(query.to)
        .ok_or_else(|| AppError::InvalidRequest("to is required".to_string()))?;

    let mut cost_query = AggregateCostQuery::new(parse_month("from", &from)?, parse_month("to", &to)?);
    if let Some(user_id) = non_empty(query.user_id) {
        cost_query = cost_query.with_user(parse_uuid("user_id", &user_id)?);
    }
    if let Some(service_name) = non_empty(query.service_name) {
        cost_query = cost_query.with_service_name(service_name);
    }

    let handler = AggregateCostHandler::new(state.repository);
    let result = handler.execute(cost_query, &context).await?;

    Ok(Json(AggregateResponse {
        total: result.total,
    }))
}

// =========================================================================
// GET /subscriptions/:id
// =========================================================================

async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let id = parse_uuid("id", &id)?;

    let handler = SubscriptionHandler::new(state.repository);
    let subscription = handler.get(id).await?;

    Ok(Json(subscription.into()))
}

// =========================================================================
// PUT /subscriptions/:id
// =========================================================================

async fn update_subscription(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let id = parse_uuid("id", &id)?;
    let command = json_body(payload)?.into_update_command(id)?;

    let handler = SubscriptionHandler::new(state.repository);
    let updated = handler.update(command, &context).await?;

    Ok(Json(updated.into()))
}

// =========================================================================
// DELETE /subscriptions/:id
// =========================================================================

async fn delete_subscription(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_uuid("id", &id)?;

    let handler = SubscriptionHandler::new(state.repository);
    handler.delete(id, &context).await?;

    Ok(StatusCode::NO_CONTENT)
}
