use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use utoipa::{IntoParams, ToSchema};

use uuid::Uuid;

use crate::billing;
use crate::domain::{CalendarMonth, Price, ServiceName};
use crate::error::{Error, Result};
use crate::model::{NewSubscription, Patch, Subscription, SubscriptionPatch};
use crate::repo::{CostFilter, SubscriptionRepo};

use super::{ErrorBody, RestError, RestResult};

/// JSON body for new subscriptions
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewSubscriptionBody {
    #[schema(example = "Yandex Plus")]
    service_name: String,
    /// Monthly price, never negative
    #[schema(example = 400, minimum = 0)]
    price: i32,
    user_id: Uuid,
    /// `MM-YYYY` or `YYYY-MM`
    #[schema(example = "07-2025")]
    start_date: String,
    /// Omitted or empty for an open-ended subscription
    #[serde(default)]
    #[schema(example = "12-2025")]
    end_date: Option<String>,
}

impl TryInto<NewSubscription> for NewSubscriptionBody {
    type Error = Error;

    fn try_into(self) -> Result<NewSubscription> {
        let end_date = match self.end_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse()?),
        };

        NewSubscription::new(
            self.service_name.parse()?,
            Price::try_from(self.price)?,
            self.user_id,
            self.start_date.parse()?,
            end_date,
        )
    }
}

/// JSON body for partial updates. An empty `end_date` clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSubscriptionBody {
    #[schema(example = "Yandex Plus")]
    service_name: Option<String>,
    #[schema(example = 450, minimum = 0)]
    price: Option<i32>,
    user_id: Option<Uuid>,
    #[schema(example = "2025-08")]
    start_date: Option<String>,
    #[schema(example = "")]
    end_date: Option<String>,
}

impl TryInto<SubscriptionPatch> for UpdateSubscriptionBody {
    type Error = Error;

    fn try_into(self) -> Result<SubscriptionPatch> {
        let end_date = match self.end_date.as_deref() {
            None => Patch::Unset,
            Some("") => Patch::Set(None),
            Some(raw) => Patch::Set(Some(raw.parse()?)),
        };

        Ok(SubscriptionPatch {
            service_name: self.service_name.map(|s| s.parse::<ServiceName>()).transpose()?.into(),
            price: self.price.map(Price::try_from).transpose()?.into(),
            user_id: self.user_id.into(),
            start_date: self.start_date.map(|s| s.parse::<CalendarMonth>()).transpose()?.into(),
            end_date,
        })
    }
}

/// Query string for the cost summary endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CostQueryParams {
    /// First month of the period (required), `YYYY-MM` or `MM-YYYY`
    #[param(example = "2025-01")]
    from: Option<String>,
    /// Last month of the period (required), inclusive
    #[param(example = "2025-12")]
    to: Option<String>,
    /// Only count this user's subscriptions
    user_id: Option<String>,
    /// Only count subscriptions with exactly this service name
    #[param(example = "Yandex Plus")]
    service_name: Option<String>,
}

/// Parsed cost summary request
#[derive(Debug, PartialEq)]
pub struct CostQuery {
    pub period_start: CalendarMonth,
    pub period_end: CalendarMonth,
    pub filter: CostFilter,
}

impl TryInto<CostQuery> for CostQueryParams {
    type Error = Error;

    fn try_into(self) -> Result<CostQuery> {
        let (Some(from), Some(to)) = (non_empty(self.from), non_empty(self.to)) else {
            return Err(Error::ParsingError(
                "from and to are required (format YYYY-MM or MM-YYYY)".into(),
            ));
        };

        let user_id = non_empty(self.user_id)
            .map(|raw| {
                // Clients sometimes send the UUID quoted
                let raw = raw.trim_matches(|c: char| c == '"' || c == ' ');
                Uuid::parse_str(raw).map_err(|_| Error::ParsingError("invalid user_id".into()))
            })
            .transpose()?;

        Ok(CostQuery {
            period_start: from.parse()?,
            period_end: to.parse()?,
            filter: CostFilter {
                user_id,
                service_name: non_empty(self.service_name),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedId {
    #[schema(example = 1)]
    pub id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionList {
    pub subscriptions: Vec<Subscription>,
}

/// Summed cost of the matching subscriptions
#[derive(Debug, Serialize, ToSchema)]
pub struct CostTotal {
    #[schema(example = 4800)]
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    #[schema(example = "updated")]
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create endpoint for new subscriptions
#[utoipa::path(
    post,
    path = "/api/subscriptions",
    tag = "subscriptions",
    request_body = NewSubscriptionBody,
    responses(
        (status = 201, description = "Subscription created", body = CreatedId),
        (status = 400, description = "Invalid subscription", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "Create a new subscription", skip(repo))]
#[post("")]
async fn create(
    repo: web::Data<dyn SubscriptionRepo>,
    body: web::Json<NewSubscriptionBody>,
) -> RestResult<impl Responder> {
    let new_subscription: NewSubscription = body.into_inner().try_into()?;

    let id = repo.insert(&new_subscription).await?;

    Ok(HttpResponse::Created().json(CreatedId { id }))
}

/// List every stored subscription
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = SubscriptionList),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "List subscriptions", skip(repo))]
#[get("")]
async fn list(repo: web::Data<dyn SubscriptionRepo>) -> RestResult<impl Responder> {
    let subscriptions = repo.fetch_all().await?;

    Ok(HttpResponse::Ok().json(SubscriptionList { subscriptions }))
}

/// Total subscription cost over a period of months
#[utoipa::path(
    get,
    path = "/api/subscriptions/sum",
    tag = "subscriptions",
    params(CostQueryParams),
    responses(
        (status = 200, description = "Prorated cost of every overlapping subscription", body = CostTotal),
        (status = 400, description = "Missing or malformed query", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "Sum subscription cost", skip(repo))]
#[get("/sum")]
async fn sum(
    repo: web::Data<dyn SubscriptionRepo>,
    query: web::Query<CostQueryParams>,
) -> RestResult<impl Responder> {
    let query: CostQuery = query.into_inner().try_into()?;

    let total = billing::sum_cost(
        repo.get_ref(),
        query.period_start,
        query.period_end,
        &query.filter,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CostTotal { total }))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "The subscription", body = Subscription),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No subscription with this id", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "Fetch a subscription by id", skip(repo))]
#[get("/{id}")]
async fn fetch(
    repo: web::Data<dyn SubscriptionRepo>,
    path: web::Path<(i32,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    let subscription = repo.fetch_by_id(id).await?.ok_or(Error::NotFound(id))?;

    Ok(HttpResponse::Ok().json(subscription))
}

/// Patch the given fields of a subscription, keeping the rest
#[utoipa::path(
    put,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    request_body = UpdateSubscriptionBody,
    responses(
        (status = 200, description = "Subscription updated", body = Message),
        (status = 400, description = "Invalid update", body = ErrorBody),
        (status = 404, description = "No subscription with this id", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "Update a subscription by id", skip(repo))]
#[put("/{id}")]
async fn update(
    repo: web::Data<dyn SubscriptionRepo>,
    path: web::Path<(i32,)>,
    body: web::Json<UpdateSubscriptionBody>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let patch: SubscriptionPatch = body.into_inner().try_into()?;

    let existing = repo.fetch_by_id(id).await?.ok_or(Error::NotFound(id))?;
    let updated = existing.apply(patch)?;

    // The row may have been deleted since it was fetched
    if !repo.update(id, &updated).await? {
        return Err(Error::NotFound(id).into());
    }

    Ok(HttpResponse::Ok().json(Message::new("updated")))
}

#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription deleted", body = Message),
        (status = 404, description = "No subscription with this id", body = ErrorBody),
    )
)]
#[tracing::instrument(name = "Delete a subscription by id", skip(repo))]
#[delete("/{id}")]
async fn remove(
    repo: web::Data<dyn SubscriptionRepo>,
    path: web::Path<(i32,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    if !repo.delete(id).await? {
        return Err(Error::NotFound(id).into());
    }

    Ok(HttpResponse::Ok().json(Message::new("deleted")))
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| RestError::ParseError(err.to_string()).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| RestError::ParseError(err.to_string()).into());
    let path_config = web::PathConfig::default()
        .error_handler(|_err, _req| RestError::ParseError("invalid id".into()).into());

    // `/sum` must be registered before `/{id}`
    web::scope("/api/subscriptions")
        .app_data(json_config)
        .app_data(query_config)
        .app_data(path_config)
        .service(sum)
        .service(create)
        .service(list)
        .service(fetch)
        .service(update)
        .service(remove)
}
