use utoipa::OpenApi;

use crate::model::Subscription;

use super::subscriptions::{
    self, CostTotal, CreatedId, Message, NewSubscriptionBody, SubscriptionList,
    UpdateSubscriptionBody,
};
use super::ErrorBody;

/// Where the generated document is served
pub const OPENAPI_URL: &str = "/api-docs/openapi.json";

/// OpenAPI document for the subscriptions API
#[derive(OpenApi)]
#[openapi(
    info(title = "subcost", description = "Subscription tracking and cost summaries"),
    paths(
        subscriptions::create,
        subscriptions::list,
        subscriptions::sum,
        subscriptions::fetch,
        subscriptions::update,
        subscriptions::remove,
    ),
    components(schemas(
        NewSubscriptionBody,
        UpdateSubscriptionBody,
        Subscription,
        SubscriptionList,
        CreatedId,
        CostTotal,
        Message,
        ErrorBody,
    )),
    tags((name = "subscriptions", description = "Subscription CRUD and cost summaries"))
)]
pub struct ApiDoc;
