use std::net::TcpListener;
use std::sync::Arc;

use reqwest::{Client, Method, Response};

use serde::Serialize;

use uuid::Uuid;

use subcost::app;
use subcost::repo::InMemorySubscriptionRepo;

#[derive(Debug, Default, Serialize)]
pub struct NewSubscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl NewSubscription {
    pub fn valid(service_name: &str, price: i32, user_id: Uuid, start: &str, end: Option<&str>) -> Self {
        Self {
            service_name: Some(service_name.into()),
            price: Some(price),
            user_id: Some(user_id),
            start_date: Some(start.into()),
            end_date: end.map(Into::into),
        }
    }
}

/// Partial update body, same shape as a new subscription
pub type SubscriptionUpdate = NewSubscription;

pub struct TestApp {
    addr: String,

    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let repo = Arc::new(InMemorySubscriptionRepo::new());

        let server = app::run(listener, repo).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self { addr, client }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn openapi(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "api-docs/openapi.json").send().await
    }

    pub async fn subscription_create(
        &self,
        new_subscription: &NewSubscription,
    ) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/subscriptions")
            .json(new_subscription)
            .send()
            .await
    }

    /// Create a subscription that is expected to be valid, returning its ID
    pub async fn subscription_create_ok(&self, new_subscription: &NewSubscription) -> i64 {
        let res = self
            .subscription_create(new_subscription)
            .await
            .expect("Failed to execute request");
        assert_eq!(reqwest::StatusCode::CREATED, res.status());

        let body: serde_json::Value = res.json().await.expect("Failed to parse response");
        body["id"].as_i64().expect("Response is missing an id")
    }

    pub async fn subscription_list(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "api/subscriptions").send().await
    }

    pub async fn subscription_fetch(&self, id: i64) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("api/subscriptions/{}", id))
            .send()
            .await
    }

    pub async fn subscription_update(
        &self,
        id: i64,
        update: &SubscriptionUpdate,
    ) -> reqwest::Result<Response> {
        self.request(Method::PUT, &format!("api/subscriptions/{}", id))
            .json(update)
            .send()
            .await
    }

    pub async fn subscription_delete(&self, id: i64) -> reqwest::Result<Response> {
        self.request(Method::DELETE, &format!("api/subscriptions/{}", id))
            .send()
            .await
    }

    pub async fn subscription_sum(&self, query: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.request(Method::GET, "api/subscriptions/sum")
            .query(query)
            .send()
            .await
    }
}
