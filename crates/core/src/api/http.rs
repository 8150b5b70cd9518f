use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::content::{Achievement, Feature};
use crate::models::expense::Expense;
use crate::models::portfolio::Portfolio;
use crate::models::quiz::QuizResult;
use crate::models::record::RecordId;
use crate::models::savings::SavingsGoal;
use crate::models::settings::Settings;

use super::traits::StudentApi;

/// Longest error body kept in a `CoreError::Api` message.
const MAX_ERROR_BODY: usize = 200;

/// REST client for the learning platform backend.
///
/// - JSON over HTTP, camelCase field names
/// - Bearer-token auth when a token is configured
/// - Request timeout from `Settings::request_timeout_secs` (native only)
pub struct HttpStudentApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ContributionBody {
    amount: f64,
}

#[derive(Serialize)]
struct SavingsBody<'a> {
    goals: &'a [SavingsGoal],
}

/// `GET /student/savings` answers either a bare list or `{ "goals": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavingsResponse {
    List(Vec<SavingsGoal>),
    Wrapped { goals: Vec<SavingsGoal> },
}

/// Decode a response body.
///
/// Mongo documents may carry a virtual `id` next to `_id`; the virtual one
/// is dropped so records deserialize through their `_id` alias.
pub fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let mut value: Value = serde_json::from_str(text)?;
    drop_virtual_ids(&mut value);
    serde_json::from_value(value)
}

fn drop_virtual_ids(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(drop_virtual_ids),
        Value::Object(map) => {
            if map.contains_key("_id") {
                map.remove("id");
            }
            map.values_mut().for_each(drop_virtual_ids);
        }
        _ => {}
    }
}

fn parse_error(endpoint: &str, e: serde_json::Error) -> CoreError {
    CoreError::Api {
        endpoint: endpoint.to_string(),
        message: format!("failed to parse response: {e}"),
    }
}

impl HttpStudentApi {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url().to_string(),
            token: settings.api_token.clone(),
        })
    }

    /// Full URL of an endpoint path such as `/student/budget`.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint_url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Response, CoreError> {
        let response = builder.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "request failed");
            CoreError::from(e)
        })?;
        let status = response.status();
        if status.is_success() {
            debug!(endpoint, %status, "request ok");
            return Ok(response);
        }

        let mut body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        warn!(endpoint, %status, "API returned an error status");
        Err(CoreError::Api {
            endpoint: endpoint.to_string(),
            message: format!("HTTP {status}: {body}"),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        let text = response.text().await?;
        parse_body(&text).map_err(|e| parse_error(path, e))
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, CoreError> {
        self.send(self.request(Method::POST, path).json(body), path).await
    }

    async fn delete(&self, path: &str) -> Result<(), CoreError> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl StudentApi for HttpStudentApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_budget(&self) -> Result<Budget, CoreError> {
        self.get_json("/student/budget").await
    }

    async fn save_budget(&self, budget: &Budget) -> Result<(), CoreError> {
        self.post_json("/student/budget", budget).await?;
        Ok(())
    }

    async fn fetch_expenses(&self) -> Result<Vec<Expense>, CoreError> {
        self.get_json("/student/expenses").await
    }

    async fn save_expense(&self, expense: &Expense) -> Result<Expense, CoreError> {
        let path = "/student/expenses";
        let response = self.post_json(path, expense).await?;
        // Some deployments answer 201 with an empty body
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(expense.clone());
        }
        parse_body(&text).map_err(|e| parse_error(path, e))
    }

    async fn delete_expense(&self, id: &RecordId) -> Result<(), CoreError> {
        self.delete(&format!("/student/expenses/{id}")).await
    }

    async fn fetch_savings_goals(&self) -> Result<Vec<SavingsGoal>, CoreError> {
        let response: SavingsResponse = self.get_json("/student/savings").await?;
        Ok(match response {
            SavingsResponse::List(goals) | SavingsResponse::Wrapped { goals } => goals,
        })
    }

    async fn save_savings_goals(&self, goals: &[SavingsGoal]) -> Result<(), CoreError> {
        self.post_json("/student/savings", &SavingsBody { goals }).await?;
        Ok(())
    }

    async fn contribute(&self, id: &RecordId, amount: f64) -> Result<SavingsGoal, CoreError> {
        let path = format!("/student/savings/{id}/contribute");
        let response = self.post_json(&path, &ContributionBody { amount }).await?;
        let text = response.text().await?;
        parse_body(&text).map_err(|e| parse_error(&path, e))
    }

    async fn delete_savings_goal(&self, id: &RecordId) -> Result<(), CoreError> {
        self.delete(&format!("/student/savings/{id}")).await
    }

    async fn fetch_investment(&self) -> Result<Portfolio, CoreError> {
        self.get_json("/student/investment").await
    }

    async fn save_investment(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        self.post_json("/student/investment", portfolio).await?;
        Ok(())
    }

    async fn fetch_quiz_results(&self) -> Result<Vec<QuizResult>, CoreError> {
        self.get_json("/student/quiz").await
    }

    async fn save_quiz_result(&self, result: &QuizResult) -> Result<(), CoreError> {
        self.post_json("/student/quiz", result).await?;
        Ok(())
    }

    async fn fetch_features(&self) -> Result<Vec<Feature>, CoreError> {
        self.get_json("/student/features").await
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, CoreError> {
        self.get_json("/student/achievements").await
    }
}
