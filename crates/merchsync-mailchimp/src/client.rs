// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Mailchimp Marketing API.
//!
//! Provides [`MailchimpClient`] which handles request construction,
//! authentication, datacenter resolution, and transient error retry.

use std::time::Duration;

use merchsync_core::MerchsyncError;
use merchsync_core::types::{
    CartSummary, CommerceStore, ListSubmission, MailingList, OrderSummary, Paged, ProductSummary,
};
use reqwest::{Method, StatusCode, Url};
use tracing::{debug, warn};

use crate::types::{
    ApiProblem, CartsEnvelope, ListsEnvelope, OrdersEnvelope, ProductsEnvelope,
};

/// Username sent with basic auth; Mailchimp ignores it, only the key matters.
const AUTH_USER: &str = "merchsync";

/// Page size requested when listing the account's audiences.
const LISTS_PAGE_SIZE: u32 = 100;

/// HTTP client for Mailchimp API communication.
///
/// The API host is derived from the datacenter suffix of the key
/// (`<secret>-us6` talks to `us6.api.mailchimp.com`) unless an explicit base
/// URL override is given. Transient errors (429, 500, 503) are retried once.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
}

impl MailchimpClient {
    /// Creates a new Mailchimp API client.
    ///
    /// # Arguments
    /// * `api_key` - account API key, `<secret>-<dc>` format
    /// * `api_base` - base URL override (tests, proxies); `None` derives the
    ///   host from the key's datacenter suffix
    pub fn new(api_key: &str, api_base: Option<&str>) -> Result<Self, MerchsyncError> {
        let base = match api_base {
            Some(base) => base.to_string(),
            None => {
                let datacenter = api_key
                    .rsplit_once('-')
                    .map(|(_, dc)| dc)
                    .filter(|dc| !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()))
                    .ok_or_else(|| {
                        MerchsyncError::api("API key is missing its datacenter suffix")
                    })?;
                format!("https://{datacenter}.api.mailchimp.com/3.0")
            }
        };

        let base_url = Url::parse(&base).map_err(|e| MerchsyncError::Api {
            message: format!("invalid API base URL `{base}`: {e}"),
            source: Some(Box::new(e)),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MerchsyncError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url,
            max_retries: 1,
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    ///
    /// Store ids are canonical site URLs, so they must never be spliced into
    /// the path as raw text.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MerchsyncError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MerchsyncError::api("API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, retrying once on a transient status.
    ///
    /// Returns the final response whatever its status; callers branch on
    /// status codes they care about (404 as absence) and use [`Self::fail`]
    /// for the rest.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, MerchsyncError> {
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, url = %url, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .basic_auth(AUTH_USER, Some(&self.api_key));
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| MerchsyncError::Api {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, url = %url, "response received");

            if is_transient_error(status) && attempt < self.max_retries {
                continue;
            }
            return Ok(response);
        }
        unreachable!("retry loop always returns")
    }

    /// Decode an error response into [`MerchsyncError::Api`].
    async fn fail(response: reqwest::Response) -> MerchsyncError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiProblem>(&body) {
            Ok(problem) if !problem.detail.is_empty() => {
                format!("{}: {}", problem.title, problem.detail)
            }
            Ok(problem) => problem.title,
            Err(_) => format!("API returned {status}: {body}"),
        };
        MerchsyncError::api(message)
    }

    /// Lightweight credential check against `GET /ping`.
    pub async fn ping(&self) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ping"])?;
        let response = self.execute(Method::GET, url, None).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    /// All audience lists visible to the account.
    pub async fn get_lists(&self) -> Result<Vec<MailingList>, MerchsyncError> {
        let mut url = self.endpoint(&["lists"])?;
        url.query_pairs_mut()
            .append_pair("count", &LISTS_PAGE_SIZE.to_string());
        let response = self.execute(Method::GET, url, None).await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let envelope: ListsEnvelope = decode(response).await?;
        Ok(envelope.lists)
    }

    /// Whether the given list id names a real list.
    pub async fn has_list(&self, list_id: &str) -> Result<bool, MerchsyncError> {
        let url = self.endpoint(&["lists", list_id])?;
        let response = self.execute(Method::GET, url, None).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::fail(response).await),
        }
    }

    /// Create a new audience list.
    pub async fn create_list(
        &self,
        submission: &ListSubmission,
    ) -> Result<MailingList, MerchsyncError> {
        let url = self.endpoint(&["lists"])?;
        let body = serde_json::to_value(submission).map_err(|e| MerchsyncError::Api {
            message: format!("failed to encode list submission: {e}"),
            source: Some(Box::new(e)),
        })?;
        let response = self.execute(Method::POST, url, Some(body)).await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        decode(response).await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["lists", list_id])?;
        let response = self.execute(Method::DELETE, url, None).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    /// The commerce store registered under the given id, if any.
    pub async fn get_store(
        &self,
        store_id: &str,
    ) -> Result<Option<CommerceStore>, MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores", store_id])?;
        let response = self.execute(Method::GET, url, None).await?;
        match response.status() {
            status if status.is_success() => Ok(Some(decode(response).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::fail(response).await),
        }
    }

    pub async fn add_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores"])?;
        let body = encode(store)?;
        let response = self.execute(Method::POST, url, Some(body)).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    pub async fn update_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores", &store.id])?;
        let body = encode(store)?;
        let response = self.execute(Method::PATCH, url, Some(body)).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    pub async fn delete_store(&self, store_id: &str) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores", store_id])?;
        let response = self.execute(Method::DELETE, url, None).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    /// One page of the store's orders.
    pub async fn orders(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<OrderSummary>, MerchsyncError> {
        let url = self.paged_endpoint(&["ecommerce", "stores", store_id, "orders"], page, limit)?;
        let response = self.execute(Method::GET, url, None).await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let envelope: OrdersEnvelope = decode(response).await?;
        Ok(Paged {
            items: envelope.orders,
            total_items: envelope.total_items,
        })
    }

    /// One page of the store's products.
    pub async fn products(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<ProductSummary>, MerchsyncError> {
        let url =
            self.paged_endpoint(&["ecommerce", "stores", store_id, "products"], page, limit)?;
        let response = self.execute(Method::GET, url, None).await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let envelope: ProductsEnvelope = decode(response).await?;
        Ok(Paged {
            items: envelope.products,
            total_items: envelope.total_items,
        })
    }

    /// One page of the store's abandoned carts.
    pub async fn carts(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<CartSummary>, MerchsyncError> {
        let url = self.paged_endpoint(&["ecommerce", "stores", store_id, "carts"], page, limit)?;
        let response = self.execute(Method::GET, url, None).await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let envelope: CartsEnvelope = decode(response).await?;
        Ok(Paged {
            items: envelope.carts,
            total_items: envelope.total_items,
        })
    }

    pub async fn delete_store_order(
        &self,
        store_id: &str,
        order_id: &str,
    ) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores", store_id, "orders", order_id])?;
        let response = self.execute(Method::DELETE, url, None).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    pub async fn delete_cart(
        &self,
        store_id: &str,
        cart_id: &str,
    ) -> Result<(), MerchsyncError> {
        let url = self.endpoint(&["ecommerce", "stores", store_id, "carts", cart_id])?;
        let response = self.execute(Method::DELETE, url, None).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    /// Pagination is 1-based pages mapped onto offset/count query params.
    fn paged_endpoint(
        &self,
        segments: &[&str],
        page: u32,
        limit: u32,
    ) -> Result<Url, MerchsyncError> {
        let mut url = self.endpoint(segments)?;
        let offset = page.saturating_sub(1).saturating_mul(limit);
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("count", &limit.to_string());
        Ok(url)
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

/// Decode a successful response body, mapping decode failures to API errors.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MerchsyncError> {
    let body = response.text().await.map_err(|e| MerchsyncError::Api {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| MerchsyncError::Api {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Encode a request payload, mapping encode failures to API errors.
fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, MerchsyncError> {
    serde_json::to_value(value).map_err(|e| MerchsyncError::Api {
        message: format!("failed to encode request payload: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use merchsync_core::types::{Address, CampaignDefaults};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> MailchimpClient {
        MailchimpClient::new("0123456789abcdef-us6", Some(base_url)).unwrap()
    }

    fn test_submission() -> ListSubmission {
        ListSubmission {
            name: "Example Shop".into(),
            contact: Address {
                address1: Some("123 Main St".into()),
                city: Some("Atlanta".into()),
                country: Some("US".into()),
                ..Address::default()
            },
            permission_reminder: "You subscribed at Example Shop".into(),
            email_type_option: true,
            campaign_defaults: CampaignDefaults {
                from_name: "Example Shop".into(),
                from_email: "owner@example.com".into(),
                subject: "News".into(),
                language: "en".into(),
            },
            notify_on_subscribe: None,
            notify_on_unsubscribe: None,
        }
    }

    #[test]
    fn datacenter_derived_from_key_suffix() {
        let client = MailchimpClient::new("0123456789abcdef-us6", None).unwrap();
        assert_eq!(
            client.base_url.as_str(),
            "https://us6.api.mailchimp.com/3.0"
        );
    }

    #[test]
    fn key_without_datacenter_suffix_is_rejected() {
        let result = MailchimpClient::new("0123456789abcdef", None);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("datacenter"), "got: {err}");
    }

    #[tokio::test]
    async fn ping_succeeds_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"health_status": "Everything's Chimpy!"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.ping().await.is_ok());
    }

    #[tokio::test]
    async fn ping_fails_on_invalid_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "title": "API Key Invalid",
                "status": 401,
                "detail": "Your API key may be invalid."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.ping().await.unwrap_err().to_string();
        assert!(err.contains("API Key Invalid"), "got: {err}");
    }

    #[tokio::test]
    async fn ping_retries_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"health_status": "ok"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.ping().await.is_ok());
    }

    #[tokio::test]
    async fn get_lists_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lists": [
                    {"id": "abc123", "name": "Newsletter"},
                    {"id": "def456", "name": "Promotions"}
                ],
                "total_items": 2
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let lists = client.get_lists().await.unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].id, "abc123");
        assert_eq!(lists[1].name, "Promotions");
    }

    #[tokio::test]
    async fn has_list_maps_404_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists/abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "abc123", "name": "Newsletter"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lists/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "title": "Resource Not Found",
                "status": 404
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.has_list("abc123").await.unwrap());
        assert!(!client.has_list("gone").await.unwrap());
    }

    #[tokio::test]
    async fn create_list_returns_new_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lists"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "new789", "name": "Example Shop"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let list = client.create_list(&test_submission()).await.unwrap();
        assert_eq!(list.id, "new789");
    }

    #[tokio::test]
    async fn create_list_surfaces_problem_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lists"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "title": "Invalid Resource",
                "status": 400,
                "detail": "The resource submitted could not be validated."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .create_list(&test_submission())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid Resource"), "got: {err}");
        assert!(err.contains("could not be validated"), "got: {err}");
    }

    #[tokio::test]
    async fn get_store_maps_404_to_none() {
        let server = MockServer::start().await;
        // Store ids are site URLs and arrive percent-encoded on the wire.
        Mock::given(method("GET"))
            .and(path("/ecommerce/stores/https:%2F%2Fshop.example.com"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "title": "Resource Not Found",
                "status": 404
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let store = client.get_store("https://shop.example.com").await.unwrap();
        assert!(store.is_none());
    }

    #[tokio::test]
    async fn orders_sends_offset_and_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ecommerce/stores/store-1/orders"))
            .and(query_param("offset", "20"))
            .and(query_param("count", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "orders": [{"id": "order-1", "order_total": 19.99}],
                "total_items": 21
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let page = client.orders("store-1", 3, 10).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "order-1");
        assert_eq!(page.total_items, 21);
    }

    #[tokio::test]
    async fn delete_store_order_succeeds_on_204() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ecommerce/stores/store-1/orders/order-9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(
            client
                .delete_store_order("store-1", "order-9")
                .await
                .is_ok()
        );
    }
}
