//! HTTP client for the dataset endpoints of the console API.
//!
//! | operation | request | response |
//! |---|---|---|
//! | list | `GET /api/datasets/members?dataset=D` | `{ members: [{name, modified}], error? }` |
//! | load | `GET /api/datasets/content?dataset=D&member=M` | `{ content, error? }` |
//! | save | `POST /api/datasets/save` `{dataset, member, content}` | `{ success } \| { error }` |
//! | delete | `POST /api/datasets/delete` `{dataset, member}` | `{ success } \| { error }` |

use std::time::Duration;

use async_trait::async_trait;
use dsedit_primitives::{ContentStore, MemberListEntry, MemberRef, StoreError, StoreResult};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies are cut to this many bytes before being reported.
const MAX_ERROR_BODY: usize = 512;

#[derive(Deserialize)]
struct MembersResponse {
	#[serde(default)]
	members: Vec<MemberListEntry>,
	error: Option<String>,
}

#[derive(Deserialize)]
struct ContentResponse {
	content: Option<String>,
	error: Option<String>,
}

#[derive(Deserialize)]
struct AckResponse {
	#[serde(default)]
	success: bool,
	error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
	dataset: &'a str,
	member: &'a str,
	content: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
	dataset: &'a str,
	member: &'a str,
}

/// [`ContentStore`] backed by the console REST API.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
	client: Client,
	base: String,
	timeout: Duration,
}

impl HttpContentStore {
	/// Creates a store talking to `base`, e.g. `http://localhost:5000`.
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into().trim_end_matches('/').to_string();
		Self {
			client: Client::new(),
			base,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Sets the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	fn url(&self, path: &str) -> String {
		format!("{}{path}", self.base)
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
		let response = request
			.timeout(self.timeout)
			.send()
			.await
			.map_err(|e| StoreError::Transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			let body = match serde_json::from_str::<ErrorBody>(&text) {
				Ok(parsed) => parsed.error,
				Err(_) => truncate(text),
			};
			tracing::debug!(status = status.as_u16(), %body, "store.http.status");
			return Err(StoreError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let bytes = response.bytes().await.map_err(|e| StoreError::Transport(e.to_string()))?;
		serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
	}

	async fn post_ack<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<()> {
		let ack: AckResponse = self.send(self.client.post(self.url(path)).json(body)).await?;
		match (ack.success, ack.error) {
			(_, Some(error)) => Err(StoreError::Rejected(error)),
			(true, None) => Ok(()),
			(false, None) => Err(StoreError::Rejected("Unknown error".into())),
		}
	}
}

fn member_of(target: &MemberRef) -> StoreResult<&str> {
	target
		.member()
		.ok_or_else(|| StoreError::Rejected(format!("no member selected in {}", target.dataset)))
}

fn truncate(mut text: String) -> String {
	if text.len() > MAX_ERROR_BODY {
		let mut end = MAX_ERROR_BODY;
		while !text.is_char_boundary(end) {
			end -= 1;
		}
		text.truncate(end);
	}
	text
}

#[async_trait]
impl ContentStore for HttpContentStore {
	async fn list(&self, dataset: &str) -> StoreResult<Vec<MemberListEntry>> {
		tracing::trace!(dataset, "store.http.list");
		let request = self
			.client
			.get(self.url("/api/datasets/members"))
			.query(&[("dataset", dataset)]);
		let response: MembersResponse = self.send(request).await?;
		match response.error {
			Some(error) => Err(StoreError::Rejected(error)),
			None => Ok(response.members),
		}
	}

	async fn load(&self, target: &MemberRef) -> StoreResult<String> {
		let member = member_of(target)?;
		tracing::trace!(dataset = %target.dataset, member, "store.http.load");
		let request = self
			.client
			.get(self.url("/api/datasets/content"))
			.query(&[("dataset", target.dataset.as_str()), ("member", member)]);
		let response: ContentResponse = self.send(request).await?;
		match response.error {
			Some(error) => Err(StoreError::Rejected(error)),
			None => Ok(response.content.unwrap_or_default()),
		}
	}

	async fn save(&self, target: &MemberRef, content: &str) -> StoreResult<()> {
		let member = member_of(target)?;
		tracing::trace!(dataset = %target.dataset, member, len = content.len(), "store.http.save");
		let body = SaveRequest {
			dataset: &target.dataset,
			member,
			content,
		};
		self.post_ack("/api/datasets/save", &body).await
	}

	async fn delete(&self, target: &MemberRef) -> StoreResult<()> {
		let member = member_of(target)?;
		tracing::trace!(dataset = %target.dataset, member, "store.http.delete");
		let body = DeleteRequest {
			dataset: &target.dataset,
			member,
		};
		self.post_ack("/api/datasets/delete", &body).await
	}
}
