//! Drives an editor session against a fake console API over real HTTP.
#![allow(unused_crate_dependencies)]

use std::io::Read;
use std::sync::Arc;
use std::thread;

use dsedit_editor::{EditorSession, MemberRef, RecordingUi, SaveStatus, SessionError, SessionOptions};
use dsedit_store::{HttpContentStore, MemoryContentStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tiny_http::{Header, Method, Response, Server};

/// Serves the dataset endpoints from a [`MemoryContentStore`].
struct FakeConsole {
	server: Arc<Server>,
	data: Arc<MemoryContentStore>,
	base: String,
}

impl FakeConsole {
	fn start(data: MemoryContentStore) -> Self {
		let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
		let addr = server.server_addr().to_ip().unwrap();
		let data = Arc::new(data);

		let server_clone = server.clone();
		let data_clone = data.clone();
		thread::spawn(move || {
			for mut request in server_clone.incoming_requests() {
				let mut body = String::new();
				let _ = request.as_reader().read_to_string(&mut body);
				let (status, reply) = route(&data_clone, request.method(), request.url(), &body);
				let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
				let response = Response::from_string(reply.to_string())
					.with_status_code(status)
					.with_header(header);
				let _ = request.respond(response);
			}
		});

		Self {
			server,
			data,
			base: format!("http://{addr}"),
		}
	}

	fn session(&self) -> (EditorSession, Arc<RecordingUi>) {
		let store = Arc::new(HttpContentStore::new(&self.base));
		let ui = Arc::new(RecordingUi::default());
		(EditorSession::new(store, ui.clone(), SessionOptions::default()), ui)
	}
}

impl Drop for FakeConsole {
	fn drop(&mut self) {
		self.server.unblock();
	}
}

fn query(url: &str) -> Vec<(&str, &str)> {
	url.split_once('?')
		.map(|(_, q)| q.split('&').filter_map(|pair| pair.split_once('=')).collect())
		.unwrap_or_default()
}

fn param<'a>(params: &[(&str, &'a str)], key: &str) -> &'a str {
	params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v).unwrap_or_default()
}

fn route(data: &MemoryContentStore, method: &Method, url: &str, body: &str) -> (u16, Value) {
	let path = url.split('?').next().unwrap_or_default();
	let params = query(url);
	match (method, path) {
		(Method::Get, "/api/datasets/members") => match data.member_names(param(&params, "dataset")) {
			Some(names) => {
				let members: Vec<_> = names.iter().map(|n| json!({"name": n, "modified": ""})).collect();
				(200, json!({ "members": members }))
			}
			None => (200, json!({"error": "Dataset not found"})),
		},
		(Method::Get, "/api/datasets/content") => {
			let target = MemberRef::new(param(&params, "dataset"), param(&params, "member"));
			match data.content(&target) {
				Some(content) => (200, json!({ "content": content })),
				None => (404, json!({"error": "Member not found"})),
			}
		}
		(Method::Post, "/api/datasets/save") => {
			let req: Value = serde_json::from_str(body).unwrap();
			if req["content"].as_str().unwrap().contains("ABEND") {
				return (500, json!({"error": "zowe exited with 12"}));
			}
			data.insert(
				req["dataset"].as_str().unwrap(),
				req["member"].as_str().unwrap(),
				req["content"].as_str().unwrap(),
			);
			(200, json!({"success": true}))
		}
		(Method::Post, "/api/datasets/delete") => {
			let req: Value = serde_json::from_str(body).unwrap();
			let target = MemberRef::new(req["dataset"].as_str().unwrap(), req["member"].as_str().unwrap());
			if data.remove(&target) {
				(200, json!({"success": true}))
			} else {
				(200, json!({"error": "Member not found"}))
			}
		}
		_ => (404, json!({"error": "not found"})),
	}
}

fn console() -> FakeConsole {
	FakeConsole::start(MemoryContentStore::new().with_member("MY.SRC", "PROG1", "HELLO\n"))
}

#[tokio::test]
async fn open_edit_save_over_http() {
	let api = console();
	let (mut session, _ui) = api.session();
	let prog1 = MemberRef::new("MY.SRC", "PROG1");

	session.open_member(prog1.clone()).await.unwrap();
	assert_eq!(session.buffer(), "HELLO\n");
	assert_eq!(session.members().len(), 1);
	assert_eq!(session.members()[0].last_modified, None);

	session.edit_buffer("HELLO\nWORLD\n");
	session.save_and_wait().await.unwrap();
	assert_eq!(session.status(), SaveStatus::Clean);
	assert_eq!(api.data.content(&prog1).as_deref(), Some("HELLO\nWORLD\n"));
}

#[tokio::test]
async fn server_failure_marks_save_failed() {
	let api = console();
	let (mut session, ui) = api.session();
	session.open_member(MemberRef::new("MY.SRC", "PROG1")).await.unwrap();

	session.edit_buffer("ABEND");
	let err = session.save_and_wait().await.unwrap_err();
	assert!(matches!(err, SessionError::Save { .. }));
	assert_eq!(session.status(), SaveStatus::SaveFailed);
	assert_eq!(session.buffer(), "ABEND");
	assert!(ui.notifications().last().unwrap().message.starts_with("Failed to save file:"));

	session.edit_buffer("FIXED");
	session.save_and_wait().await.unwrap();
	assert_eq!(api.data.content(&MemberRef::new("MY.SRC", "PROG1")).as_deref(), Some("FIXED"));
}

#[tokio::test]
async fn create_and_delete_over_http() {
	let api = console();
	let (mut session, _ui) = api.session();
	session.open_dataset("MY.SRC").await.unwrap();

	session.create_member("job#1").await.unwrap();
	assert_eq!(session.active(), &MemberRef::new("MY.SRC", "JOB#1"));
	assert_eq!(api.data.member_names("MY.SRC").unwrap(), vec!["JOB#1".to_string(), "PROG1".to_string()]);

	session.delete_member("JOB#1").await.unwrap();
	assert_eq!(api.data.member_names("MY.SRC").unwrap(), vec!["PROG1".to_string()]);
	assert_eq!(session.active().member(), None);
}
