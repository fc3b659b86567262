//! In-process stand-in for the Stellarsis server.
//!
//! Every request bumps a hit counter, so tests can assert that a call was
//! refused locally without touching the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Json, Path, Query, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use stellarsis_client::{ClientConfig, RemoteForumClient};

pub const PASSWORD: &str = "secret123";
pub const ADMIN_PASSWORD: &str = "adminpass";

pub struct FakeServer {
    pub base_url: String,
    state: Arc<FakeState>,
}

struct FakeState {
    hits: AtomicUsize,
    logouts: AtomicUsize,
    next_id: AtomicI64,
    html_rooms: AtomicBool,
    messages: Mutex<Vec<Value>>,
}

impl FakeServer {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState {
            hits: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
            next_id: AtomicI64::new(100),
            html_rooms: AtomicBool::new(false),
            messages: Mutex::new(vec![
                json!({
                    "id": 1, "username": "bob", "nickname": "Bobby",
                    "content": "second", "timestamp": "2024-01-01T12:00:05Z"
                }),
                json!({
                    "id": 2, "username": "carol", "nickname": null,
                    "content": "first", "timestamp": "2024-01-01T12:00:00Z"
                }),
            ]),
        });

        let app = Router::new()
            .route("/login", post(login))
            .route("/logout", get(logout))
            .route("/api/chat/rooms", get(rooms))
            .route("/api/chat/{room_id}/history", get(history))
            .route("/api/chat/send", post(send_chat))
            .route("/api/chat/{room_id}/messages/{message_id}", delete(delete_chat))
            .route("/api/forum/sections", get(sections))
            .route("/api/forum/section/{section_id}/threads", get(threads))
            .route("/api/forum/thread/{thread_id}/replies", get(replies))
            .route("/api/forum/reply", post(post_reply))
            .route("/forum/thread", post(create_thread))
            .route("/forum/thread/{thread_id}", get(thread_page))
            .route("/api/follows", get(list_follows).post(follow))
            .route("/change_password", post(change_password))
            .route("/api/online_count", get(online_count))
            .route("/api/admin/system-info", get(system_info))
            .layer(middleware::from_fn_with_state(state.clone(), count_hits))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> RemoteForumClient {
        RemoteForumClient::new(ClientConfig::new(self.base_url.clone())).unwrap()
    }

    pub async fn logged_in_client(&self, username: &str) -> RemoteForumClient {
        let password = if username == "admin" {
            ADMIN_PASSWORD
        } else {
            PASSWORD
        };
        let mut client = self.client();
        client.login(username, password).await.unwrap();
        client
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn logouts(&self) -> usize {
        self.state.logouts.load(Ordering::SeqCst)
    }

    /// Make the rooms route answer with an HTML page
    pub fn serve_html_rooms(&self) {
        self.state.html_rooms.store(true, Ordering::SeqCst);
    }
}

/// Base URL of a port nothing listens on
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn count_hits(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

/// The user behind the session cookie. `stale` logs in fine but its cookie
/// is never honored, which looks like a server-side expiry.
fn session_user(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    let token = cookies
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))?;
    let user = token.strip_suffix("-token")?;
    (user != "stale").then(|| user.to_string())
}

fn unauthorized() -> Response {
    let body = Json(json!({"success": false, "message": "login required"}));
    (StatusCode::UNAUTHORIZED, body).into_response()
}

fn with_session(user: &str, body: Response) -> Response {
    let cookie = format!("session={}-token; Path=/; HttpOnly", user);
    ([(SET_COOKIE, cookie)], body).into_response()
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    let username = form.get("username").cloned().unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();

    match (username.as_str(), password.as_str()) {
        ("htmluser", PASSWORD) => with_session(
            &username,
            Html("<html><h1>Chat</h1></html>").into_response(),
        ),
        ("htmluser", _) => {
            Html("<html><p>Invalid username or password</p></html>").into_response()
        }
        ("admin", ADMIN_PASSWORD)
        | ("alice", PASSWORD)
        | ("bob", PASSWORD)
        | ("stale", PASSWORD) => {
            let body = Json(json!({
                "success": true,
                "user": {
                    "username": username,
                    "nickname": format!("{}-nick", username),
                    "color": "#336699"
                }
            }));
            with_session(&username, body.into_response())
        }
        _ => {
            Json(json!({"success": false, "message": "无效的用户名或密码"})).into_response()
        }
    }
}

async fn logout(State(state): State<Arc<FakeState>>) -> Response {
    state.logouts.fetch_add(1, Ordering::SeqCst);
    ([(SET_COOKIE, "session=; Path=/; Max-Age=0")], "bye").into_response()
}

async fn rooms(State(state): State<Arc<FakeState>>) -> Response {
    if state.html_rooms.load(Ordering::SeqCst) {
        return Html("<html><h1>Rooms</h1></html>").into_response();
    }
    Json(json!({"rooms": [
        {"id": 1, "name": "Lobby", "description": "General chat"},
        {"id": 2, "name": "Tech", "description": "Technical talk"}
    ]}))
    .into_response()
}

async fn history(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(room_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if session_user(&headers).is_none() {
        return unauthorized();
    }
    if room_id != 1 {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "no such room"}))).into_response();
    }

    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(50);
    // Newest `limit` messages, left in storage order
    let messages = state.messages.lock().unwrap();
    let mut stamps: Vec<&str> = messages
        .iter()
        .filter_map(|m| m["timestamp"].as_str())
        .collect();
    stamps.sort_unstable_by(|a, b| b.cmp(a));
    let cutoff = stamps.get(limit.saturating_sub(1)).copied().unwrap_or("");
    let page: Vec<Value> = messages
        .iter()
        .filter(|m| limit > 0 && m["timestamp"].as_str().unwrap_or("") >= cutoff)
        .cloned()
        .collect();
    Json(json!({"messages": page})).into_response()
}

async fn send_chat(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = session_user(&headers) else {
        return unauthorized();
    };
    if user == "bob" {
        let body = Json(json!({"success": false, "message": "muted"}));
        return (StatusCode::FORBIDDEN, body).into_response();
    }
    if body["room_id"] != json!(1) {
        return (StatusCode::NOT_FOUND, Json(json!({"success": false}))).into_response();
    }

    let stored = json!({
        "id": state.next_id.fetch_add(1, Ordering::SeqCst),
        "room_id": 1,
        "username": user,
        "nickname": null,
        "content": body["message"],
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    state.messages.lock().unwrap().push(stored.clone());
    Json(json!({"success": true, "message": stored})).into_response()
}

async fn delete_chat(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path((_room_id, message_id)): Path<(i64, i64)>,
) -> Response {
    let Some(user) = session_user(&headers) else {
        return unauthorized();
    };
    if user == "bob" {
        let reason = "only the author or an admin may delete";
        return Json(json!({"success": false, "message": reason})).into_response();
    }
    if user != "admin" {
        let body = Json(json!({"success": false, "message": "forbidden"}));
        return (StatusCode::FORBIDDEN, body).into_response();
    }

    let mut messages = state.messages.lock().unwrap();
    let before = messages.len();
    messages.retain(|m| m["id"] != json!(message_id));
    if messages.len() == before {
        let body = Json(json!({"success": false, "message": "no such message"}));
        return (StatusCode::NOT_FOUND, body).into_response();
    }
    Json(json!({"success": true, "message": "deleted"})).into_response()
}

async fn sections() -> Json<Value> {
    Json(json!({"sections": [
        {"id": 1, "name": "Announcements", "description": "News"},
        {"id": 2, "name": "General", "description": "Anything goes"}
    ]}))
}

async fn threads(Path(section_id): Path<i64>) -> Response {
    if section_id != 1 {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"threads": [
        {"id": 10, "title": "Welcome", "author": "admin", "replies": 5},
        {"id": 11, "title": "Guide", "author": "moderator", "replies": 12}
    ]}))
    .into_response()
}

async fn replies(Path(thread_id): Path<i64>) -> Response {
    match thread_id {
        10 => Json(json!({"replies": [
            {"id": 1, "author": "admin", "content": "Welcome!", "timestamp": "2023-01-01 10:00:00"},
            {"id": 2, "author": "alice", "content": "Thanks", "timestamp": "2023-01-01T11:30:00Z"}
        ]}))
        .into_response(),
        99 => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn post_reply(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let Some(user) = session_user(&headers) else {
        return unauthorized();
    };
    let thread_id: i64 = form.get("thread_id").and_then(|t| t.parse().ok()).unwrap_or(0);
    match thread_id {
        10 => Json(json!({
            "success": true,
            "reply": {
                "id": 55,
                "author": user,
                "content": form.get("content"),
                "timestamp": "2024-02-02T09:00:00Z"
            }
        }))
        .into_response(),
        11 => Json(json!({"success": true})).into_response(),
        12 => Json(json!({"success": true, "reply_id": 5})).into_response(),
        _ => Json(json!({"success": false, "message": "thread not found"})).into_response(),
    }
}

async fn create_thread(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    if session_user(&headers).is_none() {
        return Redirect::to("/login").into_response();
    }
    match form.get("section_id").map(String::as_str) {
        Some("1") => Redirect::to("/forum/thread/77").into_response(),
        Some("2") => Json(json!({"success": true, "thread_id": 78})).into_response(),
        _ => Json(json!({"success": true})).into_response(),
    }
}

async fn thread_page(Path(thread_id): Path<i64>) -> Html<String> {
    Html(format!("<html><h1>Thread {}</h1></html>", thread_id))
}

async fn follow(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    if session_user(&headers).is_none() {
        return unauthorized();
    }
    match form.get("username").map(String::as_str) {
        Some("bob") => Json(json!({"success": true, "message": "关注成功"})).into_response(),
        _ => Json(json!({"success": false, "message": "用户不存在"})).into_response(),
    }
}

async fn list_follows(headers: HeaderMap) -> Response {
    if session_user(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({"follows": [{"username": "bob", "nickname": "Bobby"}]})).into_response()
}

async fn change_password(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if session_user(&headers).is_none() {
        return unauthorized();
    }
    if form.get("old_password").map(String::as_str) == Some(PASSWORD) {
        Json(json!({"success": true})).into_response()
    } else {
        Json(json!({"success": false, "message": "当前密码错误"})).into_response()
    }
}

async fn online_count() -> Json<Value> {
    Json(json!({"count": 42}))
}

async fn system_info(headers: HeaderMap) -> Response {
    match session_user(&headers).as_deref() {
        None => unauthorized(),
        Some("admin") => Json(json!({
            "success": true,
            "memory_usage": "128 MB",
            "server_time": "2024-01-01 12:00:00",
            "python_version": "3.11.4",
            "flask_version": "3.0.0",
            "uptime_seconds": 3600
        }))
        .into_response(),
        Some(_) => Json(json!({"success": false, "message": "admin only"})).into_response(),
    }
}
