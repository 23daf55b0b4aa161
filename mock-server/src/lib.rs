//! Test server for exercising `basic-network` over real HTTP.
//!
//! Routes:
//! - `/items`, `/items/{id}`: in-memory CRUD with sequential ids
//! - `/echo`: any method, answers with the method, headers and JSON body it got
//! - `/status/{code}`: any method, answers with that status and no body
//! - `/delay/{ms}`: sleeps before answering `{}`
//! - `/bytes/{n}`: answers with `n` bytes of `b'x'` (capped at 64 MiB)

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
}

/// What `/echo` saw. Header names are lowercase, as `http` stores them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Store {
    last_id: u64,
    items: BTreeMap<u64, Item>,
}

pub type Db = Arc<RwLock<Store>>;

const MAX_BYTES: usize = 64 * 1024 * 1024;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/delay/{ms}", get(delay))
        .route("/bytes/{n}", get(bytes))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let store = db.read().await;
    Json(store.items.values().cloned().collect())
}

async fn create_item(State(db): State<Db>, Json(input): Json<NewItem>) -> (StatusCode, Json<Item>) {
    let mut store = db.write().await;
    store.last_id += 1;
    let item = Item {
        id: store.last_id,
        name: input.name,
    };
    store.items.insert(item.id, item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn get_item(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Item>, StatusCode> {
    let store = db.read().await;
    store.items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<ItemUpdate>,
) -> Result<Json<Item>, StatusCode> {
    let mut store = db.write().await;
    let item = store.items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        item.name = name;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())))
    };
    Json(Echo {
        method: method.to_string(),
        headers,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn delay(Path(ms): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(Value::Object(Default::default()))
}

async fn bytes(Path(n): Path<usize>) -> Vec<u8> {
    vec![b'x'; n.min(MAX_BYTES)]
}
