// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use parkeo::api::client::ApiClient;
use parkeo::models::client::{Client, NewClient, PaymentStatus};
use parkeo::models::config::ParkingConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockUser {
    pub id: u64,
    pub user: String,
    #[serde(rename = "contraseña")]
    pub password: String,
}

#[derive(Deserialize)]
struct UserBody {
    user: String,
    #[serde(rename = "contraseña")]
    password: String,
}

#[derive(Deserialize)]
struct ClientPatch {
    estado: Option<PaymentStatus>,
}

/// In-memory stand-in for the remote parking service
#[derive(Debug)]
pub struct MockDb {
    pub clients: Vec<Client>,
    pub users: Vec<MockUser>,
    pub config: Option<ParkingConfig>,
    pub next_id: u64,
    /// Make every DELETE answer 500
    pub fail_deletes: bool,
    /// Method and path of every request received
    pub requests: Vec<String>,
}

impl MockDb {
    pub fn new(slot: u32, precio: f64) -> Self {
        Self {
            clients: Vec::new(),
            users: vec![
                MockUser {
                    id: 1,
                    user: "adminRoot".to_string(),
                    password: "root-pw".to_string(),
                },
                MockUser {
                    id: 2,
                    user: "operador".to_string(),
                    password: "op-pw".to_string(),
                },
            ],
            config: Some(ParkingConfig { slot, precio }),
            next_id: 100,
            fail_deletes: false,
            requests: Vec::new(),
        }
    }

    pub fn park(&mut self, cedula: &str, matricula: &str, precio: f64, estado: PaymentStatus) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.clients.push(Client {
            id,
            cedula: cedula.to_string(),
            matricula: matricula.to_string(),
            precio,
            estado,
        });
        id
    }

    fn log(&mut self, entry: String) {
        self.requests.push(entry);
    }
}

pub type SharedDb = Arc<Mutex<MockDb>>;

pub struct MockService {
    pub base_url: String,
    pub db: SharedDb,
}

impl MockService {
    pub async fn start(db: MockDb) -> Self {
        let db = Arc::new(Mutex::new(db));

        let app = Router::new()
            .route("/users", get(list_users).post(create_user))
            .route("/users/{id}", axum::routing::put(update_user).delete(delete_user))
            .route("/clients", get(list_clients).post(create_client))
            .route(
                "/clients/{id}",
                axum::routing::put(update_client).delete(delete_client),
            )
            .route(
                "/clients/cedula/{cedula}",
                get(client_by_cedula).delete(delete_client_by_cedula),
            )
            .route("/config/{id}", get(get_config).put(put_config))
            .with_state(Arc::clone(&db));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            db,
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn client_count(&self) -> usize {
        self.db.lock().unwrap().clients.len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.db.lock().unwrap().requests.clone()
    }
}

async fn list_users(State(db): State<SharedDb>) -> Json<Vec<MockUser>> {
    let mut db = db.lock().unwrap();
    db.log("GET /users".to_string());
    Json(db.users.clone())
}

async fn create_user(State(db): State<SharedDb>, Json(body): Json<UserBody>) -> Response {
    let mut db = db.lock().unwrap();
    db.log("POST /users".to_string());
    let user = MockUser {
        id: db.next_id,
        user: body.user,
        password: body.password,
    };
    db.next_id += 1;
    db.users.push(user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn update_user(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
    Json(body): Json<UserBody>,
) -> Response {
    let mut db = db.lock().unwrap();
    db.log(format!("PUT /users/{}", id));
    match db.users.iter_mut().find(|u| u.id == id) {
        Some(user) => {
            user.user = body.user;
            user.password = body.password;
            Json(user.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_user(State(db): State<SharedDb>, Path(id): Path<u64>) -> StatusCode {
    let mut db = db.lock().unwrap();
    db.log(format!("DELETE /users/{}", id));
    if db.fail_deletes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = db.users.len();
    db.users.retain(|u| u.id != id);
    if db.users.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn list_clients(State(db): State<SharedDb>) -> Json<Vec<Client>> {
    let mut db = db.lock().unwrap();
    db.log("GET /clients".to_string());
    Json(db.clients.clone())
}

async fn create_client(State(db): State<SharedDb>, Json(body): Json<NewClient>) -> Response {
    let mut db = db.lock().unwrap();
    db.log("POST /clients".to_string());
    let id = db.park(&body.cedula, &body.matricula, body.precio, body.estado);
    let created = db.clients.iter().find(|c| c.id == id).cloned();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_client(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
    Json(patch): Json<ClientPatch>,
) -> Response {
    let mut db = db.lock().unwrap();
    db.log(format!("PUT /clients/{}", id));
    match db.clients.iter_mut().find(|c| c.id == id) {
        Some(client) => {
            if let Some(estado) = patch.estado {
                client.estado = estado;
            }
            Json(client.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_client(State(db): State<SharedDb>, Path(id): Path<u64>) -> StatusCode {
    let mut db = db.lock().unwrap();
    db.log(format!("DELETE /clients/{}", id));
    if db.fail_deletes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    db.clients.retain(|c| c.id != id);
    StatusCode::NO_CONTENT
}

async fn client_by_cedula(State(db): State<SharedDb>, Path(cedula): Path<String>) -> Response {
    let mut db = db.lock().unwrap();
    db.log(format!("GET /clients/cedula/{}", cedula));
    match db.clients.iter().find(|c| c.cedula == cedula) {
        Some(client) => Json(client.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_client_by_cedula(State(db): State<SharedDb>, Path(cedula): Path<String>) -> StatusCode {
    let mut db = db.lock().unwrap();
    db.log(format!("DELETE /clients/cedula/{}", cedula));
    if db.fail_deletes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    db.clients.retain(|c| c.cedula != cedula);
    StatusCode::NO_CONTENT
}

async fn get_config(State(db): State<SharedDb>, Path(id): Path<u32>) -> Response {
    let mut db = db.lock().unwrap();
    db.log(format!("GET /config/{}", id));
    match (id, db.config) {
        (1, Some(config)) => Json(serde_json::json!({
            "id": 1,
            "slot": config.slot,
            "precio": config.precio,
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_config(
    State(db): State<SharedDb>,
    Path(id): Path<u32>,
    Json(config): Json<ParkingConfig>,
) -> StatusCode {
    let mut db = db.lock().unwrap();
    db.log(format!("PUT /config/{}", id));
    if id != 1 {
        return StatusCode::NOT_FOUND;
    }
    db.config = Some(config);
    StatusCode::OK
}
