//! Synthetic in-memory backend.
//!
//! Deterministic canned responses plus a small mutable database so that
//! follow/gift/purchase flows behave plausibly without a server.

use super::{ApiError, ApiMode, ApiRequest, ApiResponse, HttpMethod, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

/// Mutable state behind the mock backend.
#[derive(Debug, Clone)]
pub struct MockDatabase {
    pub user: Value,
    pub diamonds: u64,
    pub coins: u64,
    pub following: BTreeSet<String>,
    pub blocked: BTreeSet<String>,
    pub streams: Vec<Value>,
    pub transactions: Vec<Value>,
    pub unread_notifications: u32,
    next_stream_id: u64,
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self {
            user: json!({
                "id": "1001",
                "name": "LiveGo Admin",
                "email": "admin@livego.com",
                "level": 12,
                "vip": false,
                "avatar": "https://cdn.livego.dev/avatars/1001.png"
            }),
            diamonds: 5_000,
            coins: 1_200,
            following: BTreeSet::new(),
            blocked: BTreeSet::new(),
            streams: vec![
                mock_stream("1", "Morning music session", "2001", 342),
                mock_stream("2", "Cooking live", "2002", 128),
                mock_stream("3", "Late night talk", "2003", 57),
            ],
            transactions: Vec::new(),
            unread_notifications: 3,
            next_stream_id: 4,
        }
    }
}

fn mock_stream(id: &str, title: &str, host_id: &str, viewers: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "hostId": host_id,
        "viewers": viewers,
        "live": true,
        "category": "general"
    })
}

fn gift_catalog() -> Value {
    json!([
        {"id": "rose", "name": "Rose", "price": 1},
        {"id": "heart", "name": "Heart", "price": 10},
        {"id": "rocket", "name": "Rocket", "price": 500},
        {"id": "castle", "name": "Castle", "price": 2000}
    ])
}

fn diamond_packages() -> Value {
    json!([
        {"id": "pkg-100", "diamonds": 100, "price": 0.99},
        {"id": "pkg-550", "diamonds": 550, "price": 4.99},
        {"id": "pkg-1200", "diamonds": 1200, "price": 9.99}
    ])
}

/// In-memory [`Transport`].
pub struct MockTransport {
    db: Mutex<MockDatabase>,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_database(MockDatabase::default())
    }

    pub fn with_database(db: MockDatabase) -> Self {
        Self {
            db: Mutex::new(db),
            latency: Duration::ZERO,
        }
    }

    /// Simulated per-request latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Copy of the current mock state.
    pub fn database(&self) -> MockDatabase {
        self.db.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn handle(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let path = request.path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let body = request.body.clone().unwrap_or(Value::Null);
        let mut db = self.db.lock().unwrap_or_else(|p| p.into_inner());

        use HttpMethod::*;
        let response = match (request.method, segments.as_slice()) {
            (Get, ["health"]) => json!({"status": "ok", "mode": "mock"}),
            (Get, ["version"]) => json!({"version": env!("CARGO_PKG_VERSION")}),

            // Auth
            (Post, ["auth", "login"]) | (Post, ["auth", "register"]) => {
                let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
                let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
                if email.is_empty() || password.is_empty() {
                    return Err(bad_request("Email and password are required"));
                }
                let mut user = db.user.clone();
                user["email"] = json!(email);
                json!({"token": format!("mock-{}", uuid::Uuid::new_v4()), "user": user})
            }
            (Post, ["auth", "logout"]) => json!({"success": true}),
            (Get, ["auth", "me"]) | (Get, ["users", "me"]) => db.user.clone(),
            (Put, ["users", "me"]) => {
                if let (Some(user), Some(patch)) = (db.user.as_object_mut(), body.as_object()) {
                    for (k, v) in patch {
                        user.insert(k.clone(), v.clone());
                    }
                }
                db.user.clone()
            }

            // Social graph
            (Get, ["users", "friends"]) => json!(db
                .following
                .iter()
                .map(|id| json!({"id": id, "name": format!("User {}", id)}))
                .collect::<Vec<_>>()),
            (Get, ["users", "blocked"]) => json!(db.blocked.iter().collect::<Vec<_>>()),
            (Post, ["users", id, "follow"]) => {
                db.following.insert(id.to_string());
                json!({"following": true, "count": db.following.len()})
            }
            (Delete, ["users", id, "follow"]) => {
                db.following.remove(*id);
                json!({"following": false, "count": db.following.len()})
            }
            (Post, ["users", id, "block"]) => {
                db.blocked.insert(id.to_string());
                json!({"blocked": true})
            }
            (Delete, ["users", id, "block"]) => {
                db.blocked.remove(*id);
                json!({"blocked": false})
            }
            (Get, ["users", id]) => json!({"id": id, "name": format!("User {}", id), "level": 1}),

            // Streams
            (Get, ["streams"])
            | (Get, ["streams", "live"])
            | (Get, ["streams", "featured"])
            | (Get, ["streams", "nearby"])
            | (Get, ["streams", "following"]) => json!(db.streams),
            (Post, ["streams"]) => {
                let id = db.next_stream_id.to_string();
                db.next_stream_id += 1;
                let title = body
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("Untitled stream");
                let host = db.user["id"].as_str().unwrap_or("1001").to_string();
                let stream = mock_stream(&id, title, &host, 0);
                db.streams.push(stream.clone());
                stream
            }
            (Post, ["streams", id, "end"]) => {
                let before = db.streams.len();
                db.streams.retain(|s| s["id"] != json!(id));
                if db.streams.len() == before {
                    return Err(not_found("Stream not found"));
                }
                json!({"ended": true})
            }
            (Get, ["streams", id]) => match db.streams.iter().find(|s| s["id"] == json!(id)) {
                Some(stream) => stream.clone(),
                None => return Err(not_found("Stream not found")),
            },

            // Gifts and wallet
            (Get, ["gifts"]) => gift_catalog(),
            (Post, ["gifts", "send"]) => {
                let gift_id = body.get("giftId").and_then(Value::as_str).unwrap_or("rose");
                let quantity = body.get("quantity").and_then(Value::as_u64).unwrap_or(1);
                let price = gift_catalog()
                    .as_array()
                    .and_then(|gifts| gifts.iter().find(|g| g["id"] == json!(gift_id)))
                    .and_then(|g| g["price"].as_u64())
                    .ok_or_else(|| not_found("Gift not found"))?;
                let cost = price
                    .checked_mul(quantity)
                    .ok_or_else(|| bad_request("Invalid gift quantity"))?;
                if cost > db.diamonds {
                    return Err(ApiError::Http {
                        status: 402,
                        message: "Insufficient diamonds".to_string(),
                    });
                }
                db.diamonds -= cost;
                db.transactions
                    .push(json!({"type": "gift", "giftId": gift_id, "amount": cost}));
                json!({"success": true, "balance": db.diamonds})
            }
            (Get, ["wallet", "balance"]) | (Get, ["diamonds", "balance"]) => {
                json!({"diamonds": db.diamonds, "coins": db.coins})
            }
            (Get, ["wallet", "packages"]) => diamond_packages(),
            (Post, ["wallet", "purchase"]) => {
                let package_id = body
                    .get("packageId")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let amount = diamond_packages()
                    .as_array()
                    .and_then(|p| p.iter().find(|p| p["id"] == json!(package_id)))
                    .and_then(|p| p["diamonds"].as_u64())
                    .ok_or_else(|| not_found("Package not found"))?;
                db.diamonds = db.diamonds.saturating_add(amount);
                db.transactions
                    .push(json!({"type": "purchase", "packageId": package_id, "amount": amount}));
                json!({"success": true, "balance": db.diamonds})
            }
            (Post, ["diamonds", "transfer"]) => {
                let amount = body.get("amount").and_then(Value::as_u64).unwrap_or(0);
                if amount == 0 || amount > db.diamonds {
                    return Err(bad_request("Invalid transfer amount"));
                }
                db.diamonds -= amount;
                json!({"success": true, "balance": db.diamonds})
            }
            (Get, ["wallet", "transactions"]) | (Get, ["diamonds", "history"]) => {
                json!(db.transactions)
            }

            // Notifications
            (Get, ["notifications"]) => {
                json!({"unread": db.unread_notifications, "items": []})
            }
            (Post, ["notifications", "read-all"]) => {
                db.unread_notifications = 0;
                json!({"success": true})
            }

            (Get, _) => json!([]),
            _ => json!({"success": true}),
        };

        Ok(response)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn bad_request(message: &str) -> ApiError {
    ApiError::Http {
        status: 400,
        message: message.to_string(),
    }
}

fn not_found(message: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        message: message.to_string(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn mode(&self) -> ApiMode {
        ApiMode::Mock
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let status = match request.method {
            HttpMethod::Post => 201,
            _ => 200,
        };
        self.handle(&request)
            .map(|body| ApiResponse { status, body })
    }
}
