use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lifecycle::LifecycleEngine;
use lifecycle::account::Registration;
use lifecycle::clock::ManualClock;
use lifecycle::notify::RecordingNotifier;
use lifecycle::store::InMemoryStore;
use reqwest::Client;
use serde_json::{Value, json};

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, NotifyConfig, ServerConfig,
};
use server::state::AppState;
use server::utils::hash;

pub const PASSWORD: &str = "secret1";

pub mod routes {
    pub const SIGNUP: &str = "/api/v1/users/signup";
    pub const LOGIN: &str = "/api/v1/users/login";
    pub const CREATE_ADMIN: &str = "/api/v1/users/admin";
    pub const PROFILE: &str = "/api/v1/users";
    pub const MY_HACKATHONS: &str = "/api/v1/users/hackathons";
    pub const HACKATHONS: &str = "/api/v1/hackathons";
    pub const ORGANISED: &str = "/api/v1/hackathons/organise";
    pub const UNAPPROVED: &str = "/api/v1/hackathons/unapproved";
    pub const HEALTH: &str = "/health";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn hackathon(id: i32) -> String {
        format!("/api/v1/hackathons/{id}")
    }

    pub fn leaderboard(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/leaderboard")
    }

    pub fn approve(id: i32, value: &str) -> String {
        format!("/api/v1/hackathons/{id}/approve/{value}")
    }

    pub fn participate(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/participate")
    }

    pub fn submit(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/submit")
    }

    pub fn participants(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/participants")
    }

    pub fn submissions(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/submissions")
    }

    pub fn submission(id: i32, username: &str) -> String {
        format!("/api/v1/hackathons/{id}/users/{username}/submission")
    }

    pub fn judge(id: i32, username: &str) -> String {
        format!("/api/v1/hackathons/{id}/submissions/{username}/judge")
    }

    pub fn notify_all(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/notify")
    }

    pub fn notify_participant(id: i32, username: &str) -> String {
        format!("/api/v1/hackathons/{id}/notify/{username}")
    }

    pub fn prize_distribution(id: i32) -> String {
        format!("/api/v1/hackathons/{id}/prize_distribution")
    }
}

/// Start of every hackathon created through [`TestApp::create_hackathon`].
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 9, 0, 0).unwrap()
}

pub fn email_of(username: &str) -> String {
    format!("{username}@example.com")
}

/// A running test server backed by in-memory collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub engine: LifecycleEngine,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    /// Serve the real router on a random port. The clock starts one day before [`t0`].
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(t0() - Duration::days(1)));
        let engine = LifecycleEngine::new(store.clone(), notifier.clone(), clock.clone());

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
            },
            notify: NotifyConfig {
                relay_url: None,
                sender: "no-reply@test.local".to_string(),
                signature: "Test Team".to_string(),
            },
            bootstrap_admin: None,
        };

        let state = AppState {
            engine: engine.clone(),
            config: Arc::new(app_config),
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            engine,
            store,
            notifier,
            clock,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Move the clock to `t0 + offset`.
    pub fn at(&self, offset: Duration) {
        self.clock.set(t0() + offset);
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn login(&self, username: &str) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({"username": username, "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Sign up a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str) -> String {
        let reg = self
            .post_without_token(routes::SIGNUP, &signup_body(username))
            .await;
        assert_eq!(reg.status, 201, "Signup failed: {}", reg.text);

        self.login(username).await
    }

    /// Seed an admin the way startup does, then log in.
    pub async fn create_admin(&self, username: &str) -> String {
        let registration = Registration {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            full_name: format!("Admin {username}"),
            email: email_of(username),
            linked_in: String::new(),
            github: String::new(),
            web_link: String::new(),
            organisation: String::new(),
        };
        self.engine
            .bootstrap_admin(registration, |p: &str| {
                Ok(hash::hash_password(p).expect("hashing failed"))
            })
            .await
            .expect("Failed to seed admin");

        self.login(username).await
    }

    /// Create a hackathon starting at [`t0`] (two hours of hacking, two of judging).
    pub async fn create_hackathon(&self, token: &str, title: &str) -> i32 {
        let res = self
            .post_with_token(routes::HACKATHONS, &hackathon_body(title), token)
            .await;
        assert_eq!(res.status, 201, "create_hackathon failed: {}", res.text);
        res.id()
    }

    pub async fn approve(&self, admin_token: &str, id: i32) {
        let res = self
            .patch_with_token(&routes::approve(id, "1"), &json!({}), admin_token)
            .await;
        assert_eq!(res.status, 200, "approve failed: {}", res.text);
    }

    /// Create and approve a hackathon organised by the holder of `token`.
    pub async fn approved_hackathon(&self, admin_token: &str, token: &str, title: &str) -> i32 {
        let id = self.create_hackathon(token, title).await;
        self.approve(admin_token, id).await;
        id
    }

    pub async fn participate(&self, id: i32, token: &str) {
        let res = self
            .post_with_token(&routes::participate(id), &json!({}), token)
            .await;
        assert_eq!(res.status, 201, "participate failed: {}", res.text);
    }

    pub async fn mail_subjects_to(&self, username: &str) -> Vec<String> {
        self.notifier
            .sent_to(&email_of(username))
            .await
            .into_iter()
            .map(|m| m.subject)
            .collect()
    }
}

pub fn signup_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": PASSWORD,
        "full_name": format!("User {username}"),
        "email": email_of(username),
        "github": format!("gh/{username}"),
    })
}

pub fn hackathon_body(title: &str) -> Value {
    json!({
        "title": title,
        "starting_time": t0(),
        "ending_time": t0() + Duration::hours(2),
        "result_time": t0() + Duration::hours(4),
        "organisation_name": "Crabs Inc",
        "description": "Build something fast",
    })
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
