use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use lifecycle::notify::{Notifier, NotifyError, compose_body};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use server::config::NotifyConfig;
use server::notifier::HttpRelayNotifier;

const SENDER: &str = "no-reply@winathon.test";
const SIGNATURE: &str = "Win-a-thon Team";

type Inbox = Arc<Mutex<Vec<Value>>>;

/// Stand-in relay: bounces `bounce*` recipients, is down for `outage*` ones.
async fn relay(State(inbox): State<Inbox>, Json(mail): Json<Value>) -> StatusCode {
    let to = mail["to"].as_str().unwrap_or_default().to_string();
    inbox.lock().await.push(mail);
    if to.starts_with("bounce") {
        StatusCode::UNPROCESSABLE_ENTITY
    } else if to.starts_with("outage") {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::ACCEPTED
    }
}

async fn spawn_relay() -> (String, Inbox) {
    let inbox = Inbox::default();
    let app = Router::new()
        .route("/mail", post(relay))
        .with_state(inbox.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/mail"), inbox)
}

fn notifier(url: &str) -> HttpRelayNotifier {
    let config = NotifyConfig {
        relay_url: Some(url.to_string()),
        sender: SENDER.to_string(),
        signature: SIGNATURE.to_string(),
    };
    HttpRelayNotifier::new(url, &config).expect("Failed to build relay client")
}

#[tokio::test]
async fn posts_composed_mail_to_relay() {
    let (url, inbox) = spawn_relay().await;

    notifier(&url)
        .send("ada@example.com", "Approval", "Yay!")
        .await
        .unwrap();

    let received = inbox.lock().await.clone();
    assert_eq!(
        received,
        vec![json!({
            "from": SENDER,
            "to": "ada@example.com",
            "subject": "Approval",
            "body": compose_body("Yay!", SIGNATURE),
        })]
    );
    assert!(
        received[0]["body"]
            .as_str()
            .unwrap()
            .starts_with("Dear User,\r\n\r\nYay!")
    );
}

#[tokio::test]
async fn client_errors_are_rejections() {
    let (url, inbox) = spawn_relay().await;

    let err = notifier(&url)
        .send("bounce@example.com", "Hello", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Rejected(_)), "{err:?}");
    assert_eq!(inbox.lock().await.len(), 1);
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let (url, _) = spawn_relay().await;

    let err = notifier(&url)
        .send("outage@example.com", "Hello", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_relay_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = notifier(&format!("http://{addr}/mail"))
        .send("ada@example.com", "Hello", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Transport(_)), "{err:?}");
}
