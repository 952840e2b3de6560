use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes, signup_body};

mod signup {
    use super::*;

    #[tokio::test]
    async fn new_user_can_sign_up_with_valid_details() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SIGNUP, &signup_body("alice"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["is_admin"], false);
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_sign_up_with_a_taken_username() {
        let app = TestApp::spawn().await;
        let first = app
            .post_without_token(routes::SIGNUP, &signup_body("alice"))
            .await;
        assert_eq!(first.status, 201, "First signup failed: {}", first.text);

        let mut body = signup_body("alice");
        body["email"] = json!("other@example.com");
        let res = app.post_without_token(routes::SIGNUP, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_a_taken_email() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::SIGNUP, &signup_body("alice"))
            .await;

        let mut body = signup_body("bob");
        body["email"] = json!("alice@example.com");
        let res = app.post_without_token(routes::SIGNUP, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rejects_short_password_bad_username_and_bad_email() {
        let app = TestApp::spawn().await;

        let mut short = signup_body("alice");
        short["password"] = json!("12345");
        let mut spaced = signup_body("alice");
        spaced["username"] = json!("no spaces!");
        let mut no_at = signup_body("alice");
        no_at["email"] = json!("alice.example.com");

        for body in [short, spaced, no_at] {
            let res = app.post_without_token(routes::SIGNUP, &body).await;
            assert_eq!(res.status, 400, "{}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SIGNUP, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn returns_a_token_and_the_profile() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::SIGNUP, &signup_body("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["user"]["username"], "alice");
        assert_eq!(res.body["user"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::SIGNUP, &signup_body("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "not-it"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ghost", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROFILE).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PROFILE, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn view_update_and_delete() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::PROFILE, &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["github"], "gh/alice");

        let res = app
            .patch_with_token(
                routes::PROFILE,
                &json!({"web_link": "https://alice.dev", "github": ""}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["web_link"], "https://alice.dev");
        assert_eq!(res.body["github"], "gh/alice");

        let res = app.delete_with_token(routes::PROFILE, &token).await;
        assert_eq!(res.status, 200);

        let res = app.get_with_token(routes::PROFILE, &token).await;
        assert_eq!(res.status, 404);

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn email_update_must_stay_unique() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;

        let res = app
            .patch_with_token(routes::PROFILE, &json!({"email": "alice@example.com"}), &bob)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CONFLICT");
    }
}

mod admins {
    use super::*;

    #[tokio::test]
    async fn only_admins_can_create_admins() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let user = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(routes::CREATE_ADMIN, &signup_body("mallory"), &user)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app
            .post_with_token(routes::CREATE_ADMIN, &signup_body("second"), &admin)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["is_admin"], true);
    }
}

mod service {
    use super::*;

    #[tokio::test]
    async fn health_and_openapi_document_are_served() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::HEALTH).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "ok");

        let res = app.get_without_token(routes::OPENAPI).await;
        assert_eq!(res.status, 200);
        assert!(res.body["paths"]["/api/v1/hackathons/{id}/participate"].is_object());
    }

    #[tokio::test]
    async fn storage_outage_is_an_internal_error() {
        let app = TestApp::spawn().await;
        app.store.set_offline(true);

        let res = app.get_without_token(routes::HACKATHONS).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
    }
}

mod bootstrap {
    use server::config::BootstrapAdminConfig;
    use server::seed::seed_bootstrap_admin;

    use super::*;

    #[tokio::test]
    async fn seeding_is_idempotent_and_yields_a_working_admin() {
        let app = TestApp::spawn().await;
        let config = BootstrapAdminConfig {
            username: "root".into(),
            password: PASSWORD.into(),
            email: "root@example.com".into(),
            full_name: "Root".into(),
        };

        assert!(seed_bootstrap_admin(&app.engine, &config).await.unwrap());
        assert!(!seed_bootstrap_admin(&app.engine, &config).await.unwrap());

        let token = app.login("root").await;
        let res = app.get_with_token(routes::UNAPPROVED, &token).await;
        assert_eq!(res.status, 200);
    }
}
