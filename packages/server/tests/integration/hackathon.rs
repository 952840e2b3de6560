use chrono::Duration;
use serde_json::json;

use crate::common::{TestApp, hackathon_body, routes, t0};

mod creation {
    use super::*;

    #[tokio::test]
    async fn user_created_hackathon_waits_for_review() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("olga").await;

        let res = app
            .post_with_token(routes::HACKATHONS, &hackathon_body("Rust Jam"), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["admin_approved"], false);
        assert_eq!(res.body["phase"], "pending_approval");
        assert_eq!(res.body["participants"], 0);

        let public = app.get_without_token(routes::HACKATHONS).await;
        assert_eq!(public.body["hackathons"].as_array().unwrap().len(), 0);
        let details = app.get_without_token(&routes::hackathon(res.id())).await;
        assert_eq!(details.status, 404);
    }

    #[tokio::test]
    async fn admin_created_hackathon_is_approved_at_once() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;

        let res = app
            .post_with_token(routes::HACKATHONS, &hackathon_body("Rust Jam"), &admin)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["admin_approved"], true);
        assert_eq!(res.body["phase"], "approved");
    }

    #[tokio::test]
    async fn rejects_bad_timelines_and_duplicate_titles() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("olga").await;

        let mut short = hackathon_body("Short");
        short["ending_time"] = json!(t0() + Duration::minutes(30));
        let res = app.post_with_token(routes::HACKATHONS, &short, &token).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let mut inverted = hackathon_body("Inverted");
        inverted["result_time"] = json!(t0() + Duration::hours(1));
        let res = app.post_with_token(routes::HACKATHONS, &inverted, &token).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        app.create_hackathon(&token, "Rust Jam").await;
        let res = app
            .post_with_token(routes::HACKATHONS, &hackathon_body("Rust Jam"), &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::HACKATHONS, &hackathon_body("Rust Jam"))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod catalogue {
    use super::*;

    #[tokio::test]
    async fn public_list_shows_approved_hackathons_latest_first() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;

        let early = app.approved_hackathon(&admin, &olga, "Early").await;
        let mut late_body = hackathon_body("Late");
        late_body["starting_time"] = json!(t0() + Duration::days(1));
        late_body["ending_time"] = json!(t0() + Duration::days(1) + Duration::hours(2));
        late_body["result_time"] = json!(t0() + Duration::days(1) + Duration::hours(4));
        let late = app
            .post_with_token(routes::HACKATHONS, &late_body, &olga)
            .await
            .id();
        app.approve(&admin, late).await;
        app.create_hackathon(&olga, "Pending").await;

        let res = app.get_without_token(routes::HACKATHONS).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res.body["hackathons"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![late as i64, early as i64]);
    }

    #[tokio::test]
    async fn details_carry_phase_and_participant_count() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let ada = app.create_authenticated_user("ada").await;
        let id = app.approved_hackathon(&admin, &olga, "Rust Jam").await;
        app.participate(id, &ada).await;

        app.at(Duration::minutes(30));
        let res = app.get_without_token(&routes::hackathon(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Rust Jam");
        assert_eq!(res.body["phase"], "active");
        assert_eq!(res.body["participants"], 1);
    }

    #[tokio::test]
    async fn organiser_sees_own_hackathons_including_pending() {
        let app = TestApp::spawn().await;
        let olga = app.create_authenticated_user("olga").await;
        let ada = app.create_authenticated_user("ada").await;
        app.create_hackathon(&olga, "Mine").await;
        app.create_hackathon(&ada, "Theirs").await;

        let res = app.get_with_token(routes::ORGANISED, &olga).await;

        assert_eq!(res.status, 200);
        let list = res.body["hackathons"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "Mine");
    }

    #[tokio::test]
    async fn my_hackathons_groups_by_phase() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let ada = app.create_authenticated_user("ada").await;
        let id = app.approved_hackathon(&admin, &olga, "Rust Jam").await;
        app.participate(id, &ada).await;

        let res = app.get_with_token(routes::MY_HACKATHONS, &ada).await;
        assert_eq!(res.body["future"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["active"].as_array().unwrap().len(), 0);

        app.at(Duration::hours(1));
        let res = app.get_with_token(routes::MY_HACKATHONS, &ada).await;
        assert_eq!(res.body["active"].as_array().unwrap().len(), 1);

        app.at(Duration::hours(3));
        let res = app.get_with_token(routes::MY_HACKATHONS, &ada).await;
        assert_eq!(res.body["past"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["active"].as_array().unwrap().len(), 0);
    }
}

mod approval {
    use super::*;

    #[tokio::test]
    async fn admin_sees_and_approves_pending_hackathons() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.create_hackathon(&olga, "Rust Jam").await;

        let res = app.get_with_token(routes::UNAPPROVED, &admin).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["hackathons"][0]["id"], id);

        let res = app
            .patch_with_token(&routes::approve(id, "1"), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["outcome"], "approved");
        assert_eq!(app.mail_subjects_to("olga").await, vec!["Approval"]);

        let res = app.get_with_token(routes::UNAPPROVED, &admin).await;
        assert_eq!(res.body["hackathons"].as_array().unwrap().len(), 0);
        let res = app.get_without_token(&routes::hackathon(id)).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn approving_twice_is_a_quiet_no_op() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.approved_hackathon(&admin, &olga, "Rust Jam").await;

        let res = app
            .patch_with_token(&routes::approve(id, "1"), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["outcome"], "already_approved");
        assert_eq!(app.mail_subjects_to("olga").await.len(), 1);
    }

    #[tokio::test]
    async fn disapproval_deletes_the_hackathon() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.create_hackathon(&olga, "Rust Jam").await;

        let res = app
            .patch_with_token(&routes::approve(id, "0"), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["outcome"], "disapproved");

        let res = app.get_with_token(routes::ORGANISED, &olga).await;
        assert_eq!(res.body["hackathons"].as_array().unwrap().len(), 0);

        let res = app
            .patch_with_token(&routes::approve(id, "0"), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn non_admin_is_denied_and_bad_values_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.create_hackathon(&olga, "Rust Jam").await;

        let res = app
            .patch_with_token(&routes::approve(id, "1"), &json!({}), &olga)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app
            .patch_with_token(&routes::approve(id, "2"), &json!({}), &olga)
            .await;
        assert_eq!(res.status, 403, "{}", res.text);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app.get_with_token(routes::UNAPPROVED, &olga).await;
        assert_eq!(res.status, 403);

        let res = app
            .patch_with_token(&routes::approve(id, "yes"), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn deleted_admin_token_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.create_hackathon(&olga, "Rust Jam").await;

        let res = app.delete_with_token(routes::PROFILE, &admin).await;
        assert_eq!(res.status, 200);

        let res = app
            .patch_with_token(&routes::approve(id, "1"), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 401, "{}", res.text);
        assert_eq!(res.body["code"], "TOKEN_INVALID");

        let res = app.get_with_token(routes::UNAPPROVED, &admin).await;
        assert_eq!(res.status, 401);
        let res = app.get_without_token(&routes::hackathon(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn approval_mail_failure_keeps_the_decision() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let olga = app.create_authenticated_user("olga").await;
        let id = app.create_hackathon(&olga, "Rust Jam").await;
        app.notifier.fail_for("olga@example.com").await;

        let res = app
            .patch_with_token(&routes::approve(id, "1"), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "NOTIFICATION_FAILED");
        let res = app.get_without_token(&routes::hackathon(id)).await;
        assert_eq!(res.status, 200);
    }
}
