use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{hackathon, organiser, user};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(user_routes())
        .merge(hackathon_routes())
        .merge(organiser_routes())
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::sign_up))
        .routes(routes!(user::login))
        .routes(routes!(user::create_admin))
        .routes(routes!(
            user::view_profile,
            user::update_profile,
            user::delete_profile
        ))
        .routes(routes!(user::my_hackathons))
}

fn hackathon_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            hackathon::list_hackathons,
            hackathon::create_hackathon
        ))
        .routes(routes!(hackathon::list_organised))
        .routes(routes!(hackathon::list_unapproved))
        .routes(routes!(hackathon::get_hackathon))
        .routes(routes!(hackathon::leaderboard))
        .routes(routes!(hackathon::review_hackathon))
        .routes(routes!(hackathon::participate))
        .routes(routes!(hackathon::submit_work))
}

fn organiser_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(organiser::list_participants))
        .routes(routes!(organiser::list_submissions))
        .routes(routes!(organiser::get_submission))
        .routes(routes!(organiser::judge_submission))
        .routes(routes!(organiser::notify_all))
        .routes(routes!(organiser::notify_participant))
        .routes(routes!(organiser::distribute_prizes))
}
