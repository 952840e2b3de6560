mod common;

mod auth;
mod hackathon;
mod notifier;
