pub mod hackathon;
pub mod health;
pub mod organiser;
pub mod user;
