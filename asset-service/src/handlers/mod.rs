pub mod assets;
pub mod assignments;
pub mod auth;
pub mod branches;
pub mod departments;
pub mod health;
pub mod notifications;
pub mod organizations;
pub mod users;
