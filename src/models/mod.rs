pub mod announcement;
pub mod assistant;
pub mod auth;
pub mod checkin;
pub mod feedback;
pub mod knowledge;
pub mod menu;
pub mod staff;
pub mod student;
pub mod user;
