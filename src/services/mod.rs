pub mod assistant;
pub mod auth;
pub mod backup;
pub mod checkin;
pub mod email;
pub mod feedback;
pub mod menu;
pub mod staff;
pub mod students;
pub mod telegram;
