//! Console 핸들러

pub mod dashboard;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod session;
