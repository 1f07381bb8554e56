pub mod agent;
pub mod assignment;
pub mod order;
pub mod restaurant;
pub mod suggestion;
