pub mod dispatch;
pub mod lookup;
pub mod ranking;
