pub mod attendance;
pub mod tokens;
pub mod users;

pub use attendance::AttendanceStore;
pub use tokens::RefreshTokenStore;
pub use users::UserStore;
