pub mod guard;
pub mod session;

pub use guard::RouteGuard;
pub use session::{SessionHandle, SessionProvider};
