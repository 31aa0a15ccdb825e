pub mod captcha;
pub mod query;
pub mod reply;
pub mod session;

pub use captcha::{CaptchaSolution, CaptchaStatus};
pub use query::{DateParts, UserQuery};
pub use reply::{Reply, TableRows};
pub use session::{Session, StoredCookie};
