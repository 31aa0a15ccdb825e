pub mod captcha_solver;
pub mod form_filler;
pub mod session_store;
pub mod table_extractor;

pub use captcha_solver::CaptchaSolverService;
pub use form_filler::FormFiller;
pub use session_store::{RedisSessionStore, SessionStore};
pub use table_extractor::TableExtractor;
