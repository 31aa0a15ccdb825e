pub mod form_flow;
pub mod request_ctx;

pub use form_flow::FormFlow;
pub use request_ctx::RequestCtx;
