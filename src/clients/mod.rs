pub mod captcha_client;

pub use captcha_client::{BcsCaptchaClient, CaptchaApi};
