pub mod fallback;
pub mod http;
pub mod traits;
