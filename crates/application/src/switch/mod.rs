mod decode;
mod service;

pub use decode::decode_response;
pub use service::SwitchService;
