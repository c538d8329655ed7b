pub mod decoder;
pub mod text;
pub mod throttle;

pub use decoder::ResponseDecoder;
pub use text::{decode_html_entities, decode_text};
pub use throttle::RateThrottle;
