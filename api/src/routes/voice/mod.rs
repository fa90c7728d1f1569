pub mod speech_request;
pub mod speech_route;
pub mod voice_ask_route;
