pub mod providers;
pub mod recommendations;
pub mod voice;

pub use recommendations::{recommend, Recommendation, RecommendError, RecommendationEngine};
pub use voice::VoiceHandler;
