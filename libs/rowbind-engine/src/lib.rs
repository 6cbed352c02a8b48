pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod mapper;
pub mod normalize;
pub mod reader;
pub mod writer;

pub use cache::{Direction, PlanCache, PlanKey};
pub use config::MapperSettings;
pub use error::EngineError;
pub use fallback::{ReaderFallback, WriterFallback};
pub use mapper::{Mapper, MapperBuilder};
pub use normalize::NameNormalizer;
pub use reader::{Reader, ReaderPlan};
pub use writer::{Writer, WriterPlan};
