//! EToken assembly
//!
//! An [`EToken`] couples the logical content handed to the rational policy
//! with an `emotion_schema`: the same content prefixed by a canonical,
//! versioned header carrying ΔA and the JAST-V projection.

pub mod assembler;
pub mod etoken;
pub mod schema;

pub use assembler::ETokenAssembler;
pub use etoken::EToken;
pub use schema::{EmotionHeader, EMOTION_SCHEMA_VERSION};
