//! Wire format types for provider-specific API protocols
//!
//! Each module contains pure serde structs matching the respective provider's
//! JSON API format. These types are only used for serialization/deserialization
//! at the boundary and are not used internally.
//!
//! Response structs keep every contract-required field optional so the
//! normalizers can report exactly which path a backend left out.

pub mod anthropic;
pub mod google;
pub mod openai;
