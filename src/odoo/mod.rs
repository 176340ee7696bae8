pub mod client;
pub mod codec;
pub mod store;
pub mod value;

pub use client::{Credentials, OdooClient};
pub use codec::{decode_response, encode_call};
pub use store::{DomainTerm, RecordStore, Vals};
pub use value::Value;
