/// Identifier entity module
pub mod identifier;
/// Result payload entity module
pub mod result_payload;

pub use identifier::Entity as Identifier;
pub use result_payload::Entity as ResultPayload;
