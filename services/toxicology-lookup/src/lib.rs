//! Toxicology lookup for cosmetic ingredients.
//!
//! Resolves an ingredient to its CIR safety report and ECHA registration
//! dossier, then pulls NOAEL, LD50 and DNEL mentions out of their text.

pub mod cir_client;
pub mod echa_client;
pub mod extraction;
pub mod highlight;
pub mod http;
pub mod pdf_processor;
pub mod routes;
pub mod service;
pub mod similarity;
pub mod store;

pub use routes::create_router;
pub use service::LookupService;
pub use store::Store;
