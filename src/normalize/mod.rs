//! Normalization of loosely-structured CycloneDX records into findings.

mod extract;
mod findings;
mod index;

pub use extract::{
    extract_affected_refs, extract_cwes, extract_license_names, extract_urls, has_fix_available,
    pick_best_rating, BestRating,
};
pub use findings::normalize_document;
pub use index::ComponentIndex;
