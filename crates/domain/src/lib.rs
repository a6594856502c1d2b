pub mod block;
pub mod doc;
pub mod validate;

pub use block::{ContentBlock, FeatureCard, StoredBlock};
pub use doc::{
    CategoryDocument, NavItem, PageDocument, PlanDocument, PostDocument, SiteContentDocument,
    SiteContentKey,
};
pub use validate::{FieldError, ValidationError};
