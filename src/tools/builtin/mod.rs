//! Builtin Coles tools
//!
//! One module per tool. Parameter structs double as the input contract: their
//! doc comments become the schema descriptions shown to the host.

pub mod product_details;
pub mod product_search;
pub mod product_slug;

pub use product_details::{ProductDetailsParameters, ProductDetailsTool};
pub use product_search::{ProductSearchParameters, ProductSearchTool};
pub use product_slug::{ProductSlugParameters, ProductSlugTool};
