pub mod recipe_service;
pub mod review_service;

pub use recipe_service::{ListingShape, RecipeService, RECIPE_SUMMARY_FIELDS};
pub use review_service::ReviewService;
