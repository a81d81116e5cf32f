use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::database::DocumentStore;
use crate::error::panic_response;
use crate::handlers::{protected, public};
use crate::middleware::limited_listing;
use crate::services::{RecipeService, ReviewService};

/// Everything a handler may touch. The store is opened once at startup and
/// shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub recipes: RecipeService,
    pub reviews: ReviewService,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            recipes: RecipeService::new(store.clone()),
            reviews: ReviewService::new(store.clone()),
            store,
            tokens,
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .merge(auth_routes())
        .merge(recipe_routes(state.clone()))
        .merge(review_routes())
        .fallback(public::root::fallback)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/v1/auth", post(public::auth::token_post))
}

fn recipe_routes(state: AppState) -> Router<AppState> {
    use public::recipes;

    Router::new()
        .route(
            "/api/v1/recipes",
            // The limit short-circuit wraps only the listing, not creation.
            get(recipes::list)
                .route_layer(from_fn_with_state(state, limited_listing))
                .post(recipes::create),
        )
        .route("/api/v1/recipes/:id", get(recipes::get))
}

fn review_routes() -> Router<AppState> {
    use public::reviews;

    Router::new()
        .route(
            "/api/v1/reviews",
            get(protected::reviews::list_mine).post(reviews::create),
        )
        .route("/api/v1/reviews/", get(protected::reviews::list_mine))
        .route("/api/v1/review/:reviewId", get(reviews::get))
        .route(
            "/api/v1/reviews/:reviewId",
            get(reviews::list_for_recipe)
                .delete(reviews::delete)
                .patch(reviews::update),
        )
}
