//! Chat core library - exposes the modules for the binary and the tests

pub mod client;
pub mod core;
pub mod delivery;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export the main types to simplify imports
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{Router, middleware, routing::{any, get, post}};
use std::sync::Arc;

/// Builds the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/rooms", configure_room_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .with_state(state)
}

/// Routes for the room directory and everything room-scoped.
fn configure_room_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::{authentication_middleware, room_membership_middleware};
    use services::*;

    // Directory routes need only authentication.
    let directory_routes = Router::new()
        .route("/", get(list_rooms).post(create_room))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    // Room-scoped routes additionally require membership.
    let member_routes = Router::new()
        .route(
            "/{room_id}/messages",
            get(get_room_messages).post(send_message),
        )
        .route("/{room_id}/typing", post(set_typing))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            room_membership_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    directory_routes.merge(member_routes)
}
