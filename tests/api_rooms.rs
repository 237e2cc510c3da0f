//! Integration tests for the room directory endpoints

mod common;

#[cfg(test)]
mod room_tests {
    use super::common::{create_test_jwt, create_test_server, create_test_state, TEST_JWT_SECRET};
    use axum_test::http::HeaderName;
    use huddle::client::RoomCache;
    use huddle::core::AppState;
    use huddle::dtos::RoomDTO;
    use serde_json::json;
    use sqlx::SqlitePool;
    use std::sync::Arc;

    // ============================================================
    // GET /rooms - list_rooms
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "rooms")))]
    async fn test_list_rooms_success(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .get("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .await;

        response.assert_status_ok();
        let rooms: Vec<serde_json::Value> = response.json();
        assert_eq!(rooms.len(), 1);

        let room = &rooms[0];
        assert_eq!(room["id"], "r-main");
        assert_eq!(room["isGroup"], false);
        assert_eq!(room["companyId"], "acme");

        let participants = room["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 2);
        let names: Vec<&str> = participants
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Alice") && names.contains(&"Bob"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "rooms")))]
    async fn test_list_rooms_empty_for_user_without_rooms(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-carol");

        let response = server
            .get("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .await;

        // Empty sequence, never an error.
        response.assert_status_ok();
        let rooms: Vec<serde_json::Value> = response.json();
        assert!(rooms.is_empty());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "rooms")))]
    async fn test_list_rooms_without_token(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server.get("/rooms").await;

        response.assert_status_unauthorized();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "rooms")))]
    async fn test_list_rooms_with_invalid_token(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .get("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                "Bearer invalid_token_here",
            )
            .await;

        response.assert_status_unauthorized();
        Ok(())
    }

    // ============================================================
    // POST /rooms - create_room
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_direct_room_success(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-bob"] }))
            .await;

        response.assert_status_ok();
        let room: serde_json::Value = response.json();
        assert_eq!(room["isGroup"], false);
        assert_eq!(room["companyId"], "acme");

        // Creator first, then the invitee.
        let participants = room["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0]["id"], "u-alice");
        assert_eq!(participants[1]["id"], "u-bob");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_group_room_synthesizes_name(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-bob", "u-carol"] }))
            .await;

        response.assert_status_ok();
        let room: serde_json::Value = response.json();
        assert_eq!(room["isGroup"], true);
        assert_eq!(room["name"], "Bob, Carol");
        assert_eq!(room["participants"].as_array().unwrap().len(), 3);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_group_room_keeps_explicit_name(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-bob", "u-carol"], "name": "Leave planning" }))
            .await;

        response.assert_status_ok();
        let room: serde_json::Value = response.json();
        assert_eq!(room["name"], "Leave planning");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_room_rejects_empty_participants(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": [] }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_room_rejects_creator_only(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        // The creator is stripped from the list, leaving nobody.
        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-alice"] }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_room_requires_company(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-drifter"); // no company_id

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-alice"] }))
            .await;

        response.assert_status(axum_test::http::StatusCode::UNPROCESSABLE_ENTITY);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_room_rejects_unknown_participant(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-nobody"] }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_repeated_create_yields_distinct_rooms(pool: SqlitePool) -> sqlx::Result<()> {
        // Default policy: every create makes a new room, even for the same
        // participant pair.
        let state = create_test_state(pool);
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");
        let body = json!({ "participantIds": ["u-bob"] });

        let first: serde_json::Value = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&body)
            .await
            .json();
        let second: serde_json::Value = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&body)
            .await
            .json();

        assert_ne!(first["id"], second["id"]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_reuse_policy_returns_existing_direct_room(pool: SqlitePool) -> sqlx::Result<()> {
        let state = Arc::new(
            AppState::new(pool, TEST_JWT_SECRET.to_string()).with_reuse_direct_rooms(true),
        );
        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");
        let body = json!({ "participantIds": ["u-bob"] });

        let first: serde_json::Value = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&body)
            .await
            .json();
        let second: serde_json::Value = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&body)
            .await
            .json();

        assert_eq!(first["id"], second["id"]);
        Ok(())
    }

    // ============================================================
    // room-created fan-out and client-side dedup
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_room_publishes_on_both_channels(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);

        // Bob's client is subscribed on its personal channel and on the
        // tenant channel, so it will see the creation twice.
        let mut personal_rx = state.broker.subscribe("user-u-bob");
        let mut company_rx = state.broker.subscribe("company-acme");

        let server = create_test_server(state);
        let token = create_test_jwt("u-alice");

        let response = server
            .post("/rooms")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "participantIds": ["u-bob"] }))
            .await;
        response.assert_status_ok();
        let created: serde_json::Value = response.json();

        let personal_event = personal_rx.try_recv().expect("personal channel event");
        let company_event = company_rx.try_recv().expect("company channel event");
        assert_eq!(personal_event.event, "room-created");
        assert_eq!(company_event.event, "room-created");
        assert_eq!(personal_event.data["id"], created["id"]);
        assert_eq!(company_event.data["id"], created["id"]);

        // Feeding both deliveries into the cache must be idempotent.
        let room_a: RoomDTO = serde_json::from_value(personal_event.data.clone()).unwrap();
        let room_b: RoomDTO = serde_json::from_value(company_event.data.clone()).unwrap();
        let mut cache = RoomCache::new();
        cache.apply_room_created(room_a);
        cache.apply_room_created(room_b);
        assert_eq!(cache.rooms().len(), 1);

        Ok(())
    }
}
