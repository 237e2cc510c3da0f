//! Room services - the room directory
//!
//! Lists the rooms a user belongs to and creates new rooms, publishing
//! room-created events so clients that are not polling still learn of them.

use crate::core::{AppError, AppState};
use crate::delivery::{self, company_channel, user_channel};
use crate::dtos::{CreateRoomDTO, CreateRoomRequest, MessageDTO, RoomDTO, UserDTO};
use crate::entities::{Room, User};
use crate::repositories::participant::CreateParticipantDTO;
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, State},
};
use chrono::Utc;
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Builds the full wire shape of a room: participant list ordered by join
/// time plus the cached last-message preview.
pub(crate) async fn hydrate_room(state: &AppState, room: Room) -> Result<RoomDTO, AppError> {
    let participant_ids: Vec<String> = state
        .participant
        .find_many_by_room_id(&room.room_id)
        .await?
        .into_iter()
        .map(|p| p.user_id)
        .collect();

    let participants: Vec<UserDTO> = state
        .user
        .read_many_ordered(&participant_ids)
        .await?
        .into_iter()
        .map(UserDTO::from)
        .collect();

    let last_message = match &room.last_message_id {
        Some(message_id) => match state.msg.read(message_id).await? {
            Some(message) => {
                let sender = state.user.read(&message.sender_id).await?.ok_or_else(|| {
                    AppError::internal_server_error("Message sender no longer exists")
                })?;
                Some(MessageDTO::from_message(message, sender))
            }
            // stale pointer, treat as no preview
            None => None,
        },
        None => None,
    };

    Ok(RoomDTO::from_room(room, participants, last_message))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<RoomDTO>>, AppError> {
    debug!("Listing rooms for user");
    let rooms = state.room.find_many_by_user_id(&current_user.user_id).await?;

    debug!("User is member of {} rooms", rooms.len());

    // Hydrate every room in parallel; each hydration is a handful of
    // primary-key lookups.
    let rooms_dto: Vec<RoomDTO> = try_join_all(rooms.into_iter().map(|room| {
        let state = state.clone();
        async move { hydrate_room(&state, room).await }
    }))
    .await?;

    info!("Successfully retrieved {} rooms", rooms_dto.len());
    Ok(Json(rooms_dto))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<Json<RoomDTO>, AppError> {
    debug!("Creating new room");
    body.validate()?;

    // The creator is always added implicitly; strip them from the request
    // list along with duplicates.
    let mut other_ids: Vec<String> = Vec::new();
    for id in &body.participant_ids {
        if *id != current_user.user_id && !other_ids.contains(id) {
            other_ids.push(id.clone());
        }
    }

    if other_ids.is_empty() {
        warn!("Room creation attempted without any other participant");
        return Err(AppError::bad_request(
            "A room needs at least one participant besides the creator",
        ));
    }

    let company_id = current_user.company_id.clone().ok_or_else(|| {
        warn!("Room creation attempted by a user with no company");
        AppError::unprocessable_entity("A company is required to create rooms")
    })?;

    // Every listed participant must be a provisioned user.
    let others = state.user.read_many_ordered(&other_ids).await?;
    if others.len() != other_ids.len() {
        warn!("Room creation referenced unknown users");
        return Err(AppError::bad_request("Unknown participant id")
            .with_details("One or more participant ids do not exist"));
    }

    let is_group = others.len() > 1;

    // Optional policy: hand back the existing direct room instead of
    // creating a second one for the same pair.
    if !is_group && state.reuse_direct_rooms {
        if let Some(existing) = state
            .room
            .find_direct_room_between(&current_user.user_id, &others[0].user_id)
            .await?
        {
            info!("Reusing existing direct room {}", existing.room_id);
            let dto = hydrate_room(&state, existing).await?;
            return Ok(Json(dto));
        }
    }

    // Group rooms always carry a name; synthesize one from the display
    // names when the caller did not pick one. Direct rooms stay unnamed,
    // the UI derives a title from the other participant.
    let name = if is_group {
        Some(body.name.clone().unwrap_or_else(|| {
            others
                .iter()
                .map(|u| u.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }))
    } else {
        body.name.clone()
    };

    let now = Utc::now();
    let room = state
        .room
        .create(&CreateRoomDTO {
            name,
            is_group,
            company_id: company_id.clone(),
            created_at: now,
        })
        .await?;

    debug!("Room created with id {}", room.room_id);

    // Creator first, then the others, all in one transaction.
    let mut memberships = vec![CreateParticipantDTO {
        user_id: current_user.user_id.clone(),
        room_id: room.room_id.clone(),
        joined_at: now,
    }];
    memberships.extend(others.iter().map(|u| CreateParticipantDTO {
        user_id: u.user_id.clone(),
        room_id: room.room_id.clone(),
        joined_at: now,
    }));
    state.participant.create_many(&memberships).await?;

    let dto = hydrate_room(&state, room).await?;

    // Fan the creation out twice: once per participant on their personal
    // channel, once on the tenant channel as a fallback for clients whose
    // personal subscription was not up yet. Clients dedupe by room id.
    let payload = serde_json::to_value(&dto)
        .map_err(|e| AppError::internal_server_error("Failed to serialize room").with_details(e.to_string()))?;
    for participant in &dto.participants {
        state.broker.publish(
            &user_channel(&participant.id),
            delivery::EVENT_ROOM_CREATED,
            payload.clone(),
        );
    }
    state.broker.publish(
        &company_channel(&company_id),
        delivery::EVENT_ROOM_CREATED,
        payload,
    );

    info!(
        "Room {} created by user {} with {} participants",
        dto.id,
        current_user.user_id,
        dto.participants.len()
    );
    Ok(Json(dto))
}
