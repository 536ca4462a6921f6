use api_types::user::UserProfile;
use axum::{Extension, Json, extract::State};

use crate::{Principal, ServerError, server::ServerState};

pub async fn me(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<UserProfile>, ServerError> {
    let user = state.auth.profile(user_id).await?;

    Ok(Json(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }))
}
