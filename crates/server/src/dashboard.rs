use api_types::dashboard::{DashboardQuery, DashboardSummary};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::Utc;
use engine::period::month_period;

use crate::{Principal, ServerError, server::ServerState};

/// Summary of the requested month, the current one by default.
pub async fn summary(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardSummary>, ServerError> {
    let Query(query) = query?;
    let period = month_period(state.zone, query.month, query.year, Utc::now())?;

    let summary = state
        .dashboard
        .summarize(user_id, period.start_utc(), period.end_utc())
        .await?;

    Ok(Json(DashboardSummary {
        total_balance: summary.total_balance,
        total_income: summary.total_income,
        total_expense: summary.total_expense,
    }))
}
