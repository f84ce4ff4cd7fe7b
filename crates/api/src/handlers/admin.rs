//! Read-only admin overview: aggregate stats plus a filterable project
//! table with urgency flags.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use intake_core::progress::next_incomplete_step;
use intake_core::reminder::{urgency, Urgency};
use intake_core::{Project, ProjectStatus};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Status filter for the overview table.
///
/// `completed` matches projects whose status says so *or* whose rate is
/// 100; the store keeps the two in sync, but the filter stays tolerant of
/// records paused after completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Mean completion rate across every project, rounded.
    pub average_completion: u8,
}

#[derive(Debug, Serialize)]
pub struct ProjectOverview {
    pub id: Uuid,
    pub company_name: String,
    pub manager_name: String,
    pub email: String,
    pub status: ProjectStatus,
    pub completion_rate: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<u8>,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub stats: AdminStats,
    pub projects: Vec<ProjectOverview>,
}

/// GET /api/v1/admin/projects?status=all|active|completed|paused
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> AppResult<Json<DataResponse<AdminOverview>>> {
    let projects = state.store.list().await;
    let now = Utc::now();

    Ok(Json(DataResponse {
        data: build_overview(&projects, params.status, now),
    }))
}

fn build_overview(projects: &[Project], filter: StatusFilter, now: DateTime<Utc>) -> AdminOverview {
    let stats = compute_stats(projects);

    let mut rows: Vec<ProjectOverview> = projects
        .iter()
        .filter(|p| matches_filter(p, filter))
        .map(|p| ProjectOverview {
            id: p.id,
            company_name: p.company_name.clone(),
            manager_name: p.manager_name.clone(),
            email: p.email.clone(),
            status: p.status,
            completion_rate: p.completion_rate,
            next_step: next_incomplete_step(&p.progress).map(|s| s.to_number()),
            urgency: urgency(p, now),
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect();
    // Newest first, matching how operators read the dashboard.
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    AdminOverview {
        stats,
        projects: rows,
    }
}

fn matches_filter(project: &Project, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Active => {
            project.status == ProjectStatus::Active && project.completion_rate < 100
        }
        StatusFilter::Completed => {
            project.status == ProjectStatus::Completed || project.completion_rate == 100
        }
        StatusFilter::Paused => project.status == ProjectStatus::Paused,
    }
}

fn compute_stats(projects: &[Project]) -> AdminStats {
    let total = projects.len();
    let active = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .count();
    let completed = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed || p.completion_rate == 100)
        .count();
    let average_completion = if total == 0 {
        0
    } else {
        let sum: u32 = projects.iter().map(|p| u32::from(p.completion_rate)).sum();
        (f64::from(sum) / total as f64).round() as u8
    };

    AdminStats {
        total,
        active,
        completed,
        average_completion,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
