//! Shared fixtures for unit tests.

use time::macros::datetime;
use uuid::Uuid;

use crate::{
    auth::{dto::RegisterRequest, services as auth},
    hackathons::{dto::CreateHackathonRequest, repo_types::HackathonType, services as hackathons},
    skills::SkillList,
    state::AppState,
    teams::{dto::CreateTeamRequest, services as teams},
};

pub async fn register_user(st: &AppState, email: &str, name: &str) -> Uuid {
    auth::register(
        st,
        RegisterRequest {
            email: email.into(),
            password: "password123".into(),
            name: name.into(),
            university: None,
            skills: SkillList::default(),
        },
    )
    .await
    .expect("register")
    .user
    .id
}

pub fn sample_hackathon(title: &str, max_team_size: i32) -> CreateHackathonRequest {
    CreateHackathonRequest {
        title: title.into(),
        description: "48 hours of building".into(),
        start_date: datetime!(2026-03-01 9:00 UTC),
        max_team_size,
        kind: HackathonType::Open,
        url: Some("https://hack.example.com".into()),
    }
}

pub async fn create_hackathon(st: &AppState, organizer: Uuid, max_team_size: i32) -> Uuid {
    hackathons::create(st, organizer, sample_hackathon("Hack", max_team_size))
        .await
        .expect("create hackathon")
        .hackathon
        .id
}

pub fn team_request(name: &str) -> CreateTeamRequest {
    CreateTeamRequest {
        name: name.into(),
        description: "we build things".into(),
        needed_skills: SkillList::from_iter(["Rust", "React"]),
    }
}

pub async fn create_team(st: &AppState, leader: Uuid, hackathon_id: Uuid) -> Uuid {
    teams::create_team(st, leader, hackathon_id, team_request("Team"))
        .await
        .expect("create team")
        .team
        .id
}
