//! In-process store used by unit tests. One mutex guards all tables, which
//! gives every method the atomicity the PostgreSQL transactions provide.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{StoreError, StoreResult, JOIN_REQUESTS_TEAM_USER_KEY, USERS_EMAIL_KEY};
use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, ProfileChanges, User},
    },
    hackathons::{
        repo::HackathonRepo,
        repo_types::{Hackathon, HackathonSummary, NewHackathon},
    },
    membership::{
        repo::RequestRepo,
        repo_types::{JoinRequest, MyRequest, RequestWithApplicant, StatusUpdate, UpdateOutcome},
        status::RequestStatus,
    },
    qna::{
        repo::QnaRepo,
        repo_types::{Answer, NewAnswer, NewQuestion, Question, QuestionSummary},
    },
    teams::{
        repo::TeamRepo,
        repo_types::{NewTeam, Team, TeamChanges, TeamSummary},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    hackathons: Vec<Hackathon>,
    teams: Vec<Team>,
    requests: Vec<JoinRequest>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    votes: Vec<(Uuid, Uuid)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn approved(&self, team_id: Uuid) -> impl Iterator<Item = &JoinRequest> {
        self.requests
            .iter()
            .filter(move |r| r.team_id == team_id && r.status == RequestStatus::Approved)
    }

    fn hackathon_summary(&self, h: &Hackathon) -> HackathonSummary {
        let current_members = self
            .teams
            .iter()
            .filter(|t| t.hackathon_id == h.id)
            .map(|t| self.approved(t.id).count() as i64)
            .sum();
        HackathonSummary {
            hackathon: h.clone(),
            current_members,
        }
    }

    fn question_summary(&self, q: &Question) -> QuestionSummary {
        QuestionSummary {
            question: q.clone(),
            upvotes: self.votes.iter().filter(|(qid, _)| *qid == q.id).count() as i64,
        }
    }

    fn team_summary(&self, t: &Team) -> Option<TeamSummary> {
        let leader = self.user(t.leader_id)?;
        let member_names: Vec<String> = self
            .approved(t.id)
            .filter_map(|r| self.user(r.user_id).map(|u| u.name.clone()))
            .collect();
        Some(TeamSummary {
            team: t.clone(),
            leader_name: leader.name.clone(),
            leader_email: leader.email.clone(),
            current_members: self.approved(t.id).count() as i64,
            member_names,
        })
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == new.email) {
            return Err(unique(USERS_EMAIL_KEY));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            university: new.university,
            skills: new.skills,
            photo_key: None,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock().user(id).cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>> {
        let mut t = self.lock();
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(university) = changes.university {
            user.university = university;
        }
        if let Some(skills) = changes.skills {
            user.skills = skills;
        }
        if let Some(key) = changes.photo_key {
            user.photo_key = Some(key);
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl HackathonRepo for MemoryStore {
    async fn insert_hackathon(&self, new: NewHackathon) -> StoreResult<Hackathon> {
        let hackathon = Hackathon {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            start_date: new.start_date,
            max_team_size: new.max_team_size,
            kind: new.kind,
            url: new.url,
            created_by: new.created_by,
            organizer_name: new.organizer_name,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().hackathons.push(hackathon.clone());
        Ok(hackathon)
    }

    async fn list_hackathons(&self) -> StoreResult<Vec<HackathonSummary>> {
        let t = self.lock();
        let mut rows: Vec<_> = t.hackathons.iter().map(|h| t.hackathon_summary(h)).collect();
        rows.sort_by_key(|s| s.hackathon.start_date);
        Ok(rows)
    }

    async fn find_hackathon(&self, id: Uuid) -> StoreResult<Option<HackathonSummary>> {
        let t = self.lock();
        Ok(t.hackathons
            .iter()
            .find(|h| h.id == id)
            .map(|h| t.hackathon_summary(h)))
    }
}

#[async_trait]
impl TeamRepo for MemoryStore {
    async fn create_team_with_leader(&self, new: NewTeam) -> StoreResult<Team> {
        let mut t = self.lock();
        let now = OffsetDateTime::now_utc();
        let team = Team {
            id: Uuid::new_v4(),
            name: new.name,
            hackathon_id: new.hackathon_id,
            leader_id: new.leader_id,
            description: new.description,
            needed_skills: new.needed_skills,
            created_at: now,
        };
        t.requests.push(JoinRequest {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id: team.leader_id,
            status: RequestStatus::Approved,
            rejection_reason: None,
            created_at: now,
        });
        t.teams.push(team.clone());
        Ok(team)
    }

    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.lock().teams.iter().find(|t| t.id == id).cloned())
    }

    async fn find_team_summary(&self, id: Uuid) -> StoreResult<Option<TeamSummary>> {
        let t = self.lock();
        Ok(t.teams
            .iter()
            .find(|team| team.id == id)
            .and_then(|team| t.team_summary(team)))
    }

    async fn list_team_summaries(&self, hackathon_id: Uuid) -> StoreResult<Vec<TeamSummary>> {
        let t = self.lock();
        Ok(t.teams
            .iter()
            .filter(|team| team.hackathon_id == hackathon_id)
            .filter_map(|team| t.team_summary(team))
            .collect())
    }

    async fn update_team(&self, id: Uuid, changes: TeamChanges) -> StoreResult<Option<Team>> {
        let mut t = self.lock();
        let Some(team) = t.teams.iter_mut().find(|team| team.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            team.name = name;
        }
        if let Some(description) = changes.description {
            team.description = description;
        }
        if let Some(skills) = changes.needed_skills {
            team.needed_skills = skills;
        }
        Ok(Some(team.clone()))
    }

    async fn delete_team(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock();
        t.requests.retain(|r| r.team_id != id);
        let before = t.teams.len();
        t.teams.retain(|team| team.id != id);
        Ok(t.teams.len() < before)
    }
}

#[async_trait]
impl RequestRepo for MemoryStore {
    async fn insert_request(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<JoinRequest> {
        let mut t = self.lock();
        if !t.teams.iter().any(|team| team.id == team_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "foreign key violation: team {team_id}"
            )));
        }
        if t
            .requests
            .iter()
            .any(|r| r.team_id == team_id && r.user_id == user_id)
        {
            return Err(unique(JOIN_REQUESTS_TEAM_USER_KEY));
        }
        let request = JoinRequest {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            status: RequestStatus::Pending,
            rejection_reason: None,
            created_at: OffsetDateTime::now_utc(),
        };
        t.requests.push(request.clone());
        Ok(request)
    }

    async fn find_request(&self, id: Uuid) -> StoreResult<Option<JoinRequest>> {
        Ok(self.lock().requests.iter().find(|r| r.id == id).cloned())
    }

    async fn update_request_status(&self, update: StatusUpdate) -> StoreResult<UpdateOutcome> {
        let mut t = self.lock();
        if !t.teams.iter().any(|team| team.id == update.team_id) {
            return Ok(UpdateOutcome::Stale);
        }
        if let (RequestStatus::Approved, Some(capacity)) = (update.status, update.capacity) {
            if t.approved(update.team_id).count() as i64 >= capacity {
                return Ok(UpdateOutcome::TeamFull);
            }
        }
        let Some(request) = t.requests.iter_mut().find(|r| {
            r.id == update.request_id && r.team_id == update.team_id && r.status == update.expected
        }) else {
            return Ok(UpdateOutcome::Stale);
        };
        request.status = update.status;
        request.rejection_reason = update.rejection_reason;
        Ok(UpdateOutcome::Applied(request.clone()))
    }

    async fn list_team_requests(&self, team_id: Uuid) -> StoreResult<Vec<RequestWithApplicant>> {
        let t = self.lock();
        Ok(t.requests
            .iter()
            .filter(|r| r.team_id == team_id)
            .filter_map(|r| {
                let u = t.user(r.user_id)?;
                Some(RequestWithApplicant {
                    request: r.clone(),
                    user_name: u.name.clone(),
                    user_email: u.email.clone(),
                    user_university: u.university.clone(),
                    user_skills: u.skills.clone(),
                })
            })
            .collect())
    }

    async fn list_user_requests(&self, user_id: Uuid) -> StoreResult<Vec<MyRequest>> {
        let t = self.lock();
        Ok(t.requests
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let team = t.teams.iter().find(|team| team.id == r.team_id)?;
                let hackathon = t.hackathons.iter().find(|h| h.id == team.hackathon_id)?;
                Some(MyRequest {
                    request: r.clone(),
                    team_name: team.name.clone(),
                    hackathon_id: hackathon.id,
                    hackathon_title: hackathon.title.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl QnaRepo for MemoryStore {
    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let question = Question {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            author_id: new.author_id,
            author_name: new.author_name,
            tags: new.tags,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().questions.push(question.clone());
        Ok(question)
    }

    async fn list_questions(&self) -> StoreResult<Vec<QuestionSummary>> {
        let t = self.lock();
        Ok(t.questions.iter().rev().map(|q| t.question_summary(q)).collect())
    }

    async fn find_question(&self, id: Uuid) -> StoreResult<Option<QuestionSummary>> {
        let t = self.lock();
        Ok(t.questions
            .iter()
            .find(|q| q.id == id)
            .map(|q| t.question_summary(q)))
    }

    async fn insert_answer(&self, new: NewAnswer) -> StoreResult<Answer> {
        let mut t = self.lock();
        if !t.questions.iter().any(|q| q.id == new.question_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "foreign key violation: question {}",
                new.question_id
            )));
        }
        let answer = Answer {
            id: Uuid::new_v4(),
            question_id: new.question_id,
            body: new.body,
            author_id: new.author_id,
            author_name: new.author_name,
            created_at: OffsetDateTime::now_utc(),
        };
        t.answers.push(answer.clone());
        Ok(answer)
    }

    async fn list_answers(&self, question_ids: &[Uuid]) -> StoreResult<Vec<Answer>> {
        Ok(self
            .lock()
            .answers
            .iter()
            .filter(|a| question_ids.contains(&a.question_id))
            .cloned()
            .collect())
    }

    async fn add_vote(&self, question_id: Uuid, user_id: Uuid) -> StoreResult<i64> {
        let mut t = self.lock();
        if !t.votes.contains(&(question_id, user_id)) {
            t.votes.push((question_id, user_id));
        }
        Ok(t.votes.iter().filter(|(qid, _)| *qid == question_id).count() as i64)
    }
}
