#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use job_portal::{
    AppState,
    auth::Claims,
    config::{AppConfig, Env},
    models::{AdminDashboardStats, InboxCounts, InboxEntry, Message, Role, SendMessageRequest, User},
    repository::Repository,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::SystemTime,
};
use uuid::Uuid;

// --- Mock Repository ---

/// In-memory stand-in for Postgres. Users are looked up by id; messages live in a Vec.
#[derive(Default)]
pub struct MockRepo {
    pub users: HashMap<Uuid, User>,
    pub messages: Mutex<Vec<Message>>,
    pub stats: AdminDashboardStats,
}

impl MockRepo {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            ..Self::default()
        }
    }

    pub fn with_message(self, message: Message) -> Self {
        self.messages.lock().unwrap().push(message);
        self
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    async fn create_user(&self, user: User) -> Option<User> {
        Some(user)
    }

    async fn get_inbox(&self, user_id: Uuid, limit: i64) -> Vec<InboxEntry> {
        let messages = self.messages.lock().unwrap();
        let mut entries: Vec<InboxEntry> = messages
            .iter()
            .filter(|m| m.recipient_id == user_id)
            .map(|m| InboxEntry {
                id: m.id,
                sender_id: m.sender_id,
                sender_email: self
                    .users
                    .get(&m.sender_id)
                    .map(|u| u.email.clone())
                    .unwrap_or_default(),
                subject: m.subject.clone(),
                body: m.body.clone(),
                is_read: m.is_read,
                created_at: m.created_at,
            })
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit as usize);
        entries
    }

    async fn get_inbox_counts(&self, user_id: Uuid) -> InboxCounts {
        let messages = self.messages.lock().unwrap();
        InboxCounts {
            received: messages.iter().filter(|m| m.recipient_id == user_id).count() as i64,
            unread: messages
                .iter()
                .filter(|m| m.recipient_id == user_id && !m.is_read)
                .count() as i64,
            sent: messages.iter().filter(|m| m.sender_id == user_id).count() as i64,
        }
    }

    async fn send_message(&self, sender_id: Uuid, req: SendMessageRequest) -> Option<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id: req.recipient_id,
            subject: req.subject,
            body: req.body,
            is_read: false,
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Some(message)
    }

    async fn mark_message_read(&self, message_id: Uuid, user_id: Uuid) -> bool {
        let mut messages = self.messages.lock().unwrap();
        match messages
            .iter_mut()
            .find(|m| m.id == message_id && m.recipient_id == user_id)
        {
            Some(message) => {
                message.is_read = true;
                true
            }
            None => false,
        }
    }

    async fn get_stats(&self) -> AdminDashboardStats {
        self.stats.clone()
    }
}

// --- Fixtures ---

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
pub const CANDIDATE_ID: Uuid = Uuid::from_u128(1);
pub const EMPLOYER_ID: Uuid = Uuid::from_u128(2);
pub const ADMIN_ID: Uuid = Uuid::from_u128(3);
pub const BROKEN_ROLE_ID: Uuid = Uuid::from_u128(4);

pub fn user(id: Uuid, role: &str) -> User {
    User {
        id,
        email: format!("{}@jobs.test", role),
        role: role.to_string(),
    }
}

/// One user per role plus one whose stored role is garbage.
pub fn seeded_repo() -> MockRepo {
    MockRepo::with_users([
        user(CANDIDATE_ID, Role::Candidate.as_str()),
        user(EMPLOYER_ID, Role::Employer.as_str()),
        user(ADMIN_ID, Role::Admin.as_str()),
        user(BROKEN_ROLE_ID, "superuser"),
    ])
}

pub fn message(sender_id: Uuid, recipient_id: Uuid, body: &str) -> Message {
    Message {
        id: Uuid::new_v4(),
        sender_id,
        recipient_id,
        subject: "Re: application".to_string(),
        body: body.to_string(),
        is_read: false,
        created_at: Utc::now(),
    }
}

pub fn create_app_state(env: Env, repo: MockRepo) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };

    AppState {
        repo: Arc::new(repo),
        config,
    }
}

/// Signs a session token with the test secret. `exp_offset` is seconds from now.
pub fn create_token(user_id: Uuid, exp_offset: u64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}
