//! Test doubles
//!
//! `RecordingBackend` wraps a `MemoryBackend`, records every call and can be
//! told to fail specific operations with a provider message.

use async_trait::async_trait;
use std::sync::Mutex;

use super::error::{BackendError, BackendResult};
use super::memory::MemoryBackend;
use super::types::{AuthSession, Credentials, NewNumberEntry, NumberEntry};
use super::{Backend, NumberStore, SessionProvider};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignUp(String),
    SignIn(String),
    Refresh,
    SignOut(String),
    List(String),
    Insert(NewNumberEntry),
    Delete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SignUp,
    SignIn,
    Refresh,
    List,
    Insert,
    Delete,
}

#[derive(Default)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<(Op, String)>>,
}

impl RecordingBackend {
    pub fn wrapping(inner: MemoryBackend) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Make every later call of `op` fail with `message`
    pub fn fail(&self, op: Op, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((op, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> BackendResult<()> {
        match self.failures.lock().unwrap().iter().find(|(o, _)| *o == op) {
            Some((_, message)) => Err(BackendError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionProvider for RecordingBackend {
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<()> {
        self.record(Call::SignUp(credentials.email.clone()));
        self.check(Op::SignUp)?;
        self.inner.sign_up(credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<AuthSession> {
        self.record(Call::SignIn(credentials.email.clone()));
        self.check(Op::SignIn)?;
        self.inner.sign_in(credentials).await
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<AuthSession> {
        self.record(Call::Refresh);
        self.check(Op::Refresh)?;
        self.inner.refresh(refresh_token).await
    }

    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()> {
        self.record(Call::SignOut(session.user.id.clone()));
        self.inner.sign_out(session).await
    }
}

#[async_trait]
impl NumberStore for RecordingBackend {
    async fn list(&self, session: &AuthSession) -> BackendResult<Vec<NumberEntry>> {
        self.record(Call::List(session.user.id.clone()));
        self.check(Op::List)?;
        self.inner.list(session).await
    }

    async fn insert(&self, session: &AuthSession, entry: NewNumberEntry) -> BackendResult<()> {
        self.record(Call::Insert(entry.clone()));
        self.check(Op::Insert)?;
        self.inner.insert(session, entry).await
    }

    async fn delete(&self, session: &AuthSession, id: &str) -> BackendResult<()> {
        self.record(Call::Delete(id.to_string()));
        self.check(Op::Delete)?;
        self.inner.delete(session, id).await
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn health_check(&self) -> BackendResult<()> {
        Ok(())
    }
}
