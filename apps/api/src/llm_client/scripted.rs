//! Scripted `TextGenerator` for tests. Replies are chosen by the first rule
//! whose needle appears in the system instruction.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::store::memory::EventLog;

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    /// Simulates the provider returning an error status.
    ApiError(String),
    Empty,
}

struct Rule {
    needle: String,
    reply: Reply,
    delay: Duration,
}

pub struct ScriptedGenerator {
    rules: Vec<Rule>,
    fallback: Reply,
    log: Option<EventLog>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(fallback: Reply) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
            log: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn on(self, needle: &str, reply: Reply) -> Self {
        self.on_after(needle, reply, Duration::ZERO)
    }

    /// Like `on`, but the reply is delivered after `delay`.
    pub fn on_after(mut self, needle: &str, reply: Reply, delay: Duration) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            reply,
            delay,
        });
        self
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// `(system, user)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        let (reply, delay, label) = self
            .rules
            .iter()
            .find(|r| system.contains(&r.needle))
            .map(|r| (r.reply.clone(), r.delay, r.needle.clone()))
            .unwrap_or_else(|| (self.fallback.clone(), Duration::ZERO, "fallback".to_string()));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("generate:end:{label}"));
        }

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::ApiError(message) => Err(LlmError::Api {
                status: 503,
                message,
            }),
            Reply::Empty => Ok(String::new()),
        }
    }
}
