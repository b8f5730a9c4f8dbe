//! Turn generation against the store and inference backend.

use crate::turn_lock::TurnLocks;
use crate::{
    AssembleInput, ExtractedResponse, RegenerationPlan, assemble, extract_metadata,
    plan_regeneration,
};
use palaver_context::{ContextCache, Variable, resolve_instructions};
use palaver_core::{
    ConversationConfig, ConversationMessage, FeedbackTable, Metadata, NewMessage, Role,
    TokenUsageData, merge_metadata,
};
use palaver_error::{
    ConfigError, ConfigErrorKind, InferenceError, InferenceErrorKind, NotFoundError, NotFoundKind, PalaverError,
    PalaverResult, StorageError, StorageErrorKind, ValidationError,
};
use palaver_interface::{ConversationStore, InferenceBackend};
use palaver_models::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, GenerationParams,
    InferenceConfig, ProviderAdapter,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Metadata key a model uses to move the conversation to another stage.
pub const STAGE_METADATA_KEY: &str = "chat_stage";

/// Limits and fallbacks applied to every turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnSettings {
    /// Upper bound on a single inference call
    pub timeout: Duration,
    /// Temperature when neither the conversation nor its config set one
    pub default_temperature: f64,
    /// Max tokens when neither the conversation nor its config set one
    pub default_max_tokens: u32,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&InferenceConfig> for TurnSettings {
    fn from(config: &InferenceConfig) -> Self {
        Self {
            timeout: config.timeout(),
            default_temperature: config.default_temperature,
            default_max_tokens: config.default_max_tokens,
        }
    }
}

/// A persisted turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The stored assistant message
    pub message: ConversationMessage,
    /// Metadata this turn's response carried, if any
    pub metadata: Option<Metadata>,
    /// Conversation metadata after merging this turn's delta
    pub conversation_metadata: Metadata,
    /// Stage the conversation is in after this turn
    pub stage: Option<String>,
}

/// Generates model turns for stored conversations.
///
/// Each call is one request/response against the backend. Independent
/// conversations can be generated concurrently through the same generator.
/// Turns for the same conversation run one at a time, from reading the
/// history to storing the reply, so overlapping regenerations see each
/// other's results.
///
/// # Examples
///
/// ```
/// use palaver_conversation::{InMemoryConversationStore, TurnGenerator};
/// use palaver_core::{Conversation, NewMessage, Role};
/// use palaver_models::MockBackend;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), palaver_error::PalaverError> {
/// let store = Arc::new(InMemoryConversationStore::new());
/// store
///     .insert_conversation(
///         Conversation::builder()
///             .id("c-1")
///             .model_id("anthropic.claude-3-haiku-20240307-v1:0")
///             .build()
///             .expect("valid conversation"),
///     )
///     .await;
/// store.insert_message("c-1", NewMessage::text(Role::User, "Hi!")).await;
///
/// let generator = TurnGenerator::new(store.clone(), Arc::new(MockBackend::new("Hello there")));
/// let outcome = generator.generate_turn("c-1").await?;
///
/// assert_eq!(outcome.message.content(), "Hello there");
/// assert_eq!(*outcome.message.role(), Role::Assistant);
/// assert_eq!(store.messages("c-1").await.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct TurnGenerator {
    store: Arc<dyn ConversationStore>,
    backend: Arc<dyn InferenceBackend>,
    cache: ContextCache,
    settings: TurnSettings,
    turn_locks: TurnLocks,
}

impl TurnGenerator {
    /// Creates a generator with an empty document cache and default settings.
    pub fn new(store: Arc<dyn ConversationStore>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            store,
            backend,
            cache: ContextCache::new(),
            settings: TurnSettings::default(),
            turn_locks: TurnLocks::default(),
        }
    }

    /// Uses `cache` for parsed context documents.
    pub fn with_cache(mut self, cache: ContextCache) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the turn settings.
    pub fn with_settings(mut self, settings: TurnSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The parsed-document cache.
    pub fn cache(&self) -> &ContextCache {
        &self.cache
    }

    /// The turn settings.
    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// Conversations with a turn running or waiting to run.
    pub fn turns_in_flight(&self) -> usize {
        self.turn_locks.len()
    }

    /// Generates the next assistant turn, or regenerates the last one.
    ///
    /// See [`generate_turn_with_cancel`](Self::generate_turn_with_cancel).
    pub async fn generate_turn(&self, conversation_id: &str) -> PalaverResult<TurnOutcome> {
        self.generate_turn_with_cancel(conversation_id, CancellationToken::new())
            .await
    }

    /// Generates a turn, aborting the inference call when `cancel` fires.
    ///
    /// If the latest stored message is an active assistant reply, that reply
    /// is superseded: it is marked replaced and the new reply continues its
    /// iteration count. A turn already running for the same conversation is
    /// waited for first; `cancel` also ends that wait.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] for an empty id, a missing model id or nothing to send
    /// - [`NotFoundError`] when the conversation or its config does not exist
    /// - [`ConfigError`] when the instructions do not compile
    /// - [`InferenceError`] when the call fails, times out or is cancelled;
    ///   nothing is persisted in that case
    /// - [`StorageError`] with kind `TurnNotPersisted` when the reply was
    ///   generated but could not be stored
    #[tracing::instrument(skip(self, cancel), fields(backend = self.backend.name()))]
    pub async fn generate_turn_with_cancel(
        &self,
        conversation_id: &str,
        cancel: CancellationToken,
    ) -> PalaverResult<TurnOutcome> {
        if conversation_id.trim().is_empty() {
            return Err(ValidationError::new("Conversation id is required").into());
        }

        let _turn = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(conversation_id, "Turn cancelled while waiting for the conversation");
                return Err(InferenceError::new(InferenceErrorKind::Cancelled).into());
            }
            guard = self.turn_locks.acquire(conversation_id) => guard,
        };

        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| {
                NotFoundError::new(NotFoundKind::Conversation(conversation_id.to_string()))
            })?;

        let config = match conversation.config_id() {
            Some(config_id) => Some(
                self.store
                    .find_conversation_config(config_id)
                    .await?
                    .ok_or_else(|| NotFoundError::new(NotFoundKind::Config(config_id.clone())))?,
            ),
            None => None,
        };
        let config = config.as_ref();

        let history = self.store.find_messages(conversation_id).await?;
        let plan = plan_regeneration(&history);

        let model_id = conversation
            .model_id()
            .clone()
            .or_else(|| config.and_then(|c| c.model_id().clone()))
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Conversation '{}' has no model id and its config sets none",
                    conversation_id
                ))
            })?;
        let temperature = (*conversation.temperature())
            .or_else(|| config.and_then(|c| *c.temperature()))
            .unwrap_or(self.settings.default_temperature);
        let max_tokens = (*conversation.max_tokens())
            .or_else(|| config.and_then(|c| *c.max_tokens()))
            .unwrap_or(self.settings.default_max_tokens);

        let current_stage = conversation.stage().clone();
        let variables: Vec<Variable> = conversation
            .username()
            .iter()
            .map(|name| Variable::string("username", name.as_str()))
            .collect();
        let instructions = self.compile_instructions(
            conversation_id,
            conversation
                .instructions()
                .as_deref()
                .or_else(|| config.and_then(|c| c.instructions().as_deref())),
            current_stage.as_deref(),
            &variables,
        )?;

        // The first reply stays hidden when a welcome message stands in for it.
        let send_to_user = !history.is_empty()
            || config.and_then(|c| c.welcome_message().as_ref()).is_none();

        let no_feedback = FeedbackTable::new();
        let turns = assemble(AssembleInput {
            history: &history,
            instructions: instructions.as_deref(),
            metadata: conversation.metadata(),
            feedback: config.map_or(&no_feedback, ConversationConfig::feedback),
            regeneration: plan.as_ref(),
        });
        if turns.is_empty() {
            return Err(ValidationError::new(format!(
                "Conversation '{}' has no history and no instructions to send",
                conversation_id
            ))
            .into());
        }

        let adapter = ProviderAdapter::for_model(&model_id);
        let body = adapter.build_request(&turns, &GenerationParams::new(max_tokens, temperature))?;
        tracing::debug!(
            model_id = %model_id,
            family = %adapter.family(),
            turns = turns.len(),
            regenerating = plan.is_some(),
            "Invoking inference backend"
        );

        let response = self.invoke(conversation_id, &model_id, &body, &cancel).await?;
        let raw = adapter.extract_text(&response)?;
        let usage = adapter.extract_usage(&response);
        let ExtractedResponse { content, metadata } = extract_metadata(&raw);

        let next_stage = metadata
            .as_ref()
            .and_then(|m| m.get(STAGE_METADATA_KEY))
            .and_then(Value::as_str)
            .map(str::to_string);

        let cost = match &usage {
            Some(usage) => self.lookup_cost(&model_id, usage).await,
            None => None,
        };

        if let Some(plan) = &plan {
            self.store
                .mark_message_replaced(&plan.prior_id, plan.replacement)
                .await?;
            tracing::info!(
                conversation_id,
                prior_id = %plan.prior_id,
                prior_iteration = ?plan.replacement.iteration,
                iteration = plan.next_iteration,
                "Superseded assistant reply"
            );
        }

        let new_message = NewMessage {
            role: Role::Assistant,
            content,
            stage: current_stage.clone(),
            iteration: plan.as_ref().map(|p| p.next_iteration),
            send_to_model: true,
            send_to_user,
            metadata: metadata.clone(),
            model_id: Some(model_id.clone()),
            temperature: Some(temperature),
            usage,
            cost,
        };
        let message = match self.store.append_message(conversation_id, new_message).await {
            Ok(message) => message,
            Err(e) => return Err(self.abandon_turn(conversation_id, plan.as_ref(), e).await),
        };

        let mut conversation_metadata = conversation.metadata().clone();
        if let Some(delta) = &metadata {
            merge_metadata(&mut conversation_metadata, delta);
        }
        if metadata.is_some() {
            // The reply is already stored; a failed state write must not lose it.
            if let Err(e) = self
                .store
                .update_conversation(conversation_id, &conversation_metadata, next_stage.as_deref())
                .await
            {
                tracing::error!(
                    conversation_id,
                    error = %e,
                    "Failed to persist conversation metadata"
                );
            }
        }

        tracing::info!(
            conversation_id,
            message_id = %message.id(),
            iteration = ?message.iteration(),
            send_to_user,
            "Generated turn"
        );

        Ok(TurnOutcome {
            message,
            metadata,
            conversation_metadata,
            stage: next_stage.or(current_stage),
        })
    }

    fn compile_instructions(
        &self,
        conversation_id: &str,
        raw: Option<&str>,
        stage: Option<&str>,
        variables: &[Variable],
    ) -> PalaverResult<Option<String>> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let compiled = resolve_instructions(raw, stage, variables, &self.cache).map_err(|e| {
            tracing::error!(conversation_id, stage, error = %e, "Failed to compile instructions");
            ConfigError::new(ConfigErrorKind::Instructions {
                conversation_id: conversation_id.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(Some(compiled))
    }

    async fn invoke(
        &self,
        conversation_id: &str,
        model_id: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> PalaverResult<Value> {
        let timeout = self.settings.timeout;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(conversation_id, "Turn cancelled during the inference call");
                Err(InferenceError::new(InferenceErrorKind::Cancelled).into())
            }
            result = tokio::time::timeout(timeout, self.backend.invoke(model_id, body)) => match result {
                Ok(response) => response,
                Err(_) => {
                    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(conversation_id, model_id, millis, "Inference call timed out");
                    Err(InferenceError::new(InferenceErrorKind::Timeout { millis }).into())
                }
            },
        }
    }

    async fn lookup_cost(&self, model_id: &str, usage: &TokenUsageData) -> Option<f64> {
        match self.store.find_model_cost_info(model_id).await {
            Ok(Some(info)) => Some(info.cost_for(usage)),
            Ok(None) => {
                tracing::debug!(model_id, "No cost info for model");
                None
            }
            Err(e) => {
                tracing::warn!(model_id, error = %e, "Failed to look up model cost");
                None
            }
        }
    }

    /// Reports a generated reply that failed to persist, first undoing the
    /// regeneration mark if one was made.
    async fn abandon_turn(
        &self,
        conversation_id: &str,
        plan: Option<&RegenerationPlan>,
        cause: PalaverError,
    ) -> PalaverError {
        if let Some(plan) = plan {
            if let Err(e) = self
                .store
                .mark_message_replaced(&plan.prior_id, plan.original)
                .await
            {
                tracing::error!(
                    conversation_id,
                    prior_id = %plan.prior_id,
                    error = %e,
                    "Failed to restore superseded reply"
                );
            }
        }
        tracing::error!(
            conversation_id,
            regenerating = plan.is_some(),
            error = %cause,
            "Generated reply could not be persisted"
        );

        StorageError::new(StorageErrorKind::TurnNotPersisted {
            conversation_id: conversation_id.to_string(),
            message: cause.to_string(),
            regenerating: plan.is_some(),
        })
        .into()
    }
}
