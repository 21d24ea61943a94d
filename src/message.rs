//! Chat completion wire types.

// self
use crate::_prelude::*;

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Instructions that steer the model.
	System,
	/// End-user input.
	User,
	/// Model output.
	Assistant,
	/// Result of a function call.
	Function,
}

/// Chat message sent to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	/// Author of the message.
	pub role: Role,
	/// Message text.
	pub content: String,
}
impl Message {
	/// Creates a message with an explicit role.
	pub fn new(role: Role, content: impl Into<String>) -> Self {
		Self { role, content: content.into() }
	}

	/// Creates a `system` message.
	pub fn system(content: impl Into<String>) -> Self {
		Self::new(Role::System, content)
	}

	/// Creates a `user` message.
	pub fn user(content: impl Into<String>) -> Self {
		Self::new(Role::User, content)
	}

	/// Creates an `assistant` message.
	pub fn assistant(content: impl Into<String>) -> Self {
		Self::new(Role::Assistant, content)
	}
}

/// Body of a chat completion request.
#[derive(Clone, Debug, Serialize)]
pub struct CompletionRequest {
	/// Model name.
	pub model: String,
	/// Conversation, system instruction first when present.
	pub messages: Vec<Message>,
	/// Sampling temperature.
	pub temperature: f64,
	/// Nucleus sampling threshold.
	pub top_p: f64,
	/// Upper bound on generated tokens.
	pub max_tokens: u32,
	/// Penalty applied to repeated tokens.
	pub repetition_penalty: f64,
}

/// Body of a chat completion response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
	/// Generated alternatives.
	#[serde(default)]
	pub choices: Vec<Choice>,
	/// Unix timestamp (seconds) of the completion.
	#[serde(default)]
	pub created: Option<i64>,
	/// Model that produced the completion.
	#[serde(default)]
	pub model: Option<String>,
	/// Token accounting.
	#[serde(default)]
	pub usage: Option<Usage>,
	/// Object type tag.
	#[serde(default)]
	pub object: Option<String>,
}
impl CompletionResponse {
	/// Text of the first choice, if any.
	pub fn text(&self) -> Option<&str> {
		self.choices.first().map(|choice| choice.message.content.as_str())
	}
}

/// One generated alternative.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
	/// Generated message.
	pub message: ResponseMessage,
	/// Position among the alternatives.
	#[serde(default)]
	pub index: u32,
	/// Why generation stopped (`stop`, `length`, ...).
	#[serde(default)]
	pub finish_reason: Option<String>,
}

/// Message returned by the model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
	/// Author, normally `assistant`.
	#[serde(default)]
	pub role: Option<Role>,
	/// Generated text.
	#[serde(default)]
	pub content: String,
}

/// Token accounting for a completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
	/// Tokens in the prompt.
	#[serde(default)]
	pub prompt_tokens: u64,
	/// Tokens generated.
	#[serde(default)]
	pub completion_tokens: u64,
	/// Sum of both.
	#[serde(default)]
	pub total_tokens: u64,
}
