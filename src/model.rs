//! Generative model handle and its sampling parameters.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::ApiRequest,
	message::{CompletionRequest, CompletionResponse, Message},
};

/// Model used when an empty name is supplied.
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Parameter problems detected before a request is sent.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ValidationError {
	/// Temperature outside `[0, 2]`.
	#[error("Temperature must be between 0 and 2, got {value}.")]
	Temperature {
		/// Rejected value.
		value: f64,
	},
	/// Top-p outside `[0, 1]`.
	#[error("Top-p must be between 0 and 1, got {value}.")]
	TopP {
		/// Rejected value.
		value: f64,
	},
	/// Zero token budget.
	#[error("Max tokens must be positive.")]
	MaxTokens,
	/// Repetition penalty outside `[0.1, 2.0]`.
	#[error("Repetition penalty must be between 0.1 and 2.0, got {value}.")]
	RepetitionPenalty {
		/// Rejected value.
		value: f64,
	},
	/// No messages to complete.
	#[error("Cannot generate from an empty message list.")]
	EmptyMessages,
}

/// Sampling parameters sent with every completion.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
	/// Sent as a leading `system` message when set.
	pub system_instruction: Option<String>,
	/// Higher values give more random output. Range `[0, 2]`, default 0.
	pub temperature: f64,
	/// Nucleus sampling threshold. Range `[0, 1]`, default 1.
	pub top_p: f64,
	/// Upper bound on generated tokens. Must be positive.
	pub max_tokens: u32,
	/// Values above 1 discourage repetition. Range `[0.1, 2.0]`, default 1.
	pub repetition_penalty: f64,
}
impl GenerationConfig {
	/// Checks every parameter against its allowed range.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if !(0.0..=2.0).contains(&self.temperature) {
			return Err(ValidationError::Temperature { value: self.temperature });
		}
		if !(0.0..=1.0).contains(&self.top_p) {
			return Err(ValidationError::TopP { value: self.top_p });
		}
		if self.max_tokens == 0 {
			return Err(ValidationError::MaxTokens);
		}
		if !(0.1..=2.0).contains(&self.repetition_penalty) {
			return Err(ValidationError::RepetitionPenalty { value: self.repetition_penalty });
		}

		Ok(())
	}
}
impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			system_instruction: None,
			temperature: 0.0,
			top_p: 1.0,
			max_tokens: 999_999_999,
			repetition_penalty: 1.0,
		}
	}
}

/// Named model bound to a client.
#[derive(Clone, Debug)]
pub struct GenerativeModel<'c> {
	client: &'c Client,
	name: String,
	/// Sampling parameters; adjust before calling [`generate`](Self::generate).
	pub config: GenerationConfig,
}
impl<'c> GenerativeModel<'c> {
	pub(crate) fn new(client: &'c Client, name: &str) -> Self {
		let name = if name.trim().is_empty() { DEFAULT_MODEL } else { name };

		Self { client, name: name.to_owned(), config: GenerationConfig::default() }
	}

	/// Model name sent with each request.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Sets the system instruction.
	pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
		self.config.system_instruction = Some(instruction.into());

		self
	}

	/// Sets the sampling temperature.
	pub fn with_temperature(mut self, temperature: f64) -> Self {
		self.config.temperature = temperature;

		self
	}

	/// Builds the request body without sending it.
	pub fn completion_request(&self, messages: &[Message]) -> Result<CompletionRequest> {
		self.config.validate()?;

		if messages.is_empty() {
			return Err(ValidationError::EmptyMessages.into());
		}

		let mut conversation = Vec::with_capacity(messages.len() + 1);

		if let Some(instruction) = self.config.system_instruction.as_deref() {
			conversation.push(Message::system(instruction));
		}

		conversation.extend_from_slice(messages);

		Ok(CompletionRequest {
			model: self.name.clone(),
			messages: conversation,
			temperature: self.config.temperature,
			top_p: self.config.top_p,
			max_tokens: self.config.max_tokens,
			repetition_penalty: self.config.repetition_penalty,
		})
	}

	/// Requests a completion for `messages`.
	pub async fn generate(&self, messages: &[Message]) -> Result<CompletionResponse> {
		let body = self.completion_request(messages)?;
		let request = ApiRequest::post_json(self.client.config().api_url.clone(), &body)?;

		self.client.send(&request).await?.json()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert_eq!(GenerationConfig::default().validate(), Ok(()));
	}

	#[test]
	fn rejects_out_of_range_parameters() {
		let cases = [
			(
				GenerationConfig { temperature: 2.5, ..Default::default() },
				ValidationError::Temperature { value: 2.5 },
			),
			(
				GenerationConfig { temperature: -0.1, ..Default::default() },
				ValidationError::Temperature { value: -0.1 },
			),
			(
				GenerationConfig { top_p: 1.5, ..Default::default() },
				ValidationError::TopP { value: 1.5 },
			),
			(GenerationConfig { max_tokens: 0, ..Default::default() }, ValidationError::MaxTokens),
			(
				GenerationConfig { repetition_penalty: 0.05, ..Default::default() },
				ValidationError::RepetitionPenalty { value: 0.05 },
			),
			(
				GenerationConfig { repetition_penalty: 2.1, ..Default::default() },
				ValidationError::RepetitionPenalty { value: 2.1 },
			),
		];

		for (config, expected) in cases {
			assert_eq!(config.validate(), Err(expected));
		}
	}

	#[test]
	fn nan_is_out_of_range() {
		let config = GenerationConfig { temperature: f64::NAN, ..Default::default() };

		assert!(matches!(config.validate(), Err(ValidationError::Temperature { .. })));
	}

	#[test]
	fn range_bounds_are_inclusive() {
		let config = GenerationConfig {
			temperature: 2.0,
			top_p: 0.0,
			max_tokens: 1,
			repetition_penalty: 0.1,
			..Default::default()
		};

		assert_eq!(config.validate(), Ok(()));
	}
}
