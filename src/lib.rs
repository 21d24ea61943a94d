//! Async GigaChat client that keeps its OAuth bearer token fresh in the background, retries a
//! rejected token exactly once, and shuts its refresh task down cleanly.
//!
//! ```no_run
//! # async fn demo() -> gigachat_client::Result<()> {
//! use gigachat_client::{Client, ClientConfig, Message};
//!
//! let config = ClientConfig::builder("base64-authorization-key").build()?;
//! let client = Client::new(config).await?;
//! let model = client.generative_model("GigaChat");
//! let response = model.generate(&[Message::user("The capital of France is")]).await?;
//!
//! println!("{}", response.text().unwrap_or_default());
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod refresh;
pub mod store;

pub use auth::{AccessToken, ApiKey, Credential, FreshnessPolicy};
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use message::{CompletionResponse, Message, Role};
pub use model::{GenerationConfig, GenerativeModel};
pub use refresh::{RefreshMetrics, RefreshState};

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
