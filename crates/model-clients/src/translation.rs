use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use text_lang::TranslationModel;

use crate::http::Endpoint;

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
    /// Server-side truncation limit, in tokens.
    max_length: usize,
}

#[derive(Deserialize)]
struct TranslateReply { text: String }

/// Seq2seq translation server: `POST /translate`.
pub struct RemoteTranslator { endpoint: Endpoint, max_length: usize }

impl RemoteTranslator {
    pub fn new(base: &str, max_length: usize, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self { endpoint: Endpoint::new(base, timeout)?, max_length })
    }
}

impl TranslationModel for RemoteTranslator {
    fn translate(&self, text: &str, source_language: &str) -> Result<String> {
        let req = TranslateRequest { text, source_lang: source_language, target_lang: "en", max_length: self.max_length };
        let reply: TranslateReply = self.endpoint.post_json("translate", &req)?;
        Ok(reply.text)
    }
}
