//! Support chatbot.
//!
//! When a Google API key is configured every message is forwarded to Gemini
//! with a fixed system instruction that keeps the assistant on flooring
//! topics. A small keyword layer looks up catalog facts (cheapest product,
//! products of a floor type) and adds them to the prompt. Without a key, or
//! whenever the API call fails, the same keyword matches drive a rule-based
//! reply instead.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{config::Config, db::Database, models::product::Product};

pub const MODEL_NAME: &str = "gemini-2.5-flash";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
// Messages kept for the conversation, user and model turns counted separately
const HISTORY_LIMIT: usize = 20;
const PRODUCTS_PER_TYPE: u32 = 3;

pub const SYSTEM_PROMPT: &str = "\
Você é 'Pi', um assistente virtual especializado da 'PiFloor Pisos'.
Sua personalidade é prestativa, amigável e focada no cliente.
SUA TAREFA PRINCIPAL: Ajudar clientes com dúvidas sobre pisos, decoração e os produtos da PiFloor.

REGRAS ESTRITAS:
1.  NÃO responda, sob nenhuma hipótese, perguntas sobre tópicos não relacionados a pisos, construção, decoração ou à empresa PiFloor (ex: futebol, política, drogas, notícias, etc.).
2.  Se perguntado sobre tópicos proibidos, recuse educadamente. Ex: \"Desculpe, eu só consigo ajudar com perguntas sobre pisos e nossos produtos.\"
3.  Use o \"Contexto do Banco de Dados\" fornecido para responder perguntas sobre o catálogo da PiFloor.
4.  Se a pergunta do usuário for vaga (ex: \"e aí?\"), apresente-se e pergunte como pode ajudar com pisos.
5.  MANTENHA AS RESPOSTAS BREVES E DIRETAS. Tente responder em 2-3 frases, a menos que o usuário peça especificamente por mais detalhes.
";

const NO_CONTEXT: &str = "Nenhum contexto específico do banco de dados.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini answered with status {0}")]
    Status(u16),

    #[error("Gemini returned no text")]
    EmptyReply,
}

// What a message is asking about, as far as the catalog is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Cheapest,
    Laminate,
    Vinyl,
}

impl Intent {
    pub fn detect(message: &str) -> Option<Intent> {
        let lowered = message.to_lowercase();
        if lowered.contains("mais barato") || lowered.contains("menor preço") {
            Some(Intent::Cheapest)
        } else if lowered.contains("laminado") {
            Some(Intent::Laminate)
        } else if lowered.contains("vinílico") || lowered.contains("vinilico") {
            Some(Intent::Vinyl)
        } else {
            None
        }
    }

    fn product_type(self) -> Option<&'static str> {
        match self {
            Intent::Cheapest => None,
            Intent::Laminate => Some("laminado"),
            Intent::Vinyl => Some("vinilico"),
        }
    }
}

pub fn describe_cheapest(product: &Product) -> String {
    format!(
        "O produto mais barato é '{}' por R${:.2}/m².",
        product.name,
        product.price.unwrap_or_default()
    )
}

pub fn describe_type(kind: &str, products: &[Product]) -> Option<String> {
    if products.is_empty() {
        return None;
    }
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    Some(format!(
        "Alguns de nossos pisos do tipo {} são: {}.",
        kind,
        names.join(", ")
    ))
}

// Catalog fact matching the message intent, if any
pub async fn catalog_context(db: &Database, intent: Option<Intent>) -> Option<String> {
    let intent = intent?;
    let lookup = match intent.product_type() {
        None => db
            .cheapest_product()
            .await
            .map(|product| product.as_ref().map(describe_cheapest)),
        Some(kind) => db
            .products_by_type(kind, PRODUCTS_PER_TYPE)
            .await
            .map(|products| describe_type(kind, &products)),
    };
    lookup.unwrap_or_else(|e| {
        error!("[CHAT] Catalog lookup failed: {:?}", e);
        None
    })
}

/// Keyword-driven answer used when Gemini is not available.
pub fn rule_based_reply(message: &str, intent: Option<Intent>, context: Option<&str>) -> String {
    match (intent, context) {
        (Some(Intent::Cheapest), Some(fact)) => {
            return format!("O produto mais barato disponível é: {fact}")
        }
        (Some(Intent::Cheapest), None) => {
            return "Desculpe, não encontrei informações sobre preços no momento.".to_string()
        }
        (Some(Intent::Laminate), Some(fact)) => {
            return format!("Temos pisos laminados disponíveis: {fact}")
        }
        (Some(Intent::Laminate), None) => {
            return "Desculpe, não encontrei pisos laminados no momento.".to_string()
        }
        (Some(Intent::Vinyl), Some(fact)) => {
            return format!("Temos pisos vinílicos disponíveis: {fact}")
        }
        (Some(Intent::Vinyl), None) => {
            return "Desculpe, não encontrei pisos vinílicos no momento.".to_string()
        }
        (None, _) => {}
    }

    let lowered = message.to_lowercase();
    if ["ola", "olá", "oi"].iter().any(|w| lowered.contains(w)) {
        "Olá! Como posso ajudá-lo com pisos hoje?".to_string()
    } else if ["obrigado", "obrigada"].iter().any(|w| lowered.contains(w)) {
        "De nada! Estou aqui para ajudar.".to_string()
    } else {
        "Desculpe, não entendi sua pergunta. Posso ajudá-lo com informações sobre nossos pisos laminados e vinílicos!".to_string()
    }
}

pub fn build_prompt(message: &str, context: Option<&str>) -> String {
    format!(
        "\nContexto do Banco de Dados:\n'{}'\n\nPergunta do Usuário:\n'{}'\n",
        context.unwrap_or(NO_CONTEXT),
        message
    )
}

// Gemini REST payloads

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Content {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content,
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    history: Mutex<Vec<Content>>,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str) -> Result<Self, ChatError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                api_base.trim_end_matches('/'),
                MODEL_NAME
            ),
            api_key: api_key.to_string(),
            history: Mutex::new(Vec::new()),
        })
    }

    // Send one prompt as the next turn of the shared conversation
    pub async fn send(&self, prompt: &str) -> Result<String, ChatError> {
        let user_turn = Content::text("user", prompt);
        let mut contents = self.history.lock().await.clone();
        contents.push(user_turn.clone());

        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
            contents: &contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        let reply: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }

        let mut history = self.history.lock().await;
        history.push(user_turn);
        history.push(Content::text("model", &reply));
        let overflow = history.len().saturating_sub(HISTORY_LIMIT);
        history.drain(..overflow);

        Ok(reply)
    }
}

pub struct ChatbotService {
    gemini: Option<GeminiClient>,
}

impl ChatbotService {
    pub fn new(config: &Config) -> Self {
        let gemini = match config.google_api_key.as_deref() {
            Some(key) => match GeminiClient::new(&config.gemini_api_base, key) {
                Ok(client) => {
                    info!("[CHAT] Gemini chatbot ({}) initialized", MODEL_NAME);
                    Some(client)
                }
                Err(e) => {
                    error!("[CHAT] Could not initialize Gemini: {}. Using basic mode.", e);
                    None
                }
            },
            None => {
                warn!("[CHAT] GOOGLE_API_KEY not set. Chatbot running in basic mode.");
                None
            }
        };
        Self { gemini }
    }

    pub fn uses_gemini(&self) -> bool {
        self.gemini.is_some()
    }

    pub async fn reply(&self, db: &Database, message: &str) -> String {
        let intent = Intent::detect(message);
        let context = catalog_context(db, intent).await;
        let preview: String = message.chars().take(50).collect();

        if let Some(gemini) = &self.gemini {
            match gemini.send(&build_prompt(message, context.as_deref())).await {
                Ok(reply) => {
                    info!("[CHAT] Message answered by Gemini: '{}...'", preview);
                    return reply;
                }
                Err(e) => error!("[CHAT] Gemini API error: {}. Falling back to basic reply.", e),
            }
        } else {
            info!("[CHAT] Message answered in basic mode: '{}...'", preview);
        }

        rule_based_reply(message, intent, context.as_deref())
    }
}
