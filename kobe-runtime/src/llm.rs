use kobe_core::transcript::Role;
use kobe_engine::traits::{ChatTransport, GenerateRequest};
use kobe_providers::gemini::{
    Content, ContentRole, GeminiChatConfig, GenerateContent, build_generate_content_request,
};

/// `ChatTransport` backed by the Gemini `generateContent` REST endpoint.
///
/// Credential and model come with each request; only the endpoint is fixed here.
#[derive(Debug, Clone)]
pub struct GeminiChatTransport {
    base_url: String,
}

impl Default for GeminiChatTransport {
    fn default() -> Self {
        Self::new(kobe_providers::gemini::DEFAULT_BASE_URL)
    }
}

impl GeminiChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl ChatTransport for GeminiChatTransport {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String> {
        let cfg = GeminiChatConfig {
            base_url: self.base_url.clone(),
            api_key: request.api_key.clone(),
            model: request.model.clone(),
        };

        let contents: Vec<Content> = request
            .contents
            .iter()
            .map(|turn| Content {
                role: match turn.role {
                    Role::User => ContentRole::User,
                    Role::Model => ContentRole::Model,
                },
                text: turn.text.clone(),
            })
            .collect();

        let req = build_generate_content_request(
            &cfg,
            &GenerateContent {
                system_instruction: request.system_instruction.as_deref(),
                response_schema: request.response_schema.as_ref(),
                temperature: request.temperature,
                contents: &contents,
            },
        );
        let resp = kobe_providers::runtime::execute(&req).await?;

        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                kobe_providers::parse::describe_gemini_error(resp.status, &resp.body)
            ));
        }

        let text = kobe_providers::parse::parse_gemini_generate_content(&resp.body)?;
        if text.is_empty() {
            log::warn!("gemini reply carried no text (model={})", request.model);
        }
        Ok(text)
    }
}
