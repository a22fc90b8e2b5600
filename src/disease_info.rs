//! Free-text disease descriptions from the configured text generator.

use std::sync::Arc;

use clap::ValueEnum;
use tracing::{info, warn};

use crate::error::LlmError;
use crate::labels::display_name;
use crate::llm::TextGenerator;
use crate::sections::{self, DiseaseInfo, Placeholders, SectionHeaders};

/// Language of the prompt, and therefore of the section headers the
/// response is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn headers(self) -> SectionHeaders {
        match self {
            Language::En => SectionHeaders {
                description: "Description",
                causes: "Causes",
                symptoms: "Symptoms",
                treatment: "Treatment",
                prevention: "Prevention",
                resources: "Helpful Resources",
            },
            Language::Zh => SectionHeaders {
                description: "描述",
                causes: "原因",
                symptoms: "症状",
                treatment: "治疗",
                prevention: "预防",
                resources: "有用资源",
            },
        }
    }

    pub fn placeholders(self) -> Placeholders {
        match self {
            Language::En => Placeholders {
                unavailable: "Information not available.",
                no_resources: "No resource suggestions available.",
            },
            Language::Zh => Placeholders {
                unavailable: "信息不可用。",
                no_resources: "没有可用的资源建议。",
            },
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            Language::En => "You are an expert plant pathologist.",
            Language::Zh => "你是一个专业的植物病理学专家。",
        }
    }

    fn error_message(self, err: &LlmError) -> String {
        match self {
            Language::En => format!("Error retrieving information: {err}"),
            Language::Zh => format!("获取信息时出错：{err}"),
        }
    }

    /// The user prompt for a cleaned disease name. Header words here must
    /// match [`Language::headers`].
    pub fn prompt(self, disease: &str) -> String {
        match self {
            Language::En => format!(
                "Provide detailed information about the plant disease '{disease}' with the following sections:\n\
                 \n\
                 1. Description: A brief overview of the disease.\n\
                 2. Causes: What causes this disease (e.g., fungus, bacteria, virus).\n\
                 3. Symptoms: Visual symptoms that appear on the plant.\n\
                 4. Treatment: Recommended treatments and control measures.\n\
                 5. Prevention: How to prevent this disease.\n\
                 6. Helpful Resources: Suggest types of helpful videos (no actual links).\n\
                 \n\
                 Please give each section a clear heading."
            ),
            Language::Zh => format!(
                "提供关于植物疾病'{disease}'的详细信息，包含以下部分：\n\
                 \n\
                 1. 描述：该疾病的简要概述。\n\
                 2. 原因：导致这种疾病的原因（例如，真菌、细菌、病毒）。\n\
                 3. 症状：植物上出现的视觉症状。\n\
                 4. 治疗：推荐的治疗方法和控制措施。\n\
                 5. 预防：如何预防这种疾病。\n\
                 6. 有用资源：建议有帮助的视频类型（不包含实际链接）。\n\
                 \n\
                 请为每个部分添加清晰的标题。"
            ),
        }
    }
}

/// Asks the generator about a disease and splits the answer into fields.
/// Never fails: any generator error becomes placeholder text.
#[derive(Clone)]
pub struct DiseaseInfoService {
    generator: Arc<dyn TextGenerator>,
    language: Language,
}

impl DiseaseInfoService {
    pub fn new(generator: Arc<dyn TextGenerator>, language: Language) -> Self {
        Self {
            generator,
            language,
        }
    }

    pub async fn describe(&self, label: &str) -> DiseaseInfo {
        let disease = display_name(label);
        let prompt = self.language.prompt(&disease);
        let placeholders = self.language.placeholders();

        match self
            .generator
            .generate(self.language.system_prompt(), &prompt)
            .await
        {
            Ok(text) => {
                let text = sections::strip_reasoning(&text);
                info!(disease = %disease, chars = text.len(), "received disease description");
                sections::extract(&text, &self.language.headers(), &placeholders)
            }
            Err(LlmError::Empty) => {
                warn!(disease = %disease, "text generator returned no completion");
                DiseaseInfo::placeholders(&placeholders)
            }
            Err(err) => {
                warn!(disease = %disease, error = %err, "text generation failed");
                DiseaseInfo {
                    description: self.language.error_message(&err),
                    ..DiseaseInfo::placeholders(&placeholders)
                }
            }
        }
    }
}
