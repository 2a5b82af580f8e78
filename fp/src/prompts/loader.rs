//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to embedded defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use tracing::{debug, info};

use super::embedded;
use super::{Fields, TemplateError};

/// Fields required by the plan template, in prompt order
pub const PLAN_FIELDS: [&str; 10] = [
    "workout_type",
    "diet_type",
    "current_weight",
    "target_weight",
    "dietary_restrictions",
    "health_conditions",
    "age",
    "gender",
    "number_of_weeks",
    "comments",
];

/// Fields required by the chat template
pub const CHAT_FIELDS: [&str; 2] = ["plan", "question"];

/// The fixed set of prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// Workout and diet plan generation
    Plan,
    /// Follow-up question about an existing plan
    Chat,
}

impl TemplateId {
    /// Template file stem, also the embedded lookup key
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Chat => "chat",
        }
    }

    /// Fields that must be present before rendering
    pub fn required_fields(&self) -> &'static [&'static str] {
        debug!(?self, "TemplateId::required_fields: called");
        match self {
            Self::Plan => &PLAN_FIELDS,
            Self::Chat => &CHAT_FIELDS,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine, strict and without HTML escaping
    hbs: Handlebars<'static>,
    /// Override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `dir`
    ///
    /// A directory that does not exist is ignored and embedded templates are used.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let dir_exists = dir.is_dir();
        debug!(?dir, %dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            override_dir: if dir_exists { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    /// Build from an optional override directory
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::embedded_only(),
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template source
    ///
    /// Checks in order:
    /// 1. Override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, id: TemplateId) -> Result<String, TemplateError> {
        debug!(%id, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", id.name()));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path).map_err(|source| TemplateError::Io { path, source });
            }
            debug!(?path, "PromptLoader::load_template: not found in override directory");
        }

        debug!("PromptLoader::load_template: using embedded template");
        embedded::get_embedded(id.name())
            .map(str::to_string)
            .ok_or_else(|| TemplateError::Render {
                template: id,
                message: "no embedded template".to_string(),
            })
    }

    /// Render a template with the given fields
    ///
    /// All required fields are checked first; nothing is rendered if any is absent.
    pub fn render(&self, id: TemplateId, fields: &Fields) -> Result<String, TemplateError> {
        debug!(%id, field_count = fields.len(), "PromptLoader::render: called");
        if let Some(missing) = id.required_fields().iter().find(|name| !fields.contains(name)) {
            debug!(%id, field = %missing, "PromptLoader::render: missing field");
            return Err(TemplateError::MissingField {
                template: id,
                field: missing.to_string(),
            });
        }

        let template = self.load_template(id)?;
        let rendered = self
            .hbs
            .render_template(&template, &fields.to_context())
            .map_err(|e| TemplateError::Render {
                template: id,
                message: e.to_string(),
            })?;

        info!("Rendered template '{}' ({} chars)", id, rendered.len());
        Ok(rendered)
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::embedded_only()
    }
}
