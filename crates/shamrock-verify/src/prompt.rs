//! Judge prompt rendering via `minijinja`.
//!
//! The evidence prompt ships inside the binary (`templates/evidence.j2`).
//! Setting `judge.templates_dir` points the engine at a directory holding a
//! replacement `evidence.j2`, so the wording can be tuned without
//! recompiling.

use minijinja::{Environment, context};
use shamrock_types::{ActionDefinition, ActionReward};
use tracing::info;

use crate::config::JudgeConfig;
use crate::error::VerifyError;

const EVIDENCE_TEMPLATE: &str = include_str!("../templates/evidence.j2");

/// Renders the instruction text sent alongside an evidence image.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create an engine using the built-in template.
    pub fn new() -> Result<Self, VerifyError> {
        Self::with_template(EVIDENCE_TEMPLATE.to_owned())
    }

    /// Create the engine `config` asks for: `templates_dir` when set,
    /// otherwise the built-in template.
    pub fn from_config(config: &JudgeConfig) -> Result<Self, VerifyError> {
        config.templates_dir.as_deref().map_or_else(Self::new, |dir| {
            info!(templates_dir = dir, "Loading judge prompt from directory");
            Self::from_dir(dir)
        })
    }

    /// Create an engine loading `evidence.j2` from `dir`.
    pub fn from_dir(dir: &str) -> Result<Self, VerifyError> {
        let path = format!("{dir}/evidence.j2");
        let source = std::fs::read_to_string(&path)
            .map_err(|e| VerifyError::Template(format!("failed to read {path}: {e}")))?;
        Self::with_template(source)
    }

    fn with_template(source: String) -> Result<Self, VerifyError> {
        let mut env = Environment::new();
        env.add_template_owned("evidence", source)
            .map_err(|e| VerifyError::Template(format!("failed to add evidence template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the prompt for a claim of `action`.
    pub fn render(
        &self,
        action: &ActionDefinition,
        quantity: Option<u64>,
    ) -> Result<String, VerifyError> {
        let unit = match &action.reward {
            ActionReward::PerUnit { unit, .. } => unit.as_str(),
            ActionReward::Fixed { .. } => "",
        };
        self.env
            .get_template("evidence")
            .map_err(|e| VerifyError::Template(format!("missing evidence template: {e}")))?
            .render(context! {
                action => action.kind.as_str(),
                title => action.title,
                quantity => quantity,
                unit => unit,
            })
            .map_err(|e| VerifyError::Template(format!("evidence render failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shamrock_progression::Catalog;
    use shamrock_types::ActionKind;

    use super::*;

    #[test]
    fn renders_action_kind_and_title() {
        let catalog = Catalog::default();
        let engine = PromptEngine::new().unwrap();
        let action = catalog.action(ActionKind::PlantATree).unwrap();
        let text = engine.render(action, None).unwrap();
        assert!(text.contains("PLANT_A_TREE"));
        assert!(text.contains("Plant a Native Tree"));
        assert!(!text.contains("reports"));
    }

    #[test]
    fn renders_quantity_for_per_unit_actions() {
        let catalog = Catalog::default();
        let engine = PromptEngine::new().unwrap();
        let action = catalog.action(ActionKind::DonateVolunteer).unwrap();
        let text = engine.render(action, Some(60)).unwrap();
        assert!(text.contains("60 minutes"));
    }

    #[test]
    fn default_config_uses_the_built_in_template() {
        let catalog = Catalog::default();
        let engine = PromptEngine::from_config(&JudgeConfig::default()).unwrap();
        let action = catalog.action(ActionKind::PlantATree).unwrap();
        assert!(engine.render(action, None).unwrap().contains("PLANT_A_TREE"));
    }

    #[test]
    fn missing_template_dir_is_an_error() {
        let result = PromptEngine::from_dir("/nonexistent/help-ireland/templates");
        assert!(matches!(result, Err(VerifyError::Template(_))));
    }
}
