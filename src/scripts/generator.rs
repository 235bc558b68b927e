//! Completion script generation.
//!
//! # Responsibilities
//! - Hold one template per (shell, mode)
//! - Extract the command and option word lists from the routes
//! - Substitute placeholders and return the script text
//!
//! # Placeholders
//! - `{{APP_NAME}}`: command being completed
//! - `{{FUNC_NAME}}`: `APP_NAME` made safe for shell function names
//! - `{{COMPLETE_COMMAND}}`: reserved callback sub-command
//! - `{{CALLBACK_PROGRAM}}`: executable a dynamic script invokes; defaults
//!   to `APP_NAME`
//! - `{{COMMANDS}}` / `{{OPTIONS}}`: space separated word lists
//! - `{{COMMANDS_QUOTED}}` / `{{OPTIONS_QUOTED}}`: `'a', 'b'` lists

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::completion::protocol::COMPLETE_COMMAND;
use crate::routing::RouteRegistry;
use crate::scripts::shell::{ScriptMode, Shell};

/// Failure to produce a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("no {mode} completion template for {shell}")]
    TemplateMissing { shell: Shell, mode: ScriptMode },

    #[error("unsupported shell `{0}` (expected one of: bash, zsh, fish, powershell)")]
    UnknownShell(String),
}

/// Templates keyed by shell and mode.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<(Shell, ScriptMode), String>,
}

impl TemplateSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The eight templates shipped with the crate.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.insert(Shell::Bash, ScriptMode::Static, include_str!("templates/bash_static.tpl"));
        set.insert(Shell::Bash, ScriptMode::Dynamic, include_str!("templates/bash_dynamic.tpl"));
        set.insert(Shell::Zsh, ScriptMode::Static, include_str!("templates/zsh_static.tpl"));
        set.insert(Shell::Zsh, ScriptMode::Dynamic, include_str!("templates/zsh_dynamic.tpl"));
        set.insert(Shell::Fish, ScriptMode::Static, include_str!("templates/fish_static.tpl"));
        set.insert(Shell::Fish, ScriptMode::Dynamic, include_str!("templates/fish_dynamic.tpl"));
        set.insert(
            Shell::PowerShell,
            ScriptMode::Static,
            include_str!("templates/powershell_static.tpl"),
        );
        set.insert(
            Shell::PowerShell,
            ScriptMode::Dynamic,
            include_str!("templates/powershell_dynamic.tpl"),
        );
        set
    }

    pub fn insert(&mut self, shell: Shell, mode: ScriptMode, template: impl Into<String>) {
        self.templates.insert((shell, mode), template.into());
    }

    pub fn remove(&mut self, shell: Shell, mode: ScriptMode) -> Option<String> {
        self.templates.remove(&(shell, mode))
    }

    pub fn get(&self, shell: Shell, mode: ScriptMode) -> Option<&str> {
        self.templates.get(&(shell, mode)).map(String::as_str)
    }
}

/// Command and option words offered by a static script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordLists {
    pub commands: Vec<String>,
    pub options: Vec<String>,
}

impl WordLists {
    /// Every leading literal and every option form, deduplicated and sorted.
    pub fn from_routes(routes: &RouteRegistry) -> Self {
        let commands: BTreeSet<String> = routes
            .iter()
            .filter_map(|r| r.leading_literal())
            .map(String::from)
            .collect();
        let options: BTreeSet<String> = routes
            .iter()
            .flat_map(|r| r.options())
            .flat_map(|o| o.forms())
            .collect();
        Self {
            commands: commands.into_iter().collect(),
            options: options.into_iter().collect(),
        }
    }
}

/// Renders completion scripts from a template set.
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    templates: TemplateSet,
    callback_program: Option<String>,
}

impl Default for ScriptGenerator {
    fn default() -> Self {
        Self::new(TemplateSet::builtin())
    }
}

impl ScriptGenerator {
    pub fn new(templates: TemplateSet) -> Self {
        Self {
            templates,
            callback_program: None,
        }
    }

    /// Have dynamic scripts invoke `program` instead of the completed
    /// command, e.g. when the command is served by a separate host binary.
    pub fn with_callback_program(mut self, program: impl Into<String>) -> Self {
        self.callback_program = Some(program.into());
        self
    }

    /// Render the script for one shell.
    pub fn generate(
        &self,
        routes: &RouteRegistry,
        app_name: &str,
        shell: Shell,
        mode: ScriptMode,
    ) -> Result<String, ScriptError> {
        let template = self
            .templates
            .get(shell, mode)
            .ok_or(ScriptError::TemplateMissing { shell, mode })?;

        let words = match mode {
            ScriptMode::Static => WordLists::from_routes(routes),
            ScriptMode::Dynamic => WordLists::default(),
        };

        let script = template
            .replace("{{APP_NAME}}", app_name)
            .replace("{{FUNC_NAME}}", &function_name(app_name))
            .replace("{{COMPLETE_COMMAND}}", COMPLETE_COMMAND)
            .replace(
                "{{CALLBACK_PROGRAM}}",
                self.callback_program.as_deref().unwrap_or(app_name),
            )
            .replace("{{COMMANDS_QUOTED}}", &quoted(&words.commands))
            .replace("{{OPTIONS_QUOTED}}", &quoted(&words.options))
            .replace("{{COMMANDS}}", &words.commands.join(" "))
            .replace("{{OPTIONS}}", &words.options.join(" "));

        tracing::debug!(shell = %shell, mode = %mode, bytes = script.len(), "Completion script rendered");
        Ok(script)
    }

    /// Render scripts for every supported shell.
    pub fn generate_all(
        &self,
        routes: &RouteRegistry,
        app_name: &str,
        mode: ScriptMode,
    ) -> Result<Vec<(Shell, String)>, ScriptError> {
        Shell::ALL
            .iter()
            .map(|&shell| Ok((shell, self.generate(routes, app_name, shell, mode)?)))
            .collect()
    }
}

fn function_name(app_name: &str) -> String {
    app_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn quoted(words: &[String]) -> String {
    words
        .iter()
        .map(|w| format!("'{}'", w.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}
