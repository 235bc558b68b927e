//! A routed application assembled from configuration.
//!
//! # Responsibilities
//! - Register configured types on top of the built-ins
//! - Compile every configured route, skipping the ones that fail
//! - Register static completion sources
//! - Serve the callback, line-editor suggestions and script generation

use std::io::{self, Write};

use crate::completion::{
    run_callback, CompletionCandidate, CompletionContext, CompletionProvider,
    CompletionSourceRegistry, CursorOrigin, DynamicCompleter, StaticValuesSource,
};
use crate::config::AppConfig;
use crate::routing::{CompilationError, RouteMatch, RouteRegistry};
use crate::scripts::{ScriptError, ScriptGenerator, ScriptMode, Shell};
use crate::types::TypeRegistry;

/// Everything a completion request needs, built once per process.
#[derive(Debug)]
pub struct App {
    pub name: String,
    pub routes: RouteRegistry,
    pub sources: CompletionSourceRegistry,
    pub origin: CursorOrigin,
    /// Routes whose patterns failed to compile.
    pub rejected: Vec<CompilationError>,
}

impl App {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut types = TypeRegistry::with_builtins();
        for ty in &config.types {
            types.register_shared(&ty.name, ty.converter());
        }

        let mut builder = RouteRegistry::builder(&types);
        let mut rejected = Vec::new();
        for route in &config.routes {
            let handler = route.handler.clone().unwrap_or_else(|| route.pattern.clone());
            if let Err(e) = builder.add_described(&route.pattern, handler, route.description.clone()) {
                tracing::error!(pattern = %route.pattern, error = %e, "Skipping route");
                rejected.push(e);
            }
        }
        let routes = builder.build();

        let mut sources = CompletionSourceRegistry::new();
        for source in &config.sources {
            let mut values = StaticValuesSource::new(source.values.iter().cloned());
            if let Some(description) = &source.description {
                values = values.with_description(description.clone());
            }
            match (&source.parameter, &source.type_name) {
                (Some(parameter), _) => {
                    sources.register_for_parameter(parameter, values);
                }
                (None, Some(type_name)) => {
                    sources.register_for_type(type_name, values);
                }
                (None, None) => {
                    tracing::warn!("Ignoring completion source with no target");
                }
            }
        }

        let origin = if config.completion.cursor_includes_program {
            CursorOrigin::ProgramName
        } else {
            CursorOrigin::FirstArgument
        };

        tracing::info!(
            app = %config.app_name,
            routes = routes.len(),
            rejected = rejected.len(),
            types = types.len(),
            "Application assembled"
        );

        Self {
            name: config.app_name.clone(),
            routes,
            sources,
            origin,
            rejected,
        }
    }

    /// Answer one `__complete` invocation.
    pub fn complete<W: Write>(&self, args: &[String], out: &mut W) -> io::Result<()> {
        run_callback(args, &self.routes, &self.sources, self.origin, out)
    }

    /// Candidates for a raw command line, as a line editor would ask.
    pub fn suggest(&self, line: &str) -> Vec<CompletionCandidate> {
        let ctx = CompletionContext::from_line(line, &self.routes);
        DynamicCompleter::new(&self.sources).candidates(&ctx)
    }

    /// The route a full argument list dispatches to.
    pub fn resolve(&self, args: &[String]) -> Option<RouteMatch<'_>> {
        self.routes.resolve(args)
    }

    /// Render a completion script. `callback_program` replaces the command
    /// name in the callback of dynamic scripts.
    pub fn script(
        &self,
        shell: Shell,
        mode: ScriptMode,
        callback_program: Option<&str>,
    ) -> Result<String, ScriptError> {
        let mut generator = ScriptGenerator::default();
        if let Some(program) = callback_program {
            generator = generator.with_callback_program(program);
        }
        generator.generate(&self.routes, &self.name, shell, mode)
    }
}
