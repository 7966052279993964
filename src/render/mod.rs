//! HTML rendering subsystem.
//!
//! # Responsibilities
//! - Load every template and partial from disk once at startup
//! - Register the formatting helpers templates rely on
//! - Render a named template against an aggregated context
//!
//! # Design Decisions
//! - The environment is immutable after construction and shared via `Arc`;
//!   there is no runtime template registration
//! - Partials are addressable by bare name (`{% include "metrics" %}`),
//!   top-level templates by file name (`author.html`)
//! - A partial or template filename that is not `<name>.html` is silently
//!   skipped, matching how the partial directory is treated as a grab bag

pub mod helpers;

use minijinja::Environment;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Rendering failures are unrecoverable for the current request; template
/// load failures are unrecoverable for the process.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template directory `{dir}`: {source}")]
    Io {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Immutable template environment assembled once at process start.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Build the environment from a template directory and a partial
    /// directory. Fails if either directory is unreadable or any template
    /// has a syntax error.
    pub fn from_dirs(templates: &Path, partials: &Path) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        helpers::register(&mut env);

        for (stem, source) in read_templates(partials)? {
            tracing::debug!(partial = %stem, "registering partial");
            env.add_template_owned(stem, source)?;
        }
        for (stem, source) in read_templates(templates)? {
            let name = format!("{stem}.html");
            tracing::debug!(template = %name, "registering template");
            env.add_template_owned(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render `template` with the given context. Pure apart from reading
    /// the pre-loaded template text.
    pub fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        let template = self.env.get_template(template)?;
        Ok(template.render(context)?)
    }
}

/// Yield `(stem, source)` for every well-formed `<stem>.html` file in
/// `dir`, skipping anything else (subdirectories, dotted stems, other
/// extensions) without complaint.
fn read_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let io_err = |source| RenderError::Io {
        dir: dir.display().to_string(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(stem) = name.strip_suffix(".html") else {
            continue;
        };
        if stem.is_empty() || stem.contains('.') {
            continue;
        }
        let source = fs::read_to_string(entry.path()).map_err(io_err)?;
        found.push((stem.to_string(), source));
    }
    // Directory iteration order is platform-dependent; sort for stable logs.
    found.sort();
    Ok(found)
}
