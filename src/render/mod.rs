//! Template rendering for the engine bootstrap scripts
//!
//! Templates are plain text: HTML escaping is disabled and every value that
//! needs quoting goes through an explicit helper instead.
//!
//! | helper          | quoting applied                          |
//! |-----------------|------------------------------------------|
//! | `pg_literal`    | `PostgreSQL` string literal              |
//! | `pg_ident`      | `PostgreSQL` identifier                  |
//! | `mysql_literal` | `MySQL` string literal                   |
//! | `mysql_ident`   | `MySQL` identifier                       |
//! | `sh_quote`      | POSIX shell word                         |

pub mod escape;

use crate::error::{Error, Result};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason,
};
use serde::Serialize;

/// Handlebars registry configured for code generation
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Handlebars::new();

        registry.register_escape_fn(handlebars::no_escape);
        // a misspelled field must fail the render, not vanish from the output
        registry.set_strict_mode(true);

        registry.register_helper("pg_literal", Box::new(pg_literal));
        registry.register_helper("pg_ident", Box::new(pg_ident));
        registry.register_helper("mysql_literal", Box::new(mysql_literal));
        registry.register_helper("mysql_ident", Box::new(mysql_ident));
        registry.register_helper("sh_quote", Box::new(sh_quote));

        Self { registry }
    }

    /// Render `template` against `data` into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Composition`] if the template does not parse or
    /// references something the data does not provide
    pub fn render<T: Serialize>(
        &self,
        name: &'static str,
        template: &str,
        data: &T,
    ) -> Result<String> {
        self.registry
            .render_template(template, data)
            .map_err(|source| Error::Composition {
                template: name,
                source,
            })
    }
}

fn string_param<'a>(h: &'a Helper<'_>, helper: &'static str) -> Result<&'a str, RenderError> {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper, 0))?;

    param.value().as_str().ok_or_else(|| {
        RenderErrorReason::Other(format!(
            "{helper} expects a string, got {}",
            param.value()
        ))
        .into()
    })
}

fn emit<E: std::fmt::Display>(
    out: &mut dyn Output,
    rendered: std::result::Result<String, E>,
) -> HelperResult {
    let rendered = rendered.map_err(|err| RenderErrorReason::Other(err.to_string()))?;
    out.write(&rendered)?;
    Ok(())
}

macro_rules! quoting_helper {
    (@define $helper:ident, $value:ident => $quoted:expr) => {
        fn $helper(
            h: &Helper,
            _: &Handlebars,
            _: &Context,
            _: &mut RenderContext,
            out: &mut dyn Output,
        ) -> HelperResult {
            let $value = string_param(h, stringify!($helper))?;
            emit(out, $quoted)
        }
    };
    ($helper:ident, infallible $quote:path) => {
        quoting_helper!(@define $helper, value => Ok::<_, Error>($quote(value)));
    };
    ($helper:ident, $quote:path) => {
        quoting_helper!(@define $helper, value => $quote(value));
    };
}

quoting_helper!(pg_literal, infallible escape::pg_literal);
quoting_helper!(pg_ident, escape::pg_ident);
quoting_helper!(mysql_literal, infallible escape::mysql_literal);
quoting_helper!(mysql_ident, escape::mysql_ident);
quoting_helper!(sh_quote, infallible escape::shell_quote);
