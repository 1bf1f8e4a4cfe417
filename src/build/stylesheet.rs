//! SCSS-style stylesheet conversion.
//!
//! Nested rules are lowered to flat CSS with lightningcss, so authors can
//! write `.scss` files using nesting and get browser-ready `.css` output.
//! Sass variables, mixins and `@use` are not supported.

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use lightningcss::targets::{Features, Targets};

use super::convert::{ConvertError, Converter};
use crate::config::StylesheetConfig;

/// Converter from `.scss` sources to `.css`.
pub struct StylesheetConverter {
    minify: bool,
}

impl StylesheetConverter {
    pub fn new(config: &StylesheetConfig) -> Self {
        Self {
            minify: config.minify,
        }
    }
}

/// Targets forcing nesting to be compiled away regardless of browser support.
fn lowering_targets() -> Targets {
    Targets {
        include: Features::Nesting,
        ..Targets::default()
    }
}

impl Converter for StylesheetConverter {
    fn name(&self) -> &'static str {
        "stylesheet"
    }

    fn output_extension(&self) -> &str {
        "css"
    }

    fn matches(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("scss")
    }

    fn convert(&self, content: &str) -> Result<String, ConvertError> {
        let mut stylesheet = StyleSheet::parse(content, ParserOptions::default())
            .map_err(|e| ConvertError::Stylesheet(e.to_string()))?;

        stylesheet
            .minify(MinifyOptions {
                targets: lowering_targets(),
                ..MinifyOptions::default()
            })
            .map_err(|e| ConvertError::Stylesheet(e.to_string()))?;

        let output = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                targets: lowering_targets(),
                ..PrinterOptions::default()
            })
            .map_err(|e| ConvertError::Stylesheet(e.to_string()))?;

        Ok(output.code)
    }
}
