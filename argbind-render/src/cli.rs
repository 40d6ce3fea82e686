use ansi_term::Colour::{Blue, Cyan, Yellow};
use ansi_term::Style;
use anyhow::Result;

use crate::{usage_line, help_table, HelpData, Renderer};

/// Terminal renderer. Colors are only emitted when enabled.
pub struct CliRenderer {
    color: bool,
}

impl CliRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn render_usage_line(&self, help: &HelpData) -> String {
        let mut parts = vec![Blue.bold().paint(help.program.to_uppercase()).to_string()];
        for parameter in &help.parameters {
            if parameter.is_positional() {
                parts.push(Cyan.paint(parameter.placeholder()).to_string());
            } else if parameter.mandatory {
                parts.push(Yellow.bold().paint(parameter.synopsis()).to_string());
            } else {
                parts.push(format!(
                    "[{}]",
                    Yellow.paint(parameter.synopsis())
                ));
            }
        }
        parts.join(" ")
    }

    fn render_help_table(&self, help: &HelpData) -> String {
        let mut output = String::from("\n");
        for parameter in help.named() {
            output.push_str(&format!(
                "\t{} {}\t{}\n",
                Yellow.paint(format!("-{}", parameter.name)),
                Cyan.paint(&parameter.value_description),
                Style::new().dimmed().paint(&parameter.description)
            ));
        }
        output
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Renderer for CliRenderer {
    fn render_usage(&self, help: &HelpData) -> Result<String> {
        if !self.color {
            return Ok(format!("{}{}", usage_line(help), help_table(help)));
        }
        Ok(format!(
            "{}{}",
            self.render_usage_line(help),
            self.render_help_table(help)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::unit_registry;
    use crate::PlainRenderer;

    fn strip_ansi(text: &str) -> String {
        let mut result = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1B' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    #[test]
    fn colored_usage_has_the_plain_text_underneath() {
        let help = HelpData::from_registry("Unit.exe", &unit_registry());
        let colored = CliRenderer::new(true).render_usage(&help).unwrap();

        assert!(colored.contains('\x1B'));
        assert_eq!(
            strip_ansi(&colored),
            PlainRenderer.render_usage(&help).unwrap()
        );
    }

    #[test]
    fn without_color_output_is_plain() {
        let help = HelpData::from_registry("Unit.exe", &unit_registry());
        let output = CliRenderer::default().render_usage(&help).unwrap();

        assert!(!output.contains('\x1B'));
        assert!(output.starts_with("UNIT.EXE filename [-test]"));
    }
}
