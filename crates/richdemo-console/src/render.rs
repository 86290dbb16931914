//! Turning content into terminal bytes.
//!
//! The [`Renderer`] trait is the seam between the coordinator and the
//! styling engine. The coordinator hands it one [`Line`] at a time and
//! writes whatever string comes back; it never looks at styles itself.
//!
//! Style descriptors are space separated tokens:
//!
//! | Token | Effect |
//! |-------|--------|
//! | `bold` `dim` `italic` `underline` `blink` `reverse` | attributes |
//! | `red` `bright_red` `grey` ... | foreground colour |
//! | `color(208)` `#ff8800` | 256-colour foreground |
//! | `on <colour>` | background colour |
//! | `default` `none` | no-op |

use console::{Color, Style};

use crate::content::{Line, Span, StyleSpec};
use crate::error::{ConsoleError, ConsoleResult};

/// Converts lines into the bytes written to the terminal.
pub trait Renderer: Send {
    /// Render one line. Must not emit a trailing newline.
    fn render_line(&self, line: &Line) -> ConsoleResult<String>;

    /// Whether the output carries ANSI styling.
    fn color_enabled(&self) -> bool;
}

/// ANSI renderer backed by the `console` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer;

impl Renderer for AnsiRenderer {
    fn render_line(&self, line: &Line) -> ConsoleResult<String> {
        let mut out = String::new();
        for span in line.spans() {
            match span {
                Span::Plain(text) => out.push_str(text),
                Span::Styled { text, style } => {
                    let style = resolve_style(style)?;
                    out.push_str(&style.apply_to(text).to_string());
                }
            }
        }
        Ok(out)
    }

    fn color_enabled(&self) -> bool {
        true
    }
}

/// Text-only renderer. Styles are still validated so plain and rich mode
/// fail on the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render_line(&self, line: &Line) -> ConsoleResult<String> {
        let mut out = String::new();
        for span in line.spans() {
            if let Some(style) = span.style() {
                resolve_style(style)?;
            }
            out.push_str(span.text());
        }
        Ok(out)
    }

    fn color_enabled(&self) -> bool {
        false
    }
}

/// Pick a renderer for the given mode.
#[must_use]
pub fn renderer_for(rich: bool) -> Box<dyn Renderer> {
    if rich {
        Box::new(AnsiRenderer)
    } else {
        Box::new(PlainRenderer)
    }
}

/// Resolve a style descriptor into a `console::Style`.
pub fn resolve_style(spec: &StyleSpec) -> ConsoleResult<Style> {
    let mut style = Style::new().force_styling(true);
    let mut tokens = spec.as_str().split_whitespace();

    while let Some(token) = tokens.next() {
        let token = token.to_ascii_lowercase();
        style = match token.as_str() {
            "bold" => style.bold(),
            "dim" => style.dim(),
            "italic" => style.italic(),
            "underline" => style.underlined(),
            "blink" => style.blink(),
            "reverse" => style.reverse(),
            "strike" | "strikethrough" => style.strikethrough(),
            "default" | "none" => style,
            "on" => {
                let Some(bg) = tokens.next() else {
                    return Err(ConsoleError::render_failure(format!(
                        "style '{spec}' ends with 'on' but names no background colour"
                    )));
                };
                let (color, bright) = parse_color(&bg.to_ascii_lowercase()).ok_or_else(|| {
                    ConsoleError::render_failure(format!("unknown background colour '{bg}'"))
                })?;
                let style = style.bg(color);
                if bright { style.on_bright() } else { style }
            }
            other => {
                let (color, bright) = parse_color(other).ok_or_else(|| {
                    ConsoleError::render_failure(format!("unknown style token '{other}'"))
                })?;
                let style = style.fg(color);
                if bright { style.bright() } else { style }
            }
        };
    }

    Ok(style)
}

/// Returns the colour and whether it is the bright variant.
fn parse_color(token: &str) -> Option<(Color, bool)> {
    if let Some(base) = token.strip_prefix("bright_") {
        return named_color(base).map(|c| (c, true));
    }
    if let Some(c) = named_color(token) {
        return Some((c, false));
    }
    if let Some(index) = token
        .strip_prefix("color(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return index.parse::<u8>().ok().map(|i| (Color::Color256(i), false));
    }
    if let Some(hex) = token.strip_prefix('#') {
        return hex_to_256(hex).map(|i| (Color::Color256(i), false));
    }
    match token {
        "grey" | "gray" => Some((Color::Color256(244), false)),
        "orange" => Some((Color::Color256(208), false)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    Some(match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        _ => return None,
    })
}

/// Map `rrggbb` onto the 6x6x6 cube of the 256-colour palette.
fn hex_to_256(hex: &str) -> Option<u8> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let cube = |v: u8| -> u8 { ((u16::from(v) * 5 + 127) / 255) as u8 };
    Some(16 + 36 * cube(r) + 6 * cube(g) + cube(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tokens() {
        for spec in [
            "bold",
            "bold red",
            "dim italic",
            "bright_blue",
            "underline magenta on white",
            "color(208)",
            "#ff8800",
            "bold bright_yellow on bright_black",
            "grey",
            "default",
            "strike",
            "dim strikethrough red",
        ] {
            assert!(resolve_style(&StyleSpec::new(spec)).is_ok(), "{spec}");
        }
    }

    #[test]
    fn test_strike_emits_sgr_9() {
        let style = resolve_style(&StyleSpec::new("strike")).unwrap();
        assert!(style.apply_to("gone").to_string().contains("\x1b[9m"));
    }

    #[test]
    fn test_unknown_token_is_render_failure() {
        let err = resolve_style(&StyleSpec::new("blod red")).unwrap_err();
        assert!(matches!(err, ConsoleError::RenderFailure { .. }));
        assert!(err.to_string().contains("blod"));
    }

    #[test]
    fn test_dangling_on_is_render_failure() {
        let err = resolve_style(&StyleSpec::new("red on")).unwrap_err();
        assert!(matches!(err, ConsoleError::RenderFailure { .. }));
    }

    #[test]
    fn test_ansi_renderer_emits_escape_codes() {
        let line = Line::styled("hi", "bold red");
        let out = AnsiRenderer.render_line(&line).unwrap();
        assert!(out.contains("\x1b["));
        assert!(out.contains("hi"));
    }

    #[test]
    fn test_plain_renderer_strips_styles() {
        let line = Line::from_spans(vec![Span::plain("a "), Span::styled("b", "green")]);
        assert_eq!(PlainRenderer.render_line(&line).unwrap(), "a b");
    }

    #[test]
    fn test_plain_renderer_still_validates() {
        let line = Line::styled("b", "greeen");
        assert!(PlainRenderer.render_line(&line).is_err());
    }

    #[test]
    fn test_hex_to_256() {
        assert_eq!(hex_to_256("000000"), Some(16));
        assert_eq!(hex_to_256("ffffff"), Some(231));
        assert_eq!(hex_to_256("zzzzzz"), None);
        assert_eq!(hex_to_256("fff"), None);
    }
}
