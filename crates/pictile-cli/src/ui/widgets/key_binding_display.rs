use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys, what they do, and whether they do anything right now.
#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub keys: &'static [&'static str],
    pub description: &'static str,
    pub enabled: bool,
}

impl KeyBinding {
    pub const fn new(keys: &'static [&'static str], description: &'static str) -> Self {
        Self {
            keys,
            description,
            enabled: true,
        }
    }

    pub const fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

/// One-line help bar. Disabled bindings are dimmed.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding]) -> Self {
        Self { bindings }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut spans = vec![];
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            let (key_style, description_style) = if binding.enabled {
                (KEY_STYLE, DESCRIPTION_STYLE)
            } else {
                (DISABLED_STYLE, DISABLED_STYLE)
            };
            spans.push(Span::styled(binding.keys.join("/"), key_style));
            spans.push(Span::from(" "));
            spans.push(Span::styled(binding.description, description_style));
        }

        Line::from(spans).centered().render(area, buf);
    }
}
