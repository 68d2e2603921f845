use iced::widget::{
    Column, Row, Space, button, column, container, row, scrollable, text, text_editor,
};
use iced::{Background, Border, Color, Element, Font, Length, Padding, Theme};

use xmlpad_core::config::LineHighlight;
use xmlpad_syntax::FoldKind;

use crate::app::{App, Message};
use crate::highlighter::{EditorHighlighter, HighlightSettings};

impl App {
    pub fn view_main_area(&self) -> Element<'_, Message> {
        let binding = self.binding();
        let mut items: Vec<Element<'_, Message>> = Vec::new();

        if self.structure_visible && binding.options.folding {
            items.push(self.view_structure_panel());
        }
        items.push(self.view_editor());
        if binding.options.minimap {
            items.push(self.view_minimap());
        }

        let height = self.panel.settings().viewport.editor_height();

        column![
            Row::with_children(items).height(Length::Fixed(height)),
            Space::with_height(Length::Fill),
        ]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    pub fn view_editor(&self) -> Element<'_, Message> {
        let p = self.palette();
        let binding = self.binding();

        let highlight_settings = HighlightSettings {
            theme: binding.theme,
            bracket_pairs: binding.options.bracket_pair_colorization,
        };

        // The editor scrolls itself; wrapping it in scrollable() resets the
        // scroll position on every re-render.
        text_editor(self.panel.host().content())
            .placeholder("Upload an XML file or start typing...")
            .height(Length::Fill)
            .padding(Padding {
                top: 12.0,
                right: 16.0,
                bottom: 12.0,
                left: 16.0,
            })
            .font(Font::MONOSPACE)
            .size(f32::from(binding.font_size.px()))
            .style(move |_theme: &Theme, _status| text_editor::Style {
                background: Background::Color(p.background.editor),
                border: Border {
                    width: 1.0,
                    radius: 0.0.into(),
                    color: p.border,
                },
                icon: p.foreground.muted,
                placeholder: p.foreground.muted,
                value: p.foreground.primary,
                selection: p.background.selection,
            })
            .highlight_with::<EditorHighlighter>(highlight_settings, |highlight, _theme| {
                highlight.to_format(Font::MONOSPACE)
            })
            .on_action(Message::EditorAction)
            .into()
    }

    /// Collapsible regions of the document. Clicking one moves the cursor to
    /// its first line.
    pub fn view_structure_panel(&self) -> Element<'_, Message> {
        let p = self.palette();
        let (cursor_line, _) = self.panel.host().cursor();

        let header = container(
            text("STRUCTURE")
                .size(11)
                .color(p.foreground.secondary)
                .font(Font::MONOSPACE),
        )
        .padding(Padding::from([8, 10]))
        .width(Length::Fill);

        let mut items: Vec<Element<'_, Message>> = Vec::new();
        for range in &self.outline {
            let is_current = (range.start_line..=range.end_line).contains(&cursor_line);
            let (icon, icon_color) = match range.kind {
                FoldKind::Element => ("<>", p.syntax.tag),
                FoldKind::Comment => ("//", p.syntax.comment),
                FoldKind::CData => ("[]", p.syntax.cdata),
            };
            let name_color = if is_current {
                p.foreground.accent
            } else {
                p.foreground.primary
            };

            let entry = row![
                Space::with_width(Length::Fixed(range.depth as f32 * 10.0)),
                text(icon).size(10).font(Font::MONOSPACE).color(icon_color),
                Space::with_width(6),
                text(range.label.as_str()).size(11).color(name_color),
                Space::with_width(6),
                text(format!("{} +{}", range.start_line + 1, range.hidden_lines()))
                    .size(10)
                    .color(p.foreground.muted),
            ]
            .align_y(iced::Alignment::Center);

            items.push(
                button(entry)
                    .width(Length::Fill)
                    .padding(Padding::from([3, 10]))
                    .style(move |_: &Theme, status: button::Status| {
                        let bg = match status {
                            button::Status::Hovered => p.background.hover,
                            _ if is_current => p.background.active,
                            _ => Color::TRANSPARENT,
                        };
                        button::Style {
                            background: Some(Background::Color(bg)),
                            text_color: p.foreground.primary,
                            border: Border::default(),
                            ..Default::default()
                        }
                    })
                    .on_press(Message::JumpToLine(range.start_line))
                    .into(),
            );
        }

        if items.is_empty() {
            items.push(
                container(text("No foldable regions").size(11).color(p.foreground.muted))
                    .padding(Padding::from([8, 10]))
                    .into(),
            );
        }

        container(column![
            header,
            scrollable(Column::with_children(items).width(Length::Fill)).height(Length::Fill),
        ])
        .width(Length::Fixed(220.0))
        .height(Length::Fill)
        .style(move |_| container::Style {
            background: Some(Background::Color(p.background.panel)),
            border: Border {
                color: p.border,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
    }

    pub fn view_minimap(&self) -> Element<'_, Message> {
        const MAX_LINES: usize = 200;

        let p = self.palette();
        let host = self.panel.host();
        let total_lines = host.line_count();
        let (cursor_line, _) = host.cursor();
        let highlight_current =
            self.binding().options.render_line_highlight != LineHighlight::None;

        let lines_to_show = total_lines.min(MAX_LINES);
        let mut lines: Vec<Element<'_, Message>> = Vec::with_capacity(lines_to_show);

        for i in 0..lines_to_show {
            let line_idx = if total_lines <= MAX_LINES {
                i
            } else {
                i * total_lines / MAX_LINES
            };

            let line_text = host.line(line_idx).unwrap_or_default();
            let line_len = line_text.trim_end().len().min(80);
            let indent = (line_text.len() - line_text.trim_start().len()).min(40);
            let content_len = line_len.saturating_sub(indent);

            let color = if highlight_current && line_idx == cursor_line {
                Color {
                    a: 0.6,
                    ..p.foreground.accent
                }
            } else if line_text.trim_start().starts_with("<!--") {
                Color {
                    a: 0.35,
                    ..p.syntax.comment
                }
            } else {
                Color {
                    a: 0.3,
                    ..p.syntax.tag
                }
            };

            lines.push(
                row![
                    Space::with_width(Length::Fixed(indent as f32 * 0.8)),
                    container(Space::new(
                        Length::Fixed((content_len as f32 * 0.8).max(1.0)),
                        2
                    ))
                    .style(move |_| container::Style {
                        background: Some(Background::Color(color)),
                        ..Default::default()
                    }),
                ]
                .into(),
            );
        }

        container(scrollable(Column::with_children(lines).width(Length::Fill)).height(Length::Fill))
            .width(Length::Fixed(80.0))
            .height(Length::Fill)
            .padding(Padding::from([4, 4]))
            .style(move |_| container::Style {
                background: Some(Background::Color(p.background.panel)),
                border: Border {
                    color: p.border,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }
}
