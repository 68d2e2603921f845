pub mod editor;

use iced::widget::{
    Space, button, column, container, horizontal_space, mouse_area, pick_list, row, stack, text,
    text_input,
};
use iced::{Background, Border, Color, Element, Length, Padding, Theme};

use xmlpad_core::config::LineNumbers;
use xmlpad_core::{FontSize, HostBinding};

use crate::app::{App, Message};
use crate::theme::{Palette, palette};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let p = self.palette();

        let content = column![
            self.view_toolbar(),
            self.view_main_area(),
            self.view_status_bar(),
        ];

        let main_view: Element<'_, Message> = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| container::Style {
                background: Some(Background::Color(p.background.chrome)),
                ..Default::default()
            })
            .into();

        match self.alerts.current() {
            Some(message) => stack![
                main_view,
                mouse_area(
                    container(Space::new(Length::Fill, Length::Fill))
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .style(|_| container::Style {
                            background: Some(Background::Color(Color::from_rgba(
                                0.0, 0.0, 0.0, 0.5
                            ))),
                            ..Default::default()
                        })
                )
                .on_press(Message::DismissAlert),
                self.view_alert_modal(message),
            ]
            .into(),
            None => main_view,
        }
    }

    /// Binding as last applied to the widget, falling back to the panel's.
    pub(crate) fn binding(&self) -> HostBinding {
        self.panel
            .host()
            .binding()
            .cloned()
            .unwrap_or_else(|| self.panel.binding())
    }

    pub(crate) fn palette(&self) -> &'static Palette {
        palette(self.binding().theme)
    }

    pub fn view_toolbar(&self) -> Element<'_, Message> {
        let p = self.palette();
        let binding = self.binding();

        let label = |s: &'static str| text(s).size(12).color(p.foreground.secondary);

        let theme_picker = pick_list(
            xmlpad_core::Theme::ALL,
            Some(binding.theme),
            Message::ThemeSelected,
        )
        .text_size(12)
        .padding(Padding::from([4, 8]));

        let font_picker = pick_list(
            FontSize::ALL,
            Some(binding.font_size),
            Message::FontSizeSelected,
        )
        .text_size(12)
        .padding(Padding::from([4, 8]));

        let name_input = text_input("document.xml", &self.download_name_input)
            .on_input(Message::DownloadNameChanged)
            .on_submit(Message::Download)
            .size(12)
            .padding(Padding::from([4, 8]))
            .width(Length::Fixed(180.0));

        let toolbar = row![
            label("Theme"),
            theme_picker,
            Space::with_width(12),
            label("Font"),
            font_picker,
            Space::with_width(12),
            toolbar_button("Upload", Message::Upload, p),
            toolbar_button("Download", Message::Download, p),
            name_input,
            Space::with_width(12),
            toolbar_button("Copy", Message::CopyAll, p),
            toolbar_button("Clear", Message::Clear, p),
            horizontal_space(),
            toolbar_button(
                if self.structure_visible { "Hide structure" } else { "Structure" },
                Message::ToggleStructure,
                p,
            ),
        ]
        .spacing(6)
        .padding(Padding::from([6, 10]))
        .align_y(iced::Alignment::Center);

        container(toolbar)
            .width(Length::Fill)
            .style(move |_| container::Style {
                background: Some(Background::Color(p.background.chrome)),
                border: Border {
                    color: p.border,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    pub fn view_alert_modal<'a>(&'a self, message: &'a str) -> Element<'a, Message> {
        let p = self.palette();

        let modal_content = column![
            text(message).size(14).color(p.foreground.primary),
            Space::with_height(16),
            row![
                horizontal_space(),
                button(text("OK").size(13).color(Color::WHITE))
                    .padding(Padding::from([8, 20]))
                    .style(move |_: &Theme, status: button::Status| {
                        let bg = match status {
                            button::Status::Hovered => Color {
                                a: 0.85,
                                ..p.foreground.accent
                            },
                            _ => p.foreground.accent,
                        };
                        button::Style {
                            background: Some(Background::Color(bg)),
                            text_color: Color::WHITE,
                            border: Border {
                                radius: 4.0.into(),
                                ..Default::default()
                            },
                            ..Default::default()
                        }
                    })
                    .on_press(Message::DismissAlert),
            ],
        ]
        .padding(24)
        .width(Length::Fixed(360.0));

        container(container(modal_content).style(move |_| container::Style {
            background: Some(Background::Color(p.background.chrome)),
            border: Border {
                color: p.border,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    pub fn view_status_bar(&self) -> Element<'_, Message> {
        let p = self.palette();
        let binding = self.binding();

        let cursor_info = match binding.options.line_numbers {
            LineNumbers::Off => String::new(),
            LineNumbers::On | LineNumbers::Relative => {
                let (line, col) = self.panel.host().cursor();
                format!(
                    "Ln {}/{}, Col {}",
                    line + 1,
                    self.panel.host().line_count(),
                    col + 1
                )
            }
        };

        let element_info = self
            .enclosing_pair()
            .map(|pair| format!("<{}>", pair.name))
            .unwrap_or_default();

        let status_content = row![
            text(&self.status_message)
                .size(12)
                .color(p.foreground.secondary),
            horizontal_space(),
            text(element_info).size(12).color(p.syntax.tag),
            Space::with_width(24),
            text(self.panel.download_file_name())
                .size(12)
                .color(p.foreground.secondary),
            Space::with_width(24),
            text(cursor_info).size(12).color(p.foreground.primary),
            Space::with_width(24),
            text(binding.language).size(12).color(p.foreground.accent),
            Space::with_width(24),
            text("UTF-8").size(12).color(p.foreground.secondary),
            Space::with_width(12),
        ]
        .padding(Padding::from([6, 12]))
        .align_y(iced::Alignment::Center);

        container(status_content)
            .width(Length::Fill)
            .height(28)
            .style(move |_| container::Style {
                background: Some(Background::Color(p.background.chrome)),
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

fn toolbar_button<'a>(
    label: &'a str,
    message: Message,
    p: &'static Palette,
) -> Element<'a, Message> {
    button(text(label).size(12).color(p.foreground.primary))
        .padding(Padding::from([5, 12]))
        .style(move |_: &Theme, status: button::Status| {
            let bg = match status {
                button::Status::Hovered => p.background.hover,
                button::Status::Pressed => p.background.active,
                _ => p.background.panel,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: p.foreground.primary,
                border: Border {
                    color: p.border,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press(message)
        .into()
}
