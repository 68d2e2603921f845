use std::sync::Arc;

use iced::widget::text_editor::{Action, Edit, Motion};
use iced::{Task, keyboard};

use xmlpad_core::event::drain;
use xmlpad_core::{DiskFile, HeightPreset, PanelEvent, UploadResolution};
use xmlpad_syntax::TagPair;

use super::editing::{self, EnterPlan};
use super::platform::{self, DownloadTarget, FileDownloadSink};
use super::{App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::EditorAction(action) => {
                self.edit(action);
                Task::none()
            }

            Message::ThemeSelected(theme) => {
                self.panel.set_theme(theme);
                Task::none()
            }
            Message::FontSizeSelected(size) => {
                self.panel.set_font_size(size);
                Task::none()
            }

            Message::Upload => Task::perform(platform::pick_xml_file(), Message::UploadPicked),
            Message::UploadPicked(Some(file)) => self.start_upload(file),
            Message::UploadPicked(None) => {
                self.status_message = "Upload cancelled".to_string();
                Task::none()
            }
            Message::UploadRead(outcome) => {
                if self.panel.finish_upload(outcome) == UploadResolution::Applied {
                    self.download_name_input = self.panel.download_file_name().to_string();
                    self.refresh_outline();
                }
                Task::none()
            }

            Message::Download => {
                if self.download.ask_location {
                    let name = self.panel.download_file_name().to_string();
                    return Task::perform(
                        platform::pick_save_path(name),
                        Message::DownloadLocationPicked,
                    );
                }
                self.save_download(DownloadTarget::Directory(self.download.target_dir()));
                Task::none()
            }
            Message::DownloadLocationPicked(Some(path)) => {
                self.save_download(DownloadTarget::File(path));
                Task::none()
            }
            Message::DownloadLocationPicked(None) => {
                self.status_message = "Download cancelled".to_string();
                Task::none()
            }
            Message::DownloadNameChanged(name) => {
                self.download_name_input = name.clone();
                self.panel.set_download_file_name(name);
                Task::none()
            }

            Message::Clear => {
                self.panel.clear();
                self.refresh_outline();
                Task::none()
            }
            Message::CopyAll => {
                self.panel.copy_to_clipboard(&mut self.clipboard);
                Task::none()
            }

            Message::DismissAlert => {
                self.alerts.dismiss();
                Task::none()
            }

            Message::ToggleStructure => {
                self.structure_visible = !self.structure_visible;
                Task::none()
            }
            Message::JumpToLine(line) => {
                let host = self.panel.host_mut();
                host.perform(Action::Move(Motion::DocumentStart));
                for _ in 0..line {
                    host.perform(Action::Move(Motion::Down));
                }
                self.status_message = format!("Line {}", line + 1);
                Task::none()
            }

            Message::WindowResized(size) => {
                self.panel.resize(size.width, size.height);
                Task::none()
            }
            Message::KeyPressed(key, modifiers) => self.handle_key_pressed(key, modifiers),
        };

        self.cursor_offset = self.panel.host().cursor_offset();
        self.collect_events();
        task
    }

    pub fn handle_key_pressed(
        &mut self,
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
    ) -> Task<Message> {
        if self.alerts.current().is_some() {
            if matches!(
                key,
                keyboard::Key::Named(keyboard::key::Named::Escape | keyboard::key::Named::Enter)
            ) {
                return self.update(Message::DismissAlert);
            }
            return Task::none();
        }

        match shortcut(&key, modifiers, self.panel.settings().font_size) {
            Some(message) => self.update(message),
            None => Task::none(),
        }
    }

    // ==================== Editing ====================

    fn edit(&mut self, action: Action) {
        let is_edit = action.is_edit();
        let options = self.panel.options().clone();

        match action {
            Action::Edit(Edit::Enter) => {
                let host = self.panel.host_mut();
                let (_, after) = host.cursor_line_split();
                let plan = editing::plan_enter(
                    options.auto_indent,
                    &host.text_before_cursor(),
                    &after,
                    &self.indent_unit,
                );
                match plan {
                    EnterPlan::Plain => host.perform(Action::Edit(Edit::Enter)),
                    EnterPlan::Indent(indent) => paste(host, format!("\n{}", indent)),
                    EnterPlan::Split { inner, outer } => {
                        paste(host, format!("\n{}\n{}", inner, outer));
                        host.perform(Action::Move(Motion::Up));
                        host.perform(Action::Move(Motion::End));
                    }
                }
            }
            Action::Edit(Edit::Paste(text)) if options.format_on_paste => {
                let host = self.panel.host_mut();
                let (line_before, _) = host.cursor_line_split();
                match editing::format_paste(&text, &line_before, &self.indent_unit) {
                    Some(formatted) => {
                        tracing::debug!("Formatted {} pasted bytes", text.len());
                        paste(host, formatted);
                    }
                    None => host.perform(Action::Edit(Edit::Paste(text))),
                }
            }
            Action::Edit(Edit::Insert('/')) if options.format_on_type => {
                let host = self.panel.host_mut();
                host.perform(Action::Edit(Edit::Insert('/')));
                if let Some(completion) = editing::complete_closing_tag(&host.text_before_cursor()) {
                    paste(host, completion);
                }
            }
            action => self.panel.host_mut().perform(action),
        }

        if is_edit {
            self.panel.relay_edit();
            self.refresh_outline();
        }
    }

    // ==================== File Exchange ====================

    fn start_upload(&mut self, file: DiskFile) -> Task<Message> {
        match self.panel.begin_upload(file, &mut self.alerts) {
            Some(pending) => {
                self.status_message = format!("Reading {}...", pending.file_name());
                Task::perform(pending.read(), Message::UploadRead)
            }
            None => Task::none(),
        }
    }

    fn save_download(&mut self, target: DownloadTarget) {
        let mut sink = FileDownloadSink::new(target);
        if let Err(e) = self.panel.download(&mut sink) {
            tracing::error!("Download failed: {}", e);
            self.status_message = format!("Download failed: {}", e);
        }
    }

    // ==================== Derived state ====================

    pub(super) fn refresh_outline(&mut self) {
        let text = self.panel.live_content();
        self.outline = if self.panel.options().folding {
            xmlpad_syntax::fold_ranges(&text)
        } else {
            Vec::new()
        };
        self.pairs = xmlpad_syntax::tag_pairs(&text);
    }

    /// Innermost matched element around the cursor.
    pub fn enclosing_pair(&self) -> Option<&TagPair> {
        let offset = self.cursor_offset;
        self.pairs
            .iter()
            .filter(|pair| pair.open.start < offset && offset <= pair.close.end)
            .max_by_key(|pair| pair.depth)
    }

    fn collect_events(&mut self) {
        for event in drain(&mut self.events) {
            tracing::trace!("Panel event: {:?}", event);
            self.status_message = status_for(&event);
        }
    }
}

fn paste(host: &mut platform::IcedHost, text: String) {
    host.perform(Action::Edit(Edit::Paste(Arc::new(text))));
}

/// Maps a key press outside the editor to a toolbar action.
pub fn shortcut(
    key: &keyboard::Key,
    modifiers: keyboard::Modifiers,
    font_size: xmlpad_core::FontSize,
) -> Option<Message> {
    if !modifiers.control() {
        return None;
    }
    let keyboard::Key::Character(c) = key else {
        return None;
    };

    let c = c.to_lowercase();
    if modifiers.shift() {
        return match c.as_str() {
            "c" => Some(Message::CopyAll),
            "b" => Some(Message::ToggleStructure),
            "+" => Some(Message::FontSizeSelected(font_size.larger())),
            _ => None,
        };
    }

    match c.as_str() {
        "o" => Some(Message::Upload),
        "s" => Some(Message::Download),
        "=" | "+" => Some(Message::FontSizeSelected(font_size.larger())),
        "-" => Some(Message::FontSizeSelected(font_size.smaller())),
        _ => None,
    }
}

/// Status line text for a panel event.
pub fn status_for(event: &PanelEvent) -> String {
    match event {
        PanelEvent::BufferReplaced { file_name, len } => {
            format!("Loaded {} ({} bytes)", file_name, len)
        }
        PanelEvent::Cleared => "Editor cleared".to_string(),
        PanelEvent::ThemeChanged(theme) => format!("Theme: {}", theme),
        PanelEvent::FontSizeChanged(size) => format!("Font size: {}", size),
        PanelEvent::ViewportChanged(HeightPreset::Compact) => "Compact layout".to_string(),
        PanelEvent::ViewportChanged(HeightPreset::Default) => "Default layout".to_string(),
        PanelEvent::UploadRejected { content_type } if content_type.is_empty() => {
            "Upload rejected: unknown file type".to_string()
        }
        PanelEvent::UploadRejected { content_type } => {
            format!("Upload rejected: {}", content_type)
        }
        PanelEvent::UploadFailed { reason, .. } => format!("Upload failed: {}", reason),
        PanelEvent::Downloaded { path, bytes } => {
            format!("Saved {} bytes to {}", bytes, path.display())
        }
        PanelEvent::Copied { len } => format!("Copied {} bytes to clipboard", len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use xmlpad_core::{FontSize, Theme};

    fn ctrl(c: &str) -> Option<Message> {
        shortcut(
            &keyboard::Key::Character(c.into()),
            keyboard::Modifiers::CTRL,
            FontSize::default(),
        )
    }

    #[test]
    fn test_enclosing_pair_follows_cursor() {
        let (mut app, _) = App::new(crate::app::Flags::default());
        let _ = app.update(Message::EditorAction(Action::Edit(Edit::Paste(Arc::new(
            "<a><b></b></a>".to_string(),
        )))));
        assert_eq!(app.cursor_offset, app.panel.live_content().len());
        assert_eq!(app.enclosing_pair().map(|p| p.name.as_str()), Some("a"));

        let _ = app.update(Message::EditorAction(Action::Move(Motion::DocumentStart)));
        assert_eq!(app.cursor_offset, 0);
        assert!(app.enclosing_pair().is_none());
    }

    #[test]
    fn test_shortcuts() {
        assert!(matches!(ctrl("o"), Some(Message::Upload)));
        assert!(matches!(ctrl("s"), Some(Message::Download)));
        assert!(ctrl("x").is_none());

        let copy = shortcut(
            &keyboard::Key::Character("C".into()),
            keyboard::Modifiers::CTRL | keyboard::Modifiers::SHIFT,
            FontSize::default(),
        );
        assert!(matches!(copy, Some(Message::CopyAll)));
    }

    #[test]
    fn test_font_shortcuts_step_sizes() {
        match ctrl("=") {
            Some(Message::FontSizeSelected(size)) => assert_eq!(size.px(), 16),
            other => panic!("unexpected {:?}", other),
        }
        match ctrl("-") {
            Some(Message::FontSizeSelected(size)) => assert_eq!(size.px(), 12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plain_keys_are_not_shortcuts() {
        let key = keyboard::Key::Character("o".into());
        assert!(shortcut(&key, keyboard::Modifiers::empty(), FontSize::default()).is_none());
        let key = keyboard::Key::Named(keyboard::key::Named::Escape);
        assert!(shortcut(&key, keyboard::Modifiers::CTRL, FontSize::default()).is_none());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            status_for(&PanelEvent::BufferReplaced {
                file_name: "a.xml".to_string(),
                len: 12,
            }),
            "Loaded a.xml (12 bytes)"
        );
        assert_eq!(
            status_for(&PanelEvent::ThemeChanged(Theme::HighContrast)),
            "Theme: hc-black"
        );
        assert_eq!(
            status_for(&PanelEvent::FontSizeChanged(FontSize::default())),
            "Font size: 14px"
        );
        assert_eq!(
            status_for(&PanelEvent::UploadRejected {
                content_type: String::new(),
            }),
            "Upload rejected: unknown file type"
        );
        assert_eq!(
            status_for(&PanelEvent::Downloaded {
                path: PathBuf::from("out.xml"),
                bytes: 4,
            }),
            "Saved 4 bytes to out.xml"
        );
    }
}
