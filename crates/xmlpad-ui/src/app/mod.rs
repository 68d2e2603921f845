use iced::{Subscription, Task, keyboard, window};
use std::path::PathBuf;
use tokio::sync::broadcast;

use xmlpad_core::config::DownloadConfig;
use xmlpad_core::{AlertQueue, Config, DiskFile, EditorPanel, PanelEvent};
use xmlpad_syntax::{FoldRange, TagPair};

pub mod editing;
pub mod messages;
pub mod platform;
pub mod update;
pub mod view;

pub use messages::*;
use platform::{ArboardClipboard, IcedHost};

/// Startup options handed over by the binary.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub config: Config,
    /// File uploaded at startup
    pub file: Option<PathBuf>,
}

pub struct App {
    pub panel: EditorPanel<IcedHost>,
    pub alerts: AlertQueue,
    pub clipboard: ArboardClipboard,
    pub events: broadcast::Receiver<PanelEvent>,
    pub status_message: String,
    pub outline: Vec<FoldRange>,
    /// Matched tags of the live content
    pub pairs: Vec<TagPair>,
    /// Cursor byte offset, refreshed after every message
    pub cursor_offset: usize,
    pub download_name_input: String,
    pub indent_unit: String,
    pub download: DownloadConfig,
    pub structure_visible: bool,
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags { config, file } = flags;

        let panel = EditorPanel::new(IcedHost::new(), &config);
        let events = panel.subscribe();

        let mut app = Self {
            download_name_input: panel.download_file_name().to_string(),
            panel,
            alerts: AlertQueue::new(),
            clipboard: ArboardClipboard::default(),
            events,
            status_message: "Ready | Ctrl+O: Upload | Ctrl+S: Download | Ctrl+Shift+C: Copy"
                .to_string(),
            outline: Vec::new(),
            pairs: Vec::new(),
            cursor_offset: 0,
            indent_unit: config.editor.indent_unit(),
            download: config.download.clone(),
            structure_visible: config.editor.options.folding,
        };

        let task = match file {
            Some(path) => app.update(Message::UploadPicked(Some(DiskFile::new(path)))),
            None => Task::none(),
        };
        (app, task)
    }

    pub fn title(&self) -> String {
        format!("{} - XML Pad", self.panel.download_file_name())
    }

    pub fn theme(&self) -> iced::Theme {
        self.palette().iced_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keyboard_sub = keyboard::on_key_press(|key, modifiers| {
            Some(Message::KeyPressed(key, modifiers))
        });

        Subscription::batch([
            keyboard_sub,
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }
}

pub fn run(flags: Flags) -> iced::Result {
    let size = iced::Size::new(flags.config.window.width, flags.config.window.height);

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(size)
        .theme(App::theme)
        .antialiasing(true)
        .run_with(move || App::new(flags.clone()))
}
