use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{container, scrollable};
use iced::{Element, Length, Subscription, Task, Theme};

use soundlift_core::conversion::domain::catalog;
use soundlift_core::conversion::domain::conversion_event::ConversionEvent;
use soundlift_core::conversion::domain::conversion_item::ItemId;
use soundlift_core::conversion::domain::conversion_queue::{ConversionQueue, QueueError};
use soundlift_core::conversion::domain::withdrawn_items::WithdrawnItems;
use soundlift_core::conversion::infrastructure::blob_saver;
use soundlift_core::engine::domain::engine_config::EngineConfig;
use soundlift_core::engine::domain::engine_session::{EngineSession, SharedSession};
use soundlift_core::engine::infrastructure::http_resource_fetcher::HttpResourceFetcher;
use soundlift_core::engine::infrastructure::process_engine::ProcessEngine;
use soundlift_core::pipeline::conversion_logger::LogConversionLogger;
use soundlift_core::pipeline::engine_adapter::{EngineAdapter, LoadProgress};
use soundlift_core::shared::constants::{MP3_EXTENSION, VIDEO_EXTENSIONS};
use soundlift_core::shared::output_name::output_file_name;
use soundlift_core::shared::source_file::SourceFile;

use crate::platform;
use crate::screens;
use crate::screens::converter::ConverterView;
use crate::theme;
use crate::workers::batch_worker::{self, BatchMessage, BatchParams};
use crate::workers::load_worker::{self, LoadMessage};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const THEME_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Converter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Loading(Option<LoadProgress>),
    Ready,
}

/// Widgets that animate on hover. At most one is hovered at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Card(usize),
    Back,
    Start,
    Browse,
    ConvertAll,
    DownloadAll,
    ShowInFolder,
    Download(ItemId),
    Remove(ItemId),
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenConverter(&'static str),
    Back,
    StartConverter,
    SelectFiles,
    FilesSelected(Vec<PathBuf>),
    FileDropped(PathBuf),
    FileDragged(bool),
    ConvertAll,
    RemoveItem(ItemId),
    DownloadItem(ItemId),
    DownloadTarget(ItemId, Option<PathBuf>),
    DownloadAll,
    DownloadFolder(Option<PathBuf>),
    ShowInFolder(PathBuf),
    Tick,
    PollSystemTheme,
    Hover(HoverTarget, bool),
    DropZoneHover(bool),
}

pub struct App {
    screen: Screen,
    adapter: Arc<EngineAdapter>,
    session: SharedSession,
    engine: EngineState,
    queue: ConversionQueue,
    withdrawn: WithdrawnItems,
    load_rx: Option<Receiver<LoadMessage>>,
    batch_rx: Option<Receiver<BatchMessage>>,
    error: Option<String>,
    last_saved: Option<PathBuf>,
    hovered: Option<HoverTarget>,
    drop_zone_hovered: bool,
    dark: bool,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let config = EngineConfig::from_env();
        log::info!("Converter resources: {}", config.payload_url());
        let adapter = EngineAdapter::new(Box::new(HttpResourceFetcher::new()), config);
        (
            Self {
                screen: Screen::Catalog,
                adapter: Arc::new(adapter),
                session: EngineSession::new(Box::new(ProcessEngine::new())).into_shared(),
                engine: EngineState::Idle,
                queue: ConversionQueue::new(),
                withdrawn: WithdrawnItems::new(),
                load_rx: None,
                batch_rx: None,
                error: None,
                last_saved: None,
                hovered: None,
                drop_zone_hovered: false,
                dark: platform::is_dark_mode(),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenConverter(id) => {
                if catalog::find(id).is_some_and(|kind| kind.available) {
                    self.screen = Screen::Converter;
                }
                self.hovered = None;
            }
            Message::Back => {
                self.screen = Screen::Catalog;
                self.hovered = None;
            }
            Message::StartConverter => self.start_load(),
            Message::SelectFiles => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Choose videos")
                            .add_filter("Videos", VIDEO_EXTENSIONS)
                            .pick_files()
                            .await
                            .map(|handles| {
                                handles
                                    .iter()
                                    .map(|h| h.path().to_path_buf())
                                    .collect::<Vec<_>>()
                            })
                            .unwrap_or_default()
                    },
                    Message::FilesSelected,
                );
            }
            Message::FilesSelected(paths) => self.add_files(paths),
            Message::FileDropped(path) => {
                self.drop_zone_hovered = false;
                if self.accepts_files() {
                    self.add_files(vec![path]);
                }
            }
            Message::FileDragged(over) => {
                self.drop_zone_hovered = over && self.accepts_files();
            }
            Message::ConvertAll => self.start_batch(),
            Message::RemoveItem(id) => match self.queue.remove_withdrawn(id, &self.withdrawn) {
                Ok(item) => log::debug!("Removed {} from the queue", item.source.name()),
                Err(QueueError::Busy(_)) => log::debug!("Item {id} is converting; not removed"),
                Err(e) => log::warn!("{e}"),
            },
            Message::DownloadItem(id) => {
                let Some(item) = self.queue.get(id) else {
                    return Task::none();
                };
                let name = output_file_name(item.source.name(), MP3_EXTENSION);
                let start_dir = blob_saver::default_download_dir().ok();
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Save MP3 as")
                            .add_filter("MP3 audio", &[MP3_EXTENSION])
                            .set_file_name(name);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        dialog.save_file().await.map(|h| h.path().to_path_buf())
                    },
                    move |path| Message::DownloadTarget(id, path),
                );
            }
            Message::DownloadTarget(id, Some(path)) => self.save_item(id, path),
            Message::DownloadTarget(_, None) => {}
            Message::DownloadAll => {
                let start_dir = blob_saver::default_download_dir().ok();
                return Task::perform(
                    async move {
                        let mut dialog =
                            rfd::AsyncFileDialog::new().set_title("Save all MP3 files to");
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        dialog.pick_folder().await.map(|h| h.path().to_path_buf())
                    },
                    Message::DownloadFolder,
                );
            }
            Message::DownloadFolder(Some(dir)) => self.save_all(&dir),
            Message::DownloadFolder(None) => {}
            Message::ShowInFolder(path) => {
                let folder = path.parent().map(|p| p.to_path_buf()).unwrap_or(path);
                if let Err(e) = open::that(&folder) {
                    log::warn!("Could not open {}: {e}", folder.display());
                }
            }
            Message::Tick => {
                self.drain_load();
                self.drain_batch();
            }
            Message::PollSystemTheme => {
                self.dark = platform::is_dark_mode();
            }
            Message::Hover(target, true) => self.hovered = Some(target),
            Message::Hover(target, false) => {
                if self.hovered == Some(target) {
                    self.hovered = None;
                }
            }
            Message::DropZoneHover(over) => self.drop_zone_hovered = over,
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let theme = self.theme();
        let content: Element<'_, Message> = match self.screen {
            Screen::Catalog => screens::catalog::view(self.hovered, &theme),
            Screen::Converter => screens::converter::view(
                ConverterView {
                    engine: &self.engine,
                    queue: &self.queue,
                    batch_running: self.batch_rx.is_some(),
                    error: self.error.as_deref(),
                    last_saved: self.last_saved.as_deref(),
                    hovered: self.hovered,
                    drop_zone_hovered: self.drop_zone_hovered,
                },
                &theme,
            ),
        };

        container(scrollable(container(content).padding(24)).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.dark)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            iced::time::every(THEME_POLL_INTERVAL).map(|_| Message::PollSystemTheme),
            iced::event::listen_with(|event, _status, _window| match event {
                iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                    Some(Message::FileDropped(path))
                }
                iced::Event::Window(iced::window::Event::FileHovered(_)) => {
                    Some(Message::FileDragged(true))
                }
                iced::Event::Window(iced::window::Event::FilesHoveredLeft) => {
                    Some(Message::FileDragged(false))
                }
                _ => None,
            }),
        ];
        if self.load_rx.is_some() || self.batch_rx.is_some() {
            subscriptions.push(iced::time::every(POLL_INTERVAL).map(|_| Message::Tick));
        }
        Subscription::batch(subscriptions)
    }

    fn accepts_files(&self) -> bool {
        self.screen == Screen::Converter && self.engine == EngineState::Ready
    }

    fn add_files(&mut self, paths: Vec<PathBuf>) {
        let offered = paths.len();
        let added = self.queue.append(paths.into_iter().map(SourceFile::from_path));
        if added.len() < offered {
            log::info!("Ignored {} file(s) that are not videos", offered - added.len());
        }
    }

    fn start_load(&mut self) {
        if self.load_rx.is_some() || self.engine == EngineState::Ready {
            return;
        }
        self.error = None;
        self.engine = EngineState::Loading(None);
        self.load_rx = Some(load_worker::spawn(
            self.adapter.clone(),
            self.session.clone(),
        ));
    }

    fn start_batch(&mut self) {
        if self.batch_rx.is_some() {
            return;
        }
        let items = self.queue.pending();
        if items.is_empty() {
            return;
        }
        self.error = None;
        self.withdrawn = WithdrawnItems::new();
        self.batch_rx = Some(batch_worker::spawn(BatchParams {
            adapter: self.adapter.clone(),
            session: self.session.clone(),
            items,
            withdrawn: self.withdrawn.clone(),
            logger: Box::new(LogConversionLogger::default()),
        }));
    }

    fn drain_load(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(LoadMessage::Progress(progress)) => {
                    self.engine = EngineState::Loading(Some(progress));
                }
                Ok(LoadMessage::Loaded) => {
                    self.engine = EngineState::Ready;
                    return;
                }
                Ok(LoadMessage::Failed(message)) => {
                    self.engine = EngineState::Idle;
                    self.error = Some(message);
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.engine = EngineState::Idle;
                    self.error = Some("The converter stopped unexpectedly.".to_string());
                    return;
                }
            }
        }
        self.load_rx = Some(rx);
    }

    fn drain_batch(&mut self) {
        let Some(rx) = self.batch_rx.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(BatchMessage::Event(event)) => {
                    if let ConversionEvent::Failed { message, .. } = &event {
                        self.error = Some(message.clone());
                    }
                    if let Err(e) = self.queue.apply(&event) {
                        log::warn!("Ignoring batch event: {e}");
                    }
                }
                Ok(BatchMessage::Finished(summary)) => {
                    log::debug!("Batch done: {summary:?}");
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.error = Some("The conversion stopped unexpectedly.".to_string());
                    return;
                }
            }
        }
        self.batch_rx = Some(rx);
    }

    fn save_item(&mut self, id: ItemId, path: PathBuf) {
        let Some(blob) = self.queue.get(id).and_then(|item| item.result.clone()) else {
            return;
        };
        match blob_saver::save(&blob, &path) {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                self.last_saved = Some(path);
            }
            Err(e) => {
                log::error!("{e}");
                self.error = Some(e.to_string());
            }
        }
    }

    fn save_all(&mut self, dir: &Path) {
        let mut last = None;
        for item in self.queue.completed() {
            let Some(blob) = &item.result else { continue };
            let name = output_file_name(item.source.name(), MP3_EXTENSION);
            match blob_saver::save_unique(blob, dir, &name) {
                Ok(path) => last = Some(path),
                Err(e) => {
                    log::error!("{e}");
                    self.error = Some(e.to_string());
                    return;
                }
            }
        }
        if last.is_some() {
            self.last_saved = last;
        }
    }
}
