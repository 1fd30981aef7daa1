use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length, Task, Theme};
use log::{debug, error, info, warn};
use rfd::FileDialog;
use std::sync::Arc;

mod analysis;
mod color;
mod config;
mod decode;
mod error;
mod state;
mod ui;

use config::QcConfig;
use decode::loader::{load_uploads, ACCEPTED_EXTENSIONS};
use state::data::{FileOutcome, UploadedFile};
use state::ratings::{Rating, RatingsTable};
use state::session::{run_pass, ReviewPass};

/// Main application state
///
/// Only the uploads and the slider positions live here. Everything shown
/// for the files is recomputed by a review pass after each interaction.
struct HdrQc {
    config: QcConfig,
    /// Uploaded files in upload order
    files: Vec<UploadedFile>,
    /// Slider positions, fed back into the next pass
    widget_ratings: RatingsTable,
    /// Result of the latest completed pass
    pass: Option<Result<Arc<ReviewPass>, String>>,
    /// Preview handles, index-aligned with the pass reports
    previews: Vec<Option<Handle>>,
    /// Tag of the most recently started pass
    generation: u64,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Upload images" button
    UploadFiles,
    /// Background read of the picked files finished
    UploadComplete(Result<Vec<UploadedFile>, String>),
    /// User clicked "Clear"
    ClearFiles,
    /// A rating slider moved
    RatingChanged(String, u8),
    /// A review pass finished; carries the generation it was started with
    PassComplete(u64, Result<Arc<ReviewPass>, String>),
}

impl HdrQc {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, status) = match QcConfig::load() {
            Ok(config) => (config, "Ready. Upload images to begin.".to_string()),
            Err(e) => {
                warn!("{}; using default settings", e);
                (QcConfig::default(), format!("Using default settings ({})", e))
            }
        };

        info!("HDR QC initialized ({:?} luminance weighting)", config.luminance_order);

        (
            HdrQc {
                config,
                files: Vec::new(),
                widget_ratings: RatingsTable::new(),
                pass: None,
                previews: Vec::new(),
                generation: 0,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadFiles => {
                // Show the native multi-file picker
                let picked = FileDialog::new()
                    .set_title("Upload one or more HDR images (.hdr, .exr, .tiff, .png, .jpg)")
                    .add_filter("Images", &ACCEPTED_EXTENSIONS)
                    .pick_files();

                if let Some(paths) = picked {
                    self.status = format!("Reading {} files...", paths.len());
                    return Task::perform(load_uploads(paths), Message::UploadComplete);
                }

                Task::none()
            }
            Message::UploadComplete(Ok(uploaded)) => {
                let count = uploaded.len();
                for file in uploaded {
                    // Re-uploading a name replaces the earlier file in place
                    match self.files.iter_mut().find(|f| f.name() == file.name()) {
                        Some(existing) => *existing = file,
                        None => self.files.push(file),
                    }
                }

                info!("Uploaded {} files ({} total)", count, self.files.len());
                self.status = format!("{} images uploaded.", self.files.len());
                self.rerun()
            }
            Message::UploadComplete(Err(e)) => {
                error!("Upload failed: {}", e);
                self.status = e;
                Task::none()
            }
            Message::ClearFiles => {
                self.files.clear();
                self.widget_ratings.clear();
                self.status = "Ready. Upload images to begin.".to_string();
                self.rerun()
            }
            Message::RatingChanged(name, value) => {
                match Rating::try_from(value) {
                    Ok(rating) => self.widget_ratings.insert(name, rating),
                    Err(e) => warn!("Ignoring rating for {}: {}", name, e),
                }
                self.rerun()
            }
            Message::PassComplete(generation, result) => {
                if generation != self.generation {
                    debug!("Discarding superseded pass {} (latest {})", generation, self.generation);
                    return Task::none();
                }

                match result {
                    Ok(pass) => {
                        self.previews = pass
                            .reports
                            .iter()
                            .map(|report| match &report.outcome {
                                FileOutcome::Analyzed(analysis) => analysis.preview.as_ref().map(|p| {
                                    Handle::from_rgba(p.width, p.height, p.rgba.clone())
                                }),
                                FileOutcome::DecodeFailed { .. } => None,
                            })
                            .collect();

                        // Sliders start where the pass placed them
                        for (name, rating) in pass.ratings.iter() {
                            if self.widget_ratings.get(name).is_none() {
                                self.widget_ratings.insert(name, rating);
                            }
                        }

                        self.pass = Some(Ok(pass));
                    }
                    Err(e) => {
                        error!("Review pass failed: {}", e);
                        self.previews.clear();
                        self.pass = Some(Err(e));
                    }
                }

                Task::none()
            }
        }
    }

    /// Start a fresh review pass over the current uploads
    ///
    /// Results of any pass still running are discarded when they arrive.
    fn rerun(&mut self) -> Task<Message> {
        self.generation += 1;

        if self.files.is_empty() {
            self.pass = None;
            self.previews.clear();
            return Task::none();
        }

        let generation = self.generation;
        let files = self.files.clone();
        let ratings = self.widget_ratings.clone();
        let config = self.config.clone();

        Task::perform(review_async(files, ratings, config), move |result| {
            Message::PassComplete(generation, result)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let controls = row![
            button("Upload images")
                .on_press(Message::UploadFiles)
                .padding(10),
            button("Clear")
                .on_press_maybe((!self.files.is_empty()).then_some(Message::ClearFiles))
                .padding(10),
        ]
        .spacing(10);

        let mut content: Column<Message> = column![
            text("HDR Image QC with Rating").size(40),
            controls,
            text(&self.status).size(16),
        ]
        .spacing(24)
        .padding(40)
        .max_width(960.0);

        match &self.pass {
            None => {}
            Some(Err(e)) => {
                content = content.push(text(format!("Error: {}", e)).color(ui::report::ERROR_COLOR));
            }
            Some(Ok(pass)) => {
                for (report, preview) in pass.reports.iter().zip(&self.previews) {
                    content = content.push(ui::report::file_section(
                        report,
                        preview.as_ref(),
                        self.widget_ratings.get(&report.name),
                        &self.config,
                    ));
                }

                content = content
                    .push(text("All Ratings").size(28))
                    .push(ui::report::json_block(pass.ratings.to_json()));
            }
        }

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("HDR Image QC", HdrQc::update, HdrQc::view)
        .theme(HdrQc::theme)
        .centered()
        .run_with(HdrQc::new)
}

/// Run a review pass off the UI thread
/// Decoding large EXR files is CPU-bound, so it goes to the blocking pool
async fn review_async(
    files: Vec<UploadedFile>,
    ratings: RatingsTable,
    config: QcConfig,
) -> Result<Arc<ReviewPass>, String> {
    tokio::task::spawn_blocking(move || run_pass(&files, &ratings, &config))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map(Arc::new)
        .map_err(|e| {
            error!("Review pass stopped at {}", e.file());
            e.to_string()
        })
}
