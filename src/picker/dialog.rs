use super::{ImagePicker, ImageSource, PickOutcome, PickResult, PickSender, SessionId, load_source};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Native "open file" dialog filtered to images.
///
/// The dialog blocks, so it runs on its own thread together with the decode.
#[derive(Debug, Clone, Default)]
pub struct FileDialogPicker {
    title: Option<String>,
}

impl FileDialogPicker {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl ImagePicker for FileDialogPicker {
    fn present(&self, session: SessionId, reply: PickSender) {
        let title = self.title.clone().unwrap_or_else(|| "Choose a background".to_owned());

        let spawned = std::thread::Builder::new()
            .name("inkboard-picker".to_owned())
            .spawn({
                let reply = reply.clone();
                move || {
                    let picked = rfd::FileDialog::new()
                        .set_title(title.as_str())
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file();

                    let result = match picked {
                        Some(path) => {
                            log::info!("Picked background {}", path.display());
                            load_source(ImageSource::Path(path))
                        }
                        None => PickResult::Cancelled,
                    };
                    let _ = reply.send(PickOutcome { session, result });
                }
            });

        if let Err(err) = spawned {
            log::error!("Failed to open picker: {}", err);
            let _ = reply.send(PickOutcome {
                session,
                result: PickResult::Cancelled,
            });
        }
    }
}
