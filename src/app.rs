use std::sync::mpsc;

use crate::config::AppConfig;
use crate::menu;
use crate::screen::Screen;
use crate::session::{WorkMsg, WorkflowSession};
use crate::workflow;

pub struct KreateApp {
    screen: Screen,
    session: WorkflowSession,
    backend_url: String,
    config: AppConfig,
    tx: mpsc::Sender<WorkMsg>,
    rx: mpsc::Receiver<WorkMsg>,
}

/// Whether moving between these screens enters or leaves a workflow. That is
/// the session lifecycle boundary.
fn crosses_workflow(from: Screen, to: Screen) -> bool {
    matches!(from, Screen::Workflow { .. }) || matches!(to, Screen::Workflow { .. })
}

impl KreateApp {
    pub fn new(config: AppConfig, backend_url: String) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            screen: Screen::Welcome,
            session: WorkflowSession::new(),
            backend_url,
            config,
            tx,
            rx,
        }
    }

    /// Applies background work in arrival order and uploads any textures the
    /// new state needs.
    fn drain_channel(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WorkMsg::ImageLoaded {
                    path,
                    bytes,
                    decoded,
                    natural,
                } => {
                    let stale = self.session.pending_image.as_ref() != Some(&path);
                    self.session.apply_image_loaded(path, bytes, natural);
                    if stale {
                        continue;
                    }
                    if let Some(ref mut image) = self.session.image {
                        let color = egui::ColorImage::from_rgba_unmultiplied(
                            [decoded.width, decoded.height],
                            &decoded.rgba,
                        );
                        image.texture = Some(ctx.load_texture(
                            "source_image",
                            color,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                WorkMsg::ImageLoadFailed { path, message } => {
                    self.session.apply_image_load_failed(path, message);
                }
                WorkMsg::OperationFinished {
                    epoch,
                    operation,
                    outcome,
                } => {
                    let stale = epoch != self.session.epoch;
                    self.session.apply_outcome(epoch, operation, outcome);
                    if stale {
                        continue;
                    }
                    self.upload_result_texture(ctx);
                }
            }
        }
    }

    fn upload_result_texture(&mut self, ctx: &egui::Context) {
        let Some(ref mut result) = self.session.result else {
            return;
        };
        match image::load_from_memory(&result.bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw());
                result.texture =
                    Some(ctx.load_texture("result_image", color, egui::TextureOptions::LINEAR));
            }
            Err(err) => {
                tracing::warn!(%err, "backend returned an unreadable image");
                self.session.result = None;
                self.session.error = Some("Backend returned an unreadable image".to_owned());
            }
        }
    }

    /// Every workflow entry starts from a clean session; leaving one drops it
    /// (textures included).
    fn navigate(&mut self, next: Screen) {
        if next != self.screen {
            if crosses_workflow(self.screen, next) {
                self.session = WorkflowSession::new();
            }
            self.screen = next;
        }
    }
}

impl eframe::App for KreateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.window_width = Some(rect.width());
            self.config.window_height = Some(rect.height());
        }

        self.drain_channel(ctx);

        let mut next = self.screen;

        egui::CentralPanel::default().show(ctx, |ui| {
            // Back navigation everywhere past the main menu.
            match self.screen {
                Screen::FilterMenu | Screen::Workflow { .. } => {
                    if ui.button(self.screen.back_label()).clicked() {
                        next.go_back();
                    }
                }
                _ => {}
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.screen {
                    Screen::Welcome => {
                        if menu::show_welcome(ui) {
                            next.get_started();
                        }
                    }
                    Screen::Menu => {
                        if let Some(feature) = menu::show_feature_menu(ui) {
                            next.select_feature(feature);
                        }
                    }
                    Screen::FilterMenu => {
                        if let Some(filter) = menu::show_filter_menu(ui) {
                            next.select_filter(filter);
                        }
                    }
                    Screen::Workflow { feature, filter } => {
                        workflow::show(
                            ui,
                            &mut self.session,
                            feature,
                            filter,
                            &self.backend_url,
                            &self.tx,
                        );
                    }
                });
        });

        self.navigate(next);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropRegion;
    use crate::ops::FilterIntensity;
    use crate::screen::{Feature, Filter};

    fn app() -> KreateApp {
        KreateApp::new(AppConfig::default(), "http://127.0.0.1:5000".into())
    }

    fn dirty(session: &mut WorkflowSession) {
        session.is_loading = true;
        session.error = Some("stale".into());
        session.crop = CropRegion {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        session.intensity.hue = 40;
    }

    fn assert_fresh(session: &WorkflowSession) {
        assert!(session.image.is_none());
        assert!(session.result.is_none());
        assert!(session.error.is_none());
        assert!(!session.is_loading);
        assert_eq!(session.crop, CropRegion::default());
        assert_eq!(session.intensity, FilterIntensity::default());
    }

    #[test]
    fn entering_and_leaving_a_workflow_replaces_the_session() {
        let mut app = app();
        app.navigate(Screen::Menu);
        app.navigate(Screen::Workflow {
            feature: Feature::Cropping,
            filter: None,
        });

        dirty(&mut app.session);
        let crop_epoch = app.session.epoch;
        app.navigate(Screen::Menu);
        assert_fresh(&app.session);
        assert_ne!(app.session.epoch, crop_epoch);

        dirty(&mut app.session);
        let menu_epoch = app.session.epoch;
        app.navigate(Screen::Workflow {
            feature: Feature::Filters,
            filter: Some(Filter::Contrast),
        });
        assert_fresh(&app.session);
        assert_ne!(app.session.epoch, menu_epoch);
    }

    #[test]
    fn menu_hops_keep_the_session() {
        let mut app = app();
        app.navigate(Screen::Menu);
        app.session.error = Some("kept".into());
        let epoch = app.session.epoch;
        app.navigate(Screen::FilterMenu);
        assert_eq!(app.session.epoch, epoch);
        assert_eq!(app.session.error.as_deref(), Some("kept"));
    }

    #[test]
    fn workflow_boundary_detection() {
        let menu = Screen::Menu;
        let crop = Screen::Workflow {
            feature: Feature::Cropping,
            filter: None,
        };
        let hue = Screen::Workflow {
            feature: Feature::Filters,
            filter: Some(Filter::Hue),
        };
        assert!(crosses_workflow(menu, crop));
        assert!(crosses_workflow(crop, menu));
        // switching directly between workflows still starts over
        assert!(crosses_workflow(crop, hue));
        assert!(!crosses_workflow(Screen::Welcome, menu));
        assert!(!crosses_workflow(menu, Screen::FilterMenu));
    }
}
