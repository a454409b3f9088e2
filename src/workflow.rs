use std::path::PathBuf;
use std::sync::mpsc;

use crate::client;
use crate::crop;
use crate::ops::{self, Operation};
use crate::screen::{Feature, Filter};
use crate::session::{DecodedImage, WorkMsg, WorkflowSession};

/// Longest display edge for the source preview and the result.
const PREVIEW_MAX_H: f32 = 420.0;

static IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff", "tif"];

pub fn show(
    ui: &mut egui::Ui,
    session: &mut WorkflowSession,
    feature: Feature,
    filter: Option<Filter>,
    backend_url: &str,
    tx: &mpsc::Sender<WorkMsg>,
) {
    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Kreate").strong().size(28.0));
        ui.label(format!(
            "Upload an image to apply {}!",
            ops::operation_title(feature, filter)
        ));
        ui.add_space(12.0);

        if ui
            .add_enabled(!session.is_loading, egui::Button::new("Select Image"))
            .clicked()
        {
            pick_image(session, ui.ctx(), tx);
        }
        ui.add_space(12.0);
    });

    show_preview(ui, session, feature);

    if feature == Feature::Cropping && session.image.is_some() {
        show_crop_form(ui, session);
    }

    if feature == Feature::Filters && session.image.is_some() {
        if let Some(f) = filter {
            show_intensity_slider(ui, session, f);
        }
    }

    show_actions(ui, session, feature, filter, backend_url, tx);

    if let Some(msg) = session.error.clone() {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.colored_label(egui::Color32::from_rgb(220, 60, 60), msg);
        });
    }

    show_result(ui, session);
}

/// Opens the native picker and kicks off a background read + decode.
fn pick_image(session: &mut WorkflowSession, ctx: &egui::Context, tx: &mpsc::Sender<WorkMsg>) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Select Image")
        .add_filter("Images", IMAGE_EXTS)
        .pick_file()
    else {
        return;
    };

    session.pending_image = Some(path.clone());
    let tx = tx.clone();
    let ctx2 = ctx.clone();
    std::thread::spawn(move || {
        let msg = match load_image(&path) {
            Ok((bytes, decoded, natural)) => WorkMsg::ImageLoaded {
                path,
                bytes,
                decoded,
                natural,
            },
            Err(err) => WorkMsg::ImageLoadFailed {
                path,
                message: format!("Could not open image: {err}"),
            },
        };
        let _ = tx.send(msg);
        ctx2.request_repaint();
    });
}

fn load_image(path: &PathBuf) -> anyhow::Result<(Vec<u8>, DecodedImage, (u32, u32))> {
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)?;
    let natural = (img.width(), img.height());
    let rgba = img.to_rgba8();
    let decoded = DecodedImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    };
    Ok((bytes, decoded, natural))
}

fn show_preview(ui: &mut egui::Ui, session: &mut WorkflowSession, feature: Feature) {
    if session.pending_image.is_some() {
        ui.vertical_centered(|ui| {
            ui.spinner();
        });
        return;
    }

    let Some(texture) = session.image.as_ref().and_then(|img| img.texture.clone()) else {
        return;
    };

    let tex_size = texture.size_vec2();
    let avail_w = ui.available_width() - 16.0;
    let scale = (avail_w / tex_size.x).min(PREVIEW_MAX_H / tex_size.y).min(1.0);
    let display = tex_size * scale;

    let interactive = session.crop_interaction_enabled(feature);
    let sense = if interactive {
        egui::Sense::drag()
    } else {
        egui::Sense::hover()
    };

    let (img_rect, resp) = ui
        .vertical_centered(|ui| ui.allocate_exact_size(display, sense))
        .inner;

    ui.painter().image(
        texture.id(),
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if interactive {
        handle_crop_drag(session, &resp, img_rect);
    }

    // Selection overlay, drawn only while cropping and only once a region
    // exists. Coordinates are preview points anchored at the image corner.
    if feature == Feature::Cropping && (session.crop.width > 0 || session.crop.height > 0) {
        let sel = egui::Rect::from_min_size(
            img_rect.min + egui::vec2(session.crop.x as f32, session.crop.y as f32),
            egui::vec2(session.crop.width as f32, session.crop.height as f32),
        );
        let sel = sel.intersect(img_rect);
        let painter = ui.painter();
        painter.rect_filled(sel, 0.0, egui::Color32::from_rgba_unmultiplied(70, 130, 240, 50));
        painter.rect_stroke(
            sel,
            0.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(70, 130, 240)),
            egui::StrokeKind::Inside,
        );
    }

    ui.add_space(8.0);
}

fn handle_crop_drag(session: &mut WorkflowSession, resp: &egui::Response, img_rect: egui::Rect) {
    let pointer = resp.interact_pointer_pos();

    if resp.drag_started() {
        if let Some(pos) = pointer {
            let start = (pos - img_rect.min).to_pos2();
            session.drag_start = Some(start);
            session.crop = crop::region_from_drag(start, start);
        }
    } else if resp.dragged() {
        if let (Some(start), Some(pos)) = (session.drag_start, pointer) {
            let current = (pos - img_rect.min).to_pos2();
            session.crop = crop::region_from_drag(start, current);
        }
    }

    if resp.drag_stopped() {
        session.drag_start = None;
    }
}

fn show_crop_form(ui: &mut egui::Ui, session: &mut WorkflowSession) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Crop Coordinates (Pixels)").strong());
        ui.add_space(4.0);
        egui::Grid::new("crop_coords")
            .num_columns(4)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                coord_field(ui, "X (Left)", &mut session.crop.x);
                coord_field(ui, "Y (Top)", &mut session.crop.y);
                ui.end_row();
                coord_field(ui, "Width", &mut session.crop.width);
                coord_field(ui, "Height", &mut session.crop.height);
                ui.end_row();
            });
        ui.add_space(4.0);
        if ui.button("Reset to Full Image").clicked() {
            session.reset_crop_to_full();
        }
    });
    ui.add_space(8.0);
}

fn coord_field(ui: &mut egui::Ui, label: &str, value: &mut u32) {
    ui.label(label);
    let mut text = value.to_string();
    if ui
        .add(egui::TextEdit::singleline(&mut text).desired_width(64.0))
        .changed()
    {
        *value = crop::coerce_coord(&text);
    }
}

fn show_intensity_slider(ui: &mut egui::Ui, session: &mut WorkflowSession, filter: Filter) {
    let Some(label) = filter.slider_label() else {
        return;
    };
    let Some(value) = session.intensity.get_mut(filter) else {
        return;
    };
    ui.group(|ui| {
        ui.label(egui::RichText::new(format!("{label} ({value}%)")).strong());
        ui.add(egui::Slider::new(value, 0..=100).show_value(false));
    });
    ui.add_space(8.0);
}

fn filter_operation(filter: Filter) -> Operation {
    match filter {
        Filter::BlackAndWhite => Operation::BlackAndWhite,
        Filter::Sharpening => Operation::Sharpen,
        Filter::Hue => Operation::Hue,
        Filter::Contrast => Operation::Contrast,
        Filter::Saturation => Operation::Saturation,
        Filter::InvertColors => Operation::InvertColors,
    }
}

fn action_label(filter: Filter) -> &'static str {
    match filter {
        Filter::BlackAndWhite => "Apply Black & White",
        Filter::Sharpening => "Apply Sharpen",
        Filter::Hue => "Apply Hue",
        Filter::Contrast => "Apply Contrast",
        Filter::Saturation => "Apply Saturation",
        Filter::InvertColors => "Invert Colors",
    }
}

fn show_actions(
    ui: &mut egui::Ui,
    session: &mut WorkflowSession,
    feature: Feature,
    filter: Option<Filter>,
    backend_url: &str,
    tx: &mpsc::Sender<WorkMsg>,
) {
    let idle = session.image.is_some() && !session.is_loading;

    ui.vertical_centered(|ui| {
        if session.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing...");
            });
            ui.add_space(4.0);
        }

        match feature {
            Feature::BackgroundRemoval => {
                if ui
                    .add_enabled(idle, egui::Button::new("Remove Background"))
                    .clicked()
                {
                    trigger(session, Operation::RemoveBackground, backend_url, ui.ctx(), tx);
                }
            }
            Feature::Cropping => {
                let croppable = idle && session.crop.is_complete();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(croppable, egui::Button::new("Apply Rectangular Crop"))
                        .clicked()
                    {
                        trigger(
                            session,
                            Operation::Crop { circular: false },
                            backend_url,
                            ui.ctx(),
                            tx,
                        );
                    }
                    if ui
                        .add_enabled(croppable, egui::Button::new("Apply Circular Crop"))
                        .clicked()
                    {
                        trigger(
                            session,
                            Operation::Crop { circular: true },
                            backend_url,
                            ui.ctx(),
                            tx,
                        );
                    }
                });
            }
            Feature::Filters => {
                if let Some(f) = filter {
                    if ui
                        .add_enabled(idle, egui::Button::new(action_label(f)))
                        .clicked()
                    {
                        trigger(session, filter_operation(f), backend_url, ui.ctx(), tx);
                    }
                }
            }
        }
    });
}

/// Builds and dispatches one request. Validation failures surface immediately;
/// a dispatched request reports back over the channel. In-flight requests are
/// never cancelled.
fn trigger(
    session: &mut WorkflowSession,
    operation: Operation,
    backend_url: &str,
    ctx: &egui::Context,
    tx: &mpsc::Sender<WorkMsg>,
) {
    let request = match client::build_request(
        operation,
        session.image.is_some(),
        session.crop,
        &session.intensity,
    ) {
        Ok(req) => req,
        Err(err) => {
            session.error = Some(err.to_string());
            return;
        }
    };
    let Some(image) = session.image.as_ref() else {
        return;
    };
    let bytes = image.bytes.clone();
    let file_name = image.file_name.clone();

    session.begin_operation();
    let epoch = session.epoch;

    let base = backend_url.to_owned();
    let tx = tx.clone();
    let ctx2 = ctx.clone();
    std::thread::spawn(move || {
        let outcome = client::dispatch(&base, &request, &file_name, bytes);
        let _ = tx.send(WorkMsg::OperationFinished {
            epoch,
            operation,
            outcome,
        });
        ctx2.request_repaint();
    });
}

fn show_result(ui: &mut egui::Ui, session: &mut WorkflowSession) {
    let Some(result) = session.result.as_ref() else {
        return;
    };
    let operation = result.operation;
    let texture = result.texture.clone();
    let bytes_len = result.bytes.len();

    ui.add_space(8.0);
    ui.separator();
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(operation.result_title()).strong().size(16.0));
        ui.add_space(8.0);

        if let Some(tex) = texture {
            let tex_size = tex.size_vec2();
            let avail_w = ui.available_width() - 16.0;
            let scale = (avail_w / tex_size.x).min(PREVIEW_MAX_H / tex_size.y).min(1.0);
            ui.image((tex.id(), tex_size * scale));
        } else {
            ui.weak(format!("{bytes_len} bytes received"));
        }

        ui.add_space(8.0);
        if ui.button("Download Image").clicked() {
            if let Err(err) = save_result(session) {
                session.error = Some(format!("Could not save image: {err}"));
            }
        }
    });
}

/// Save-as with the operation's fixed default filename.
fn save_result(session: &WorkflowSession) -> anyhow::Result<()> {
    let Some(result) = session.result.as_ref() else {
        return Ok(());
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Download Image")
        .set_file_name(result.operation.download_filename())
        .save_file()
    else {
        return Ok(());
    };
    std::fs::write(&path, &result.bytes)?;
    tracing::info!(path = %path.display(), "saved result");
    Ok(())
}
