use crate::screen::{Feature, Filter};

const CARD_W: f32 = 260.0;
const CARD_H: f32 = 116.0;

const TAGLINE: &str = "Step into the world of effortless image transformation with Kreate. \
Discover intuitive tools for background removal, precise cropping, and a suite of artistic \
filters to bring your visions to life.";

pub fn show_welcome(ui: &mut egui::Ui) -> bool {
    let mut get_started = false;
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.label(egui::RichText::new("Kreate").strong().size(40.0));
        ui.add_space(16.0);
        ui.allocate_ui(egui::vec2(520.0_f32.min(ui.available_width()), 0.0), |ui| {
            ui.label(egui::RichText::new(TAGLINE).size(15.0));
        });
        ui.add_space(24.0);
        if ui
            .add(egui::Button::new(
                egui::RichText::new("Get Started").strong().size(16.0),
            ))
            .clicked()
        {
            get_started = true;
        }
    });
    get_started
}

pub fn show_feature_menu(ui: &mut egui::Ui) -> Option<Feature> {
    let mut selected = None;
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(egui::RichText::new("Kreate").strong().size(32.0));
        ui.add_space(8.0);
        ui.label("Select a Digital Image Processing feature to get started!");
        ui.add_space(16.0);
        card_grid(ui, Feature::ALL.len(), |ui, i| {
            let feature = Feature::ALL[i];
            if draw_card(ui, feature.name(), feature.description()) {
                selected = Some(feature);
            }
        });
    });
    selected
}

pub fn show_filter_menu(ui: &mut egui::Ui) -> Option<Filter> {
    let mut selected = None;
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(egui::RichText::new("Image Filters").strong().size(32.0));
        ui.add_space(8.0);
        ui.label("Choose a filter to apply to your image.");
        ui.add_space(16.0);
        card_grid(ui, Filter::ALL.len(), |ui, i| {
            let filter = Filter::ALL[i];
            if draw_card(ui, filter.name(), filter.description()) {
                selected = Some(filter);
            }
        });
    });
    selected
}

/// Lays out `count` cards two per row, centered.
fn card_grid(ui: &mut egui::Ui, count: usize, mut cell: impl FnMut(&mut egui::Ui, usize)) {
    let mut i = 0;
    while i < count {
        ui.horizontal(|ui| {
            let row = (count - i).min(2);
            let row_w = row as f32 * CARD_W + (row - 1) as f32 * 12.0;
            let pad = ((ui.available_width() - row_w) * 0.5).max(0.0);
            ui.add_space(pad);
            for _ in 0..row {
                cell(ui, i);
                ui.add_space(12.0);
                i += 1;
            }
        });
        ui.add_space(12.0);
    }
}

fn draw_card(ui: &mut egui::Ui, name: &str, description: &str) -> bool {
    let (resp, painter) =
        ui.allocate_painter(egui::vec2(CARD_W, CARD_H), egui::Sense::click());
    let rect = resp.rect;

    let fill = if resp.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };
    painter.rect_filled(rect, 8.0, fill);

    painter.text(
        egui::pos2(rect.center().x, rect.top() + 30.0),
        egui::Align2::CENTER_CENTER,
        name,
        egui::FontId::proportional(18.0),
        ui.visuals().strong_text_color(),
    );

    // Wrap the description inside the card by laying it out manually.
    let galley = painter.layout(
        description.to_owned(),
        egui::FontId::proportional(12.0),
        ui.visuals().text_color(),
        CARD_W - 24.0,
    );
    let text_pos = egui::pos2(rect.center().x - galley.size().x * 0.5, rect.top() + 50.0);
    painter.galley(text_pos, galley, ui.visuals().text_color());

    if resp.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    resp.clicked()
}
