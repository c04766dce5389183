use importer_core::{AppViewModel, VisualCategory};

/// One terminal line for the control: `[id] <tag> label`.
pub fn render(view: &AppViewModel) -> String {
    let control = &view.control;
    format!(
        "[{}] {:<9} {}",
        control.control_id,
        category_tag(control.category),
        control.label
    )
}

fn category_tag(category: VisualCategory) -> &'static str {
    match category {
        VisualCategory::None => "",
        VisualCategory::Loading => "(loading)",
        VisualCategory::Success => "(success)",
        VisualCategory::Error => "(error)",
    }
}

/// Hint printed once at startup, below the control.
pub fn usage_hint() -> &'static str {
    "Press Enter to import all accounts, or type q to quit."
}
