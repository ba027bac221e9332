use std::fmt::Write as _;

use client_core::{FieldSet, ImprovementsView, ResultView};

pub fn render_fields(fields: &FieldSet) -> String {
    let mut out = String::new();
    for (feature, value) in fields.iter() {
        let shown = if value.is_empty() { "<empty>" } else { value };
        let _ = writeln!(out, "  {:<12} {shown}", feature.label());
    }
    out
}

pub fn render_view(view: ResultView<'_>) -> String {
    let ResultView::Submitted {
        predicted_crop,
        improvements,
    } = view
    else {
        return "No prediction yet.\n".to_string();
    };

    let mut out = String::new();
    if let Some(crop) = predicted_crop {
        let _ = writeln!(out, "[ok] Predicted Crop: {crop}");
    }
    match improvements {
        ImprovementsView::Suggestions(lines) => {
            out.push_str("[info] Suggested Improvements:\n");
            for line in lines {
                let _ = writeln!(out, "  - {line}");
            }
        }
        ImprovementsView::NoneNeeded => {
            out.push_str("[warn] No improvements needed for this crop.\n");
        }
    }
    out
}
