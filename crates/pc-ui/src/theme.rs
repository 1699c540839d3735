use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Colors of the application chrome
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub panel: Color32,
    pub widget: Color32,
    pub hover: Color32,
    pub active: Color32,
    pub accent: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub error: Color32,
    pub warning: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Dark".to_string(),
            background: Color32::from_rgb(23, 23, 23),
            panel: Color32::from_rgb(31, 31, 31),
            widget: Color32::from_rgb(40, 40, 40),
            hover: Color32::from_rgb(50, 50, 50),
            active: Color32::from_rgb(60, 60, 60),
            accent: Color32::from_rgb(100, 150, 250),
            text: Color32::from_rgb(220, 220, 220),
            text_secondary: Color32::from_rgb(160, 160, 160),
            error: Color32::from_rgb(230, 80, 80),
            warning: Color32::from_rgb(230, 180, 80),
        }
    }
}

/// Apply the dark application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    // The chart paints straight onto the panel, so keep it darkest
    visuals.window_fill = theme.panel;
    visuals.panel_fill = theme.background;
    visuals.extreme_bg_color = theme.background;
    visuals.faint_bg_color = theme.widget;

    let widgets = [
        (&mut visuals.widgets.noninteractive, theme.widget, Color32::from_rgb(60, 60, 60)),
        (&mut visuals.widgets.inactive, theme.widget, Color32::from_rgb(70, 70, 70)),
        (&mut visuals.widgets.hovered, theme.hover, Color32::from_rgb(80, 80, 80)),
        (&mut visuals.widgets.active, theme.active, theme.accent),
    ];
    for (widget, fill, border) in widgets {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.bg_stroke = Stroke::new(1.0, border);
        widget.fg_stroke = Stroke::new(1.0, theme.text);
        widget.rounding = Rounding::same(4.0);
    }

    visuals.selection.bg_fill = theme.accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, theme.accent);
    visuals.hyperlink_color = theme.accent;
    visuals.error_fg_color = theme.error;
    visuals.warn_fg_color = theme.warning;

    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    style.visuals = visuals;
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_theme_sets_visuals() {
        let ctx = Context::default();
        let theme = Theme::default();
        apply_theme(&ctx, &theme);

        let style = ctx.style();
        assert_eq!(style.visuals.panel_fill, theme.background);
        assert_eq!(style.visuals.widgets.active.bg_stroke.color, theme.accent);
        assert_eq!(style.visuals.error_fg_color, theme.error);
        assert_eq!(style.text_styles[&TextStyle::Body].size, 13.0);
    }
}
